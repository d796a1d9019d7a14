//! Graphics binding contract.
//!
//! `RectRenderer` talks to the device exclusively through [`GraphicsContext`]:
//! a small, immediate-mode surface shaped after the handful of calls a
//! single-program 2D renderer needs (compile/link, buffer upload, uniform
//! upload, indexed draw). Backends decide how those calls map onto the real API;
//! the wgpu backend lives in `crate::device`.
//!
//! Handles are plain indices into backend-owned tables. They are only meaningful
//! for the context that produced them.

mod error;

#[cfg(test)]
pub(crate) mod recording;

pub use error::{ContextError, InitError};

use crate::coords::Viewport;
use crate::math::Mat3;

/// Linked shader program handle.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct ProgramId(u32);

/// Device buffer handle.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct BufferId(u32);

/// Vertex attribute location resolved against a program.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct AttribLocation(u32);

/// Uniform location resolved against a program.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct UniformLocation(u32);

macro_rules! handle_impl {
    ($($ty:ident),*) => {
        $(
            impl $ty {
                #[inline]
                pub const fn new(index: u32) -> Self {
                    Self(index)
                }

                #[inline]
                pub const fn index(self) -> usize {
                    self.0 as usize
                }
            }
        )*
    };
}

handle_impl!(ProgramId, BufferId, AttribLocation, UniformLocation);

/// Vertex + index buffer uploaded from one mesh.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct BufferPair {
    pub vertex: BufferId,
    pub index: BufferId,
}

/// Primitive assembly mode for indexed draws.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Primitive {
    TriangleStrip,
}

/// Float vertex attribute layout.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct VertexLayout {
    /// Components per vertex (1..=4).
    pub components: u32,
    pub normalized: bool,
    /// Byte stride; `0` means tightly packed.
    pub stride: u32,
    /// Byte offset of the first component.
    pub offset: u64,
}

impl VertexLayout {
    /// Two tightly packed `f32` components starting at offset 0.
    pub const POSITION_2D: Self = Self {
        components: 2,
        normalized: false,
        stride: 0,
        offset: 0,
    };

    /// Effective stride in bytes, resolving the tightly packed case.
    #[inline]
    pub const fn effective_stride(self) -> u32 {
        if self.stride == 0 {
            self.components * std::mem::size_of::<f32>() as u32
        } else {
            self.stride
        }
    }
}

/// Outcome of presenting a frame.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum FrameStatus {
    /// Recorded draws reached the surface.
    Presented,
    /// Surface was reconfigured; rendering may resume next frame.
    Reconfigured,
    /// Transient failure or zero-sized surface; the frame was dropped.
    Skipped,
    /// Unrecoverable device/surface failure.
    Fatal,
}

/// Immediate-mode device binding used by the renderer.
///
/// Calls are executed (or recorded for execution at [`present`](Self::present))
/// in issue order. Bound state (program, buffers, uniforms) persists between
/// draws until overwritten, like a GL context.
pub trait GraphicsContext {
    /// Compiles both stages and links them into one program.
    fn compile_and_link(
        &mut self,
        vertex_src: &str,
        fragment_src: &str,
    ) -> Result<ProgramId, ContextError>;

    fn attrib_location(&self, program: ProgramId, name: &str) -> Option<AttribLocation>;

    fn uniform_location(&self, program: ProgramId, name: &str) -> Option<UniformLocation>;

    /// Uploads static geometry. Buffers live as long as the context.
    fn create_buffer_pair(&mut self, vertices: &[f32], indices: &[u16]) -> BufferPair;

    /// Sets the backing resolution to the display size times the scale
    /// factor, i.e. `display_size().to_physical(scale_factor())`.
    ///
    /// Returns `true` when the backing size changed.
    fn resize_to_display(&mut self) -> bool;

    /// Backing (color buffer) size in physical pixels.
    fn backing_size(&self) -> (u32, u32);

    /// Displayed size in logical pixels.
    fn display_size(&self) -> Viewport;

    /// Physical pixels per logical pixel.
    fn scale_factor(&self) -> f64;

    fn set_viewport(&mut self, x: u32, y: u32, width: u32, height: u32);

    /// Clears the color buffer.
    fn clear(&mut self);

    fn use_program(&mut self, program: ProgramId);

    fn bind_buffer_pair(&mut self, buffers: BufferPair);

    /// Enables `location` and describes how it reads the bound vertex buffer.
    fn vertex_attrib_pointer(&mut self, location: AttribLocation, layout: VertexLayout);

    fn uniform_4f(&mut self, location: UniformLocation, value: [f32; 4]);

    fn uniform_mat3(&mut self, location: UniformLocation, value: &Mat3);

    /// Draws `count` indices from the bound index buffer.
    fn draw_elements(&mut self, primitive: Primitive, count: u32);

    /// Flushes everything issued since the last present to the surface.
    fn present(&mut self) -> FrameStatus;
}

/// Source of drawing surfaces, addressed by identifier.
pub trait SurfaceHost {
    type Context: GraphicsContext;

    /// Looks up `surface_id` and opens a graphics context on it.
    ///
    /// Must not allocate device resources beyond the context itself.
    fn open_context(&mut self, surface_id: &str) -> Result<Self::Context, InitError>;
}
