//! In-memory `GraphicsContext` that records every call, for tests.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::coords::Viewport;
use crate::math::Mat3;

use super::{
    AttribLocation, BufferId, BufferPair, ContextError, FrameStatus, GraphicsContext, InitError,
    Primitive, ProgramId, SurfaceHost, UniformLocation, VertexLayout,
};

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Call {
    CompileAndLink,
    CreateBufferPair {
        pair: BufferPair,
        vertices: Vec<f32>,
        indices: Vec<u16>,
    },
    ResizeToDisplay {
        changed: bool,
    },
    SetViewport {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },
    Clear,
    UseProgram(ProgramId),
    BindBufferPair(BufferPair),
    VertexAttribPointer {
        location: AttribLocation,
        layout: VertexLayout,
    },
    Uniform4f {
        location: UniformLocation,
        value: [f32; 4],
    },
    UniformMat3 {
        location: UniformLocation,
        value: Mat3,
    },
    DrawElements {
        primitive: Primitive,
        count: u32,
    },
    Present,
}

pub(crate) type CallLog = Rc<RefCell<Vec<Call>>>;

/// State captured at one `DrawElements` call.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct DrawRecord {
    pub buffers: Option<BufferPair>,
    pub color: Option<[f32; 4]>,
    pub matrix: Mat3,
    pub count: u32,
}

const POSITION: u32 = 0;
const COLOR: u32 = 0;
const MATRIX: u32 = 1;

struct Surface {
    id: String,
    display: Rc<RefCell<Viewport>>,
    scale_factor: Rc<Cell<f64>>,
    has_context: bool,
}

/// Hands out recording contexts that share one call log.
pub(crate) struct RecordingHost {
    surfaces: Vec<Surface>,
    log: CallLog,
    failing_link: bool,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self {
            surfaces: Vec::new(),
            log: CallLog::default(),
            failing_link: false,
        }
    }

    pub fn with_surface(mut self, id: &str, display: Viewport) -> Self {
        self.surfaces.push(Surface {
            id: id.to_string(),
            display: Rc::new(RefCell::new(display)),
            scale_factor: Rc::new(Cell::new(1.0)),
            has_context: true,
        });
        self
    }

    /// Surface exists but cannot produce a graphics context.
    pub fn without_context(mut self, id: &str, display: Viewport) -> Self {
        self.surfaces.push(Surface {
            id: id.to_string(),
            display: Rc::new(RefCell::new(display)),
            scale_factor: Rc::new(Cell::new(1.0)),
            has_context: false,
        });
        self
    }

    /// Contexts opened afterwards fail to link programs.
    pub fn failing_link(mut self) -> Self {
        self.failing_link = true;
        self
    }

    pub fn log(&self) -> CallLog {
        Rc::clone(&self.log)
    }

    /// Changes the displayed size, as a window resize would.
    pub fn set_display(&self, id: &str, display: Viewport) {
        if let Some(s) = self.surfaces.iter().find(|s| s.id == id) {
            *s.display.borrow_mut() = display;
        }
    }

    /// Changes the physical pixels per display pixel, as moving the window
    /// to another monitor would.
    pub fn set_scale_factor(&self, id: &str, scale_factor: f64) {
        if let Some(s) = self.surfaces.iter().find(|s| s.id == id) {
            s.scale_factor.set(scale_factor);
        }
    }

    /// Replays the log and returns the bound state at every draw.
    pub fn draws(&self) -> Vec<DrawRecord> {
        let mut buffers = None;
        let mut color = None;
        let mut matrix = Mat3::IDENTITY;
        let mut out = Vec::new();

        for call in self.log.borrow().iter() {
            match call {
                Call::BindBufferPair(pair) => buffers = Some(*pair),
                Call::Uniform4f { value, .. } => color = Some(*value),
                Call::UniformMat3 { value, .. } => matrix = *value,
                Call::DrawElements { count, .. } => out.push(DrawRecord {
                    buffers,
                    color,
                    matrix,
                    count: *count,
                }),
                _ => {}
            }
        }
        out
    }
}

impl SurfaceHost for RecordingHost {
    type Context = RecordingContext;

    fn open_context(&mut self, surface_id: &str) -> Result<RecordingContext, InitError> {
        let surface = self
            .surfaces
            .iter()
            .find(|s| s.id == surface_id)
            .ok_or_else(|| InitError::SurfaceNotFound(surface_id.to_string()))?;

        if !surface.has_context {
            return Err(InitError::ContextUnavailable {
                surface: surface_id.to_string(),
                reason: "graphics not supported".to_string(),
            });
        }

        Ok(RecordingContext {
            log: Rc::clone(&self.log),
            display: Rc::clone(&surface.display),
            scale_factor: Rc::clone(&surface.scale_factor),
            backing: (0, 0),
            next_buffer: 0,
            programs: 0,
            failing_link: self.failing_link,
        })
    }
}

pub(crate) struct RecordingContext {
    log: CallLog,
    display: Rc<RefCell<Viewport>>,
    scale_factor: Rc<Cell<f64>>,
    backing: (u32, u32),
    next_buffer: u32,
    programs: u32,
    failing_link: bool,
}

impl RecordingContext {
    fn push(&self, call: Call) {
        self.log.borrow_mut().push(call);
    }
}

impl GraphicsContext for RecordingContext {
    fn compile_and_link(
        &mut self,
        _vertex_src: &str,
        _fragment_src: &str,
    ) -> Result<ProgramId, ContextError> {
        self.push(Call::CompileAndLink);
        if self.failing_link {
            return Err(ContextError::Link("recording context refused to link".into()));
        }
        let id = ProgramId::new(self.programs);
        self.programs += 1;
        Ok(id)
    }

    fn attrib_location(&self, _program: ProgramId, name: &str) -> Option<AttribLocation> {
        (name == "a_position").then_some(AttribLocation::new(POSITION))
    }

    fn uniform_location(&self, _program: ProgramId, name: &str) -> Option<UniformLocation> {
        match name {
            "u_color" => Some(UniformLocation::new(COLOR)),
            "u_matrix" => Some(UniformLocation::new(MATRIX)),
            _ => None,
        }
    }

    fn create_buffer_pair(&mut self, vertices: &[f32], indices: &[u16]) -> BufferPair {
        let pair = BufferPair {
            vertex: BufferId::new(self.next_buffer),
            index: BufferId::new(self.next_buffer + 1),
        };
        self.next_buffer += 2;
        self.push(Call::CreateBufferPair {
            pair,
            vertices: vertices.to_vec(),
            indices: indices.to_vec(),
        });
        pair
    }

    fn resize_to_display(&mut self) -> bool {
        let target = self.display_size().to_physical(self.scale_factor());
        let changed = target != self.backing;
        self.backing = target;
        self.push(Call::ResizeToDisplay { changed });
        changed
    }

    fn backing_size(&self) -> (u32, u32) {
        self.backing
    }

    fn display_size(&self) -> Viewport {
        *self.display.borrow()
    }

    fn scale_factor(&self) -> f64 {
        self.scale_factor.get()
    }

    fn set_viewport(&mut self, x: u32, y: u32, width: u32, height: u32) {
        self.push(Call::SetViewport { x, y, width, height });
    }

    fn clear(&mut self) {
        self.push(Call::Clear);
    }

    fn use_program(&mut self, program: ProgramId) {
        self.push(Call::UseProgram(program));
    }

    fn bind_buffer_pair(&mut self, buffers: BufferPair) {
        self.push(Call::BindBufferPair(buffers));
    }

    fn vertex_attrib_pointer(&mut self, location: AttribLocation, layout: VertexLayout) {
        self.push(Call::VertexAttribPointer { location, layout });
    }

    fn uniform_4f(&mut self, location: UniformLocation, value: [f32; 4]) {
        self.push(Call::Uniform4f { location, value });
    }

    fn uniform_mat3(&mut self, location: UniformLocation, value: &Mat3) {
        self.push(Call::UniformMat3 { location, value: *value });
    }

    fn draw_elements(&mut self, primitive: Primitive, count: u32) {
        self.push(Call::DrawElements { primitive, count });
    }

    fn present(&mut self) -> FrameStatus {
        self.push(Call::Present);
        FrameStatus::Presented
    }
}
