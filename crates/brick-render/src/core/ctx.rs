use winit::window::{Window, WindowId};

use crate::device::WgpuContext;
use crate::gfx::FrameStatus;
use crate::render::RectRenderer;
use crate::window::RuntimeCtx;

use super::app::AppControl;

/// Per-window handles and immutable window metadata.
pub struct WindowCtx<'a> {
    pub id: WindowId,
    pub window: &'a Window,
}

/// Per-frame context passed to `core::App::on_frame`.
///
/// Lifetimes:
/// - `'a` is the duration of the callback invocation
/// - `'w` is the window borrow carried by the wgpu context
pub struct FrameCtx<'a, 'w> {
    pub window: WindowCtx<'a>,
    pub renderer: &'a mut RectRenderer<WgpuContext<'w>>,
    /// Frames driven so far for this window.
    pub frame_index: u64,
    pub runtime: &'a mut RuntimeCtx,
}

impl<'w> FrameCtx<'_, 'w> {
    /// Brackets `draw` with `begin_frame` / `end_frame`.
    ///
    /// Returns `Exit` only when presentation failed fatally.
    pub fn render<F>(&mut self, draw: F) -> AppControl
    where
        F: FnOnce(&mut RectRenderer<WgpuContext<'w>>),
    {
        self.renderer.begin_frame();
        draw(&mut *self.renderer);

        match self.renderer.end_frame() {
            FrameStatus::Fatal => AppControl::Exit,
            _ => AppControl::Continue,
        }
    }
}
