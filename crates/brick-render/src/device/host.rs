use winit::window::Window;

use crate::gfx::{InitError, SurfaceHost};

use super::{GpuInit, WgpuContext};

/// Windows addressable by surface identifier.
///
/// Opening a context blocks on wgpu adapter/device acquisition.
pub struct WindowHost<'w> {
    init: GpuInit,
    surfaces: Vec<(String, &'w Window)>,
}

impl<'w> WindowHost<'w> {
    pub fn new(init: GpuInit) -> Self {
        Self {
            init,
            surfaces: Vec::new(),
        }
    }

    /// Registers `window` under `id`, replacing any previous entry.
    pub fn with_surface(mut self, id: impl Into<String>, window: &'w Window) -> Self {
        let id = id.into();
        self.surfaces.retain(|(existing, _)| *existing != id);
        self.surfaces.push((id, window));
        self
    }
}

impl<'w> SurfaceHost for WindowHost<'w> {
    type Context = WgpuContext<'w>;

    fn open_context(&mut self, surface_id: &str) -> Result<WgpuContext<'w>, InitError> {
        let window = self
            .surfaces
            .iter()
            .find(|(id, _)| id == surface_id)
            .map(|(_, w)| *w)
            .ok_or_else(|| InitError::SurfaceNotFound(surface_id.to_string()))?;

        pollster::block_on(WgpuContext::new(window, &self.init)).map_err(|e| {
            InitError::ContextUnavailable {
                surface: surface_id.to_string(),
                reason: format!("{e:#}"),
            }
        })
    }
}
