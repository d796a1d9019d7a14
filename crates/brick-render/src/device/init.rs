use crate::paint::Color;

/// Initialization parameters for the wgpu backend.
#[derive(Debug, Clone)]
pub struct GpuInit {
    /// Backends wgpu may choose from.
    pub backends: wgpu::Backends,

    /// Prefer an sRGB surface format when available.
    ///
    /// Off by default: shape colors are defined as raw channel values and are
    /// expected to reach the screen unconverted.
    pub prefer_srgb: bool,

    /// Present mode (swap behavior). FIFO is supported everywhere.
    pub present_mode: wgpu::PresentMode,

    /// Optional alpha mode preference for the surface.
    ///
    /// If provided but unsupported on the current surface, a supported mode is selected.
    pub alpha_mode: Option<wgpu::CompositeAlphaMode>,

    /// Limits requested from the adapter/device.
    pub required_limits: wgpu::Limits,

    /// Desired maximum frame latency for the surface (a hint).
    pub desired_maximum_frame_latency: u32,

    /// Color the surface is cleared to at the start of each frame.
    pub clear_color: Color,
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            backends: wgpu::Backends::all(),
            prefer_srgb: false,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: None,
            required_limits: wgpu::Limits::downlevel_webgl2_defaults(),
            desired_maximum_frame_latency: 2,
            clear_color: Color::TRANSPARENT,
        }
    }
}
