/// Surface size in logical pixels.
///
/// This is the basis the projection matrix is built against; backing
/// resolution (physical pixels) is tracked separately by the graphics context.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Size rounded to whole physical pixels at `scale_factor`.
    #[inline]
    pub fn to_physical(self, scale_factor: f64) -> (u32, u32) {
        let w = (self.width as f64 * scale_factor).round().max(0.0) as u32;
        let h = (self.height as f64 * scale_factor).round().max(0.0) as u32;
        (w, h)
    }
}
