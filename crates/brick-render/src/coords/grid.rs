use super::Vec2;

/// Edge length of one grid cell in logical pixels.
pub const UNIT_SIZE: f32 = 30.0;

/// Top-left pixel offset of the grid cell at `(col, row)`.
#[inline]
pub fn grid_to_pixels(col: i32, row: i32) -> Vec2 {
    Vec2::new(col as f32, row as f32) * UNIT_SIZE
}

/// Horizontal fill factor of the progress bar for `percent` (0–100).
///
/// Not clamped: 150 yields 1.5 and a negative percent mirrors the bar.
#[inline]
pub fn progress_scale(percent: f32) -> f32 {
    percent / 100.0
}
