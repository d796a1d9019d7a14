//! Coordinate types shared by the renderer and its backends.
//!
//! Canonical CPU space:
//! - Logical pixels, origin top-left, +X right, +Y down
//! - Game objects are addressed on a square grid of `UNIT_SIZE` pixel cells
//!
//! Shaders receive clip-space transforms built by `math::Mat3::projection`.

mod grid;
mod vec2;
mod viewport;

pub use grid::{grid_to_pixels, progress_scale, UNIT_SIZE};
pub use vec2::Vec2;
pub use viewport::Viewport;
