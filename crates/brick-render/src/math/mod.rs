//! Small linear algebra helpers for 2D placement.

mod mat3;

pub use mat3::Mat3;
