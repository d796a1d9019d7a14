//! Fill colors used by the shape registry.

pub mod color;

pub use color::Color;
