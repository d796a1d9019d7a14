//! Brick renderer crate.
//!
//! Draws the game's fixed set of rectangles (bricks, creatures, hearts and a
//! progress bar) with one shader program and one transform per draw, and
//! provides the wgpu/winit runtime that hosts it.

pub mod core;
pub mod device;
pub mod window;

pub mod coords;
pub mod gfx;
pub mod logging;
pub mod math;
pub mod paint;
pub mod render;
