//! Window + runtime loop.
//!
//! Owns the `winit` EventLoop and windows, brings up one `RectRenderer` per
//! window, forwards size changes to `RectRenderer::resize`, and drives the
//! game once per redraw.

mod runtime;

pub use runtime::{Runtime, RuntimeConfig, RuntimeCtx};
