//! Contracts between the runtime (platform loop) and the game.
//!
//! The game implements [`App`]; the runtime hands it a ready renderer once per
//! redrawn frame through [`FrameCtx`].

mod app;
mod ctx;

pub use app::{App, AppControl};
pub use ctx::{FrameCtx, WindowCtx};
