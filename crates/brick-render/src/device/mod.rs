//! wgpu backend.
//!
//! This module is responsible for:
//! - creating the wgpu Instance/Adapter/Device/Queue
//! - creating & configuring the Surface (swapchain)
//! - implementing `gfx::GraphicsContext` on top of them
//! - resolving surface identifiers to windows (`WindowHost`)

mod context;
mod gpu;
mod host;
mod init;
mod reflect;
mod surface;

pub use context::WgpuContext;
pub use gpu::{Gpu, GpuFrame};
pub use host::WindowHost;
pub use init::GpuInit;
