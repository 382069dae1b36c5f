//! GPU device + surface management.
//!
//! This module is responsible for:
//! - picking the graphics backend for the platform
//! - creating the wgpu Instance/Adapter/Device/Queue
//! - creating & configuring the Surface (swapchain)
//! - acquiring frames and providing encoders/views for rendering

mod backend;
mod context;
mod init;
mod surface;

pub use backend::GraphicsBackend;
pub use context::{Gpu, GpuFrame};
pub use init::GpuInit;
pub use surface::SurfaceErrorAction;
