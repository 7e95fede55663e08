//! GPU device and swapchain management.
//!
//! [`GpuContext`] is the adapter/device/queue triple every renderer draws
//! with, windowed or not. [`Gpu`] adds a [`WindowSurface`] for one window.

mod context;
mod gpu;
mod init;
mod surface;

pub use context::GpuContext;
pub use gpu::Gpu;
pub use init::GpuInit;
pub use surface::{SurfaceFrame, WindowSurface};
