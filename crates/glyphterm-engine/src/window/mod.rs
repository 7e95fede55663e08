//! Single-window winit host: owns the window, its [`Gpu`](crate::device::Gpu)
//! and frame clock, and drives an [`App`](crate::core::App).

mod runtime;

pub use runtime::{Runtime, RuntimeConfig};
