use anyhow::{Context, Result};
use winit::window::Window;

use super::{GpuContext, GpuInit, WindowSurface};

/// GPU context plus the swapchain of one window.
///
/// Borrows the window for the surface lifetime `'w`.
pub struct Gpu<'w> {
    pub context: GpuContext,
    pub surface: WindowSurface<'w>,
}

impl<'w> Gpu<'w> {
    pub async fn new(window: &'w Window, init: GpuInit) -> Result<Self> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
        let surface = instance
            .create_surface(window)
            .context("failed to create a surface for the window")?;

        let context = GpuContext::request(&instance, Some(&surface), &init).await?;
        let surface = WindowSurface::configure(surface, &context, window.inner_size(), &init)?;

        Ok(Self { context, surface })
    }
}
