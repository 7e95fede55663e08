use anyhow::{anyhow, Context, Result};
use winit::dpi::PhysicalSize;

use super::{GpuContext, GpuInit};

/// A configured swapchain.
///
/// A zero-area window leaves the configuration untouched until it has area
/// again; [`WindowSurface::acquire`] returns `None` meanwhile.
pub struct WindowSurface<'w> {
    surface: wgpu::Surface<'w>,
    config: wgpu::SurfaceConfiguration,
    size: PhysicalSize<u32>,
}

/// One acquired swapchain image. Present it before acquiring the next one.
pub struct SurfaceFrame {
    pub texture: wgpu::SurfaceTexture,
    pub view: wgpu::TextureView,
}

impl SurfaceFrame {
    pub fn present(self) {
        drop(self.view);
        self.texture.present();
    }
}

impl<'w> WindowSurface<'w> {
    pub(super) fn configure(
        surface: wgpu::Surface<'w>,
        gpu: &GpuContext,
        size: PhysicalSize<u32>,
        init: &GpuInit,
    ) -> Result<Self> {
        let caps = surface.get_capabilities(&gpu.adapter);
        let config = surface_config(&caps, size, init)
            .context("surface is not supported by the adapter")?;

        if has_area(size) {
            surface.configure(&gpu.device, &config);
        }
        log::debug!(
            "surface {:?} {}x{} ({:?})",
            config.format,
            config.width,
            config.height,
            config.alpha_mode
        );

        Ok(Self { surface, config, size })
    }

    pub fn format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    pub fn size(&self) -> PhysicalSize<u32> {
        self.size
    }

    pub fn resize(&mut self, gpu: &GpuContext, size: PhysicalSize<u32>) {
        self.size = size;
        if !has_area(size) {
            return;
        }
        self.config.width = size.width;
        self.config.height = size.height;
        self.surface.configure(&gpu.device, &self.config);
    }

    /// Next swapchain image, or `None` when this frame should be skipped.
    ///
    /// Lost or outdated surfaces are reconfigured here. Running out of
    /// memory is the only error.
    pub fn acquire(&mut self, gpu: &GpuContext) -> Result<Option<SurfaceFrame>> {
        if !has_area(self.size) {
            return Ok(None);
        }

        let texture = match self.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(err @ (wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated)) => {
                log::debug!("surface {err:?}; reconfiguring");
                self.surface.configure(&gpu.device, &self.config);
                return Ok(None);
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                return Err(anyhow!("out of memory while acquiring a surface texture"));
            }
            Err(err) => {
                log::debug!("surface {err:?}; skipping frame");
                return Ok(None);
            }
        };

        let view = texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        Ok(Some(SurfaceFrame { texture, view }))
    }
}

/// Surface configuration for `size`, or `None` if the surface lists no formats.
///
/// sRGB formats win when `init.prefer_srgb` is set: terminal colors are
/// linear and the target encodes them. An unsupported alpha mode request
/// falls back to the first supported one.
fn surface_config(
    caps: &wgpu::SurfaceCapabilities,
    size: PhysicalSize<u32>,
    init: &GpuInit,
) -> Option<wgpu::SurfaceConfiguration> {
    let first = *caps.formats.first()?;
    let format = if init.prefer_srgb {
        caps.formats.iter().copied().find(|f| f.is_srgb()).unwrap_or(first)
    } else {
        caps.formats.iter().copied().find(|f| !f.is_srgb()).unwrap_or(first)
    };

    let alpha_mode = init
        .alpha_mode
        .filter(|m| caps.alpha_modes.contains(m))
        .or_else(|| caps.alpha_modes.first().copied())
        .unwrap_or(wgpu::CompositeAlphaMode::Auto);

    Some(wgpu::SurfaceConfiguration {
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        format,
        width: size.width.max(1),
        height: size.height.max(1),
        present_mode: init.present_mode,
        alpha_mode,
        view_formats: vec![],
        desired_maximum_frame_latency: init.desired_maximum_frame_latency,
    })
}

fn has_area(size: PhysicalSize<u32>) -> bool {
    size.width > 0 && size.height > 0
}
