use anyhow::{Context, Result};

use super::GpuInit;

/// Adapter, device and queue shared by everything that draws terminals.
///
/// Windowed hosts get one from [`Gpu`](super::Gpu); offscreen hosts and tests
/// call [`GpuContext::headless`].
pub struct GpuContext {
    pub adapter: wgpu::Adapter,
    pub adapter_info: wgpu::AdapterInfo,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
}

impl GpuContext {
    /// Opens a device with no surface attached.
    ///
    /// Tries a hardware adapter first, then wgpu's software adapter when
    /// `init.allow_fallback_adapter` is set. Callers that can run without a
    /// GPU (tests) should treat the error as "skip".
    pub async fn headless(init: &GpuInit) -> Result<Self> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
        Self::request(&instance, None, init).await
    }

    /// Picks an adapter (compatible with `surface` when given) and opens a device.
    pub(super) async fn request(
        instance: &wgpu::Instance,
        surface: Option<&wgpu::Surface<'_>>,
        init: &GpuInit,
    ) -> Result<Self> {
        let options = |force_fallback_adapter| wgpu::RequestAdapterOptions {
            power_preference: init.power_preference,
            compatible_surface: surface,
            force_fallback_adapter,
        };

        let adapter = match instance.request_adapter(&options(false)).await {
            Ok(adapter) => adapter,
            Err(err) if init.allow_fallback_adapter => {
                log::debug!("no hardware adapter ({err}); trying the fallback adapter");
                instance
                    .request_adapter(&options(true))
                    .await
                    .context("no GPU adapter available, not even a fallback one")?
            }
            Err(err) => return Err(err).context("no GPU adapter available"),
        };

        let adapter_info = adapter.get_info();
        log::info!(
            "adapter {} ({:?}, {:?})",
            adapter_info.name,
            adapter_info.backend,
            adapter_info.device_type
        );

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("glyphterm device"),
                required_features: init.required_features,
                required_limits: init.required_limits.clone(),
                experimental_features: wgpu::ExperimentalFeatures::disabled(),
                memory_hints: wgpu::MemoryHints::Performance,
                trace: wgpu::Trace::Off,
            })
            .await
            .context("failed to open the wgpu device")?;

        Ok(Self {
            adapter,
            adapter_info,
            device,
            queue,
        })
    }

    /// Uniform offsets handed to `set_bind_group` must be multiples of this.
    pub fn uniform_offset_alignment(&self) -> u64 {
        self.device.limits().min_uniform_buffer_offset_alignment as u64
    }

    pub fn create_encoder(&self, label: &str) -> wgpu::CommandEncoder {
        self.device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor { label: Some(label) })
    }

    pub fn submit(&self, encoder: wgpu::CommandEncoder) -> wgpu::SubmissionIndex {
        self.queue.submit(std::iter::once(encoder.finish()))
    }
}
