/// Adapter, device and surface preferences.
#[derive(Debug, Clone)]
pub struct GpuInit {
    pub power_preference: wgpu::PowerPreference,

    /// Allow wgpu's software adapter when no hardware adapter is found.
    pub allow_fallback_adapter: bool,

    /// The terminal pipeline needs no optional features.
    pub required_features: wgpu::Features,
    pub required_limits: wgpu::Limits,

    /// Prefer an sRGB surface format so linear terminal colors are encoded
    /// on write.
    pub prefer_srgb: bool,
    pub present_mode: wgpu::PresentMode,

    /// Ignored if the surface does not support it.
    pub alpha_mode: Option<wgpu::CompositeAlphaMode>,
    pub desired_maximum_frame_latency: u32,
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            power_preference: wgpu::PowerPreference::HighPerformance,
            allow_fallback_adapter: true,
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
            prefer_srgb: true,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: None,
            desired_maximum_frame_latency: 2,
        }
    }
}
