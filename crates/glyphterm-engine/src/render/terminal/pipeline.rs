use super::uniforms::{min_binding_size, MaterialUniform, MeshUniform, ViewUniform};
use super::vertex::TerminalVertex;

/// WGSL source for the terminal shader pair.
pub const TERMINAL_SHADER_SOURCE: &str = include_str!("shaders/terminal.wgsl");

pub const VERTEX_ENTRY_POINT: &str = "vs_main";
pub const FRAGMENT_ENTRY_POINT: &str = "fs_main";

/// Bind group indices of the terminal shader.
pub const VIEW_GROUP: u32 = 0;
pub const MATERIAL_GROUP: u32 = 1;
pub const MESH_GROUP: u32 = 2;

/// Render pipeline options chosen by the host.
#[derive(Debug, Clone)]
pub struct TerminalPipelineConfig {
    /// Blend state for the single color target. `None` disables blending.
    ///
    /// The shader writes straight-alpha colors, so the default is
    /// `ALPHA_BLENDING`.
    pub blend: Option<wgpu::BlendState>,

    pub label: &'static str,
}

impl Default for TerminalPipelineConfig {
    fn default() -> Self {
        Self {
            blend: Some(wgpu::BlendState::ALPHA_BLENDING),
            label: "glyphterm terminal",
        }
    }
}

/// Compiled terminal pipeline plus the three bind group layouts it was built with.
pub struct TerminalPipeline {
    pub format: wgpu::TextureFormat,
    pub pipeline: wgpu::RenderPipeline,
    pub view_layout: wgpu::BindGroupLayout,
    pub material_layout: wgpu::BindGroupLayout,
    pub mesh_layout: wgpu::BindGroupLayout,
}

impl TerminalPipeline {
    pub fn new(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        config: &TerminalPipelineConfig,
    ) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("glyphterm terminal shader"),
            source: wgpu::ShaderSource::Wgsl(TERMINAL_SHADER_SOURCE.into()),
        });

        let view_layout = view_bind_group_layout(device);
        let material_layout = material_bind_group_layout(device);
        let mesh_layout = mesh_bind_group_layout(device);

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("glyphterm terminal pipeline layout"),
            bind_group_layouts: &[&view_layout, &material_layout, &mesh_layout],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(config.label),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some(VERTEX_ENTRY_POINT),
                compilation_options: Default::default(),
                buffers: &[TerminalVertex::layout()],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some(FRAGMENT_ENTRY_POINT),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: config.blend,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        log::debug!("terminal pipeline built for {format:?}");

        Self {
            format,
            pipeline,
            view_layout,
            material_layout,
            mesh_layout,
        }
    }
}

fn uniform_entry(
    binding: u32,
    visibility: wgpu::ShaderStages,
    size: std::num::NonZeroU64,
    has_dynamic_offset: bool,
) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset,
            min_binding_size: Some(size),
        },
        count: None,
    }
}

/// Group 0: view-projection uniform, one dynamic-offset slot per draw.
pub fn view_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("glyphterm view bgl"),
        entries: &[uniform_entry(
            0,
            wgpu::ShaderStages::VERTEX,
            min_binding_size::<ViewUniform>(),
            true,
        )],
    })
}

/// Group 1: material uniform, font texture and its sampler.
pub fn material_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("glyphterm material bgl"),
        entries: &[
            uniform_entry(0, wgpu::ShaderStages::FRAGMENT, min_binding_size::<MaterialUniform>(), false),
            // Texture
            wgpu::BindGroupLayoutEntry {
                binding: 1,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Texture {
                    sample_type: wgpu::TextureSampleType::Float { filterable: true },
                    view_dimension: wgpu::TextureViewDimension::D2,
                    multisampled: false,
                },
                count: None,
            },
            // Texture sampler
            wgpu::BindGroupLayoutEntry {
                binding: 2,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                count: None,
            },
        ],
    })
}

/// Group 2: model transform uniform, one dynamic-offset slot per draw.
pub fn mesh_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("glyphterm mesh bgl"),
        entries: &[uniform_entry(
            0,
            wgpu::ShaderStages::VERTEX,
            min_binding_size::<MeshUniform>(),
            true,
        )],
    })
}
