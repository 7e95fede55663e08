use std::num::NonZeroU64;
use std::ops::Range;

use glam::Mat4;

use crate::device::GpuContext;
use crate::grid::TerminalMesh;
use crate::render::RenderTarget;

use super::material::GpuTerminalMaterial;
use super::pipeline::{TerminalPipeline, TerminalPipelineConfig, MATERIAL_GROUP, MESH_GROUP, VIEW_GROUP};
use super::uniforms::{MeshUniform, ViewUniform};
use super::vertex::TerminalVertex;

/// One terminal instance: its mesh, material and transforms.
pub struct TerminalDraw<'a> {
    pub mesh: &'a TerminalMesh,
    pub material: &'a GpuTerminalMaterial,
    pub view_proj: Mat4,
    pub model: Mat4,
}

/// Renders terminals with prepared terminal materials.
///
/// Every draw gets its own view and mesh uniform slot (dynamic offsets into
/// one buffer) and its own range of a shared vertex/index buffer. Uploads go
/// through `Queue::write_buffer` and land before the submission, so record
/// all terminals of a submission with a single [`TerminalRenderer::render`]
/// call.
///
/// The pipeline is rebuilt when the target format changes. Buffers grow to
/// the next power of two and are never shrunk.
pub struct TerminalRenderer {
    config: TerminalPipelineConfig,
    pipeline: Option<TerminalPipeline>,

    uniforms: Option<GrowBuffer>,
    bind_groups: Option<DrawBindGroups>,
    vertices: Option<GrowBuffer>,
    indices: Option<GrowBuffer>,

    staging: Staging,
}

/// CPU copies of one pass's uniforms and geometry, reused between calls.
#[derive(Default)]
struct Staging {
    uniform_bytes: Vec<u8>,
    vertices: Vec<TerminalVertex>,
    indices: Vec<u32>,
}

struct GrowBuffer {
    buffer: wgpu::Buffer,
    capacity: u64,
}

/// View (group 0) and mesh (group 2) bind groups over the uniform buffer.
struct DrawBindGroups {
    view: wgpu::BindGroup,
    mesh: wgpu::BindGroup,
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self::with_config(TerminalPipelineConfig::default())
    }
}

impl TerminalRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: TerminalPipelineConfig) -> Self {
        Self {
            config,
            pipeline: None,
            uniforms: None,
            bind_groups: None,
            vertices: None,
            indices: None,
            staging: Staging::default(),
        }
    }

    /// Returns the pipeline for `format`, building it if needed.
    ///
    /// Materials are prepared against this pipeline's material layout.
    pub fn pipeline(&mut self, gpu: &GpuContext, format: wgpu::TextureFormat) -> &TerminalPipeline {
        if self.pipeline.as_ref().is_some_and(|p| p.format != format) {
            log::debug!("target format changed to {format:?}; rebuilding terminal pipeline");
            self.pipeline = None;
            self.bind_groups = None;
        }
        self.pipeline
            .get_or_insert_with(|| TerminalPipeline::new(&gpu.device, format, &self.config))
    }

    /// Records one pass drawing `draws` in order into `target`.
    ///
    /// Draws with empty meshes are skipped; nothing is recorded if all are.
    pub fn render(
        &mut self,
        gpu: &GpuContext,
        encoder: &mut wgpu::CommandEncoder,
        target: &RenderTarget<'_>,
        draws: &[TerminalDraw<'_>],
    ) {
        let draws: Vec<&TerminalDraw<'_>> = draws.iter().filter(|d| !d.mesh.is_empty()).collect();
        if draws.is_empty() {
            return;
        }

        self.pipeline(gpu, target.format);
        let stride = uniform_stride(gpu.uniform_offset_alignment());
        let ranges = self.staging.stage(
            draws.iter().map(|d| (d.mesh, d.view_proj, d.model)),
            stride,
        );
        self.upload(gpu, stride);

        let (Some(pipeline), Some(bind_groups), Some(vbo), Some(ibo)) = (
            self.pipeline.as_ref(),
            self.bind_groups.as_ref(),
            self.vertices.as_ref(),
            self.indices.as_ref(),
        ) else {
            return;
        };

        let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("glyphterm terminal pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        rpass.set_pipeline(&pipeline.pipeline);
        rpass.set_vertex_buffer(0, vbo.buffer.slice(..));
        rpass.set_index_buffer(ibo.buffer.slice(..), wgpu::IndexFormat::Uint32);

        for (slot, (draw, range)) in draws.iter().zip(ranges).enumerate() {
            let view_offset = (2 * slot as u64 * stride) as wgpu::DynamicOffset;
            let mesh_offset = view_offset + stride as wgpu::DynamicOffset;

            rpass.set_bind_group(VIEW_GROUP, &bind_groups.view, &[view_offset]);
            rpass.set_bind_group(MATERIAL_GROUP, &draw.material.bind_group, &[]);
            rpass.set_bind_group(MESH_GROUP, &bind_groups.mesh, &[mesh_offset]);
            rpass.draw_indexed(range, 0, 0..1);
        }

        log::trace!(
            "terminal pass: {} draws, {} vertices, {} indices",
            draws.len(),
            self.staging.vertices.len(),
            self.staging.indices.len()
        );
    }

    fn upload(&mut self, gpu: &GpuContext, stride: u64) {
        let uniform_bytes = self.staging.uniform_bytes.len() as u64;
        if GrowBuffer::ensure(
            &mut self.uniforms,
            gpu,
            "glyphterm draw uniforms",
            wgpu::BufferUsages::UNIFORM,
            uniform_bytes,
        ) {
            self.bind_groups = None;
        }
        GrowBuffer::ensure(
            &mut self.vertices,
            gpu,
            "glyphterm terminal vbo",
            wgpu::BufferUsages::VERTEX,
            std::mem::size_of_val(self.staging.vertices.as_slice()) as u64,
        );
        GrowBuffer::ensure(
            &mut self.indices,
            gpu,
            "glyphterm terminal ibo",
            wgpu::BufferUsages::INDEX,
            std::mem::size_of_val(self.staging.indices.as_slice()) as u64,
        );

        if self.bind_groups.is_none() {
            if let (Some(pipeline), Some(uniforms)) = (self.pipeline.as_ref(), self.uniforms.as_ref()) {
                self.bind_groups = Some(DrawBindGroups::new(gpu, pipeline, &uniforms.buffer));
            }
        }

        let (Some(uniforms), Some(vbo), Some(ibo)) =
            (self.uniforms.as_ref(), self.vertices.as_ref(), self.indices.as_ref())
        else {
            return;
        };
        gpu.queue.write_buffer(&uniforms.buffer, 0, &self.staging.uniform_bytes);
        gpu.queue.write_buffer(&vbo.buffer, 0, bytemuck::cast_slice(&self.staging.vertices));
        gpu.queue.write_buffer(&ibo.buffer, 0, bytemuck::cast_slice(&self.staging.indices));

        log::trace!("uploaded {} uniform slots (stride {stride})", uniform_bytes / stride.max(1));
    }
}

impl Staging {
    /// Packs `(mesh, view_proj, model)` of every draw and returns each draw's
    /// index range.
    ///
    /// Draw `i` owns uniform slots `2i` (view) and `2i + 1` (mesh). Indices
    /// are rebased onto the shared vertex buffer here, so draws do not depend
    /// on `base_vertex` support.
    fn stage<'m>(
        &mut self,
        draws: impl ExactSizeIterator<Item = (&'m TerminalMesh, Mat4, Mat4)>,
        stride: u64,
    ) -> Vec<Range<u32>> {
        let stride = stride as usize;
        self.uniform_bytes.clear();
        self.uniform_bytes.resize(draws.len() * 2 * stride, 0);
        self.vertices.clear();
        self.indices.clear();

        draws
            .enumerate()
            .map(|(slot, (mesh, view_proj, model))| {
                let view_at = 2 * slot * stride;
                self.write_slot(view_at, bytemuck::bytes_of(&ViewUniform::new(view_proj)));
                self.write_slot(view_at + stride, bytemuck::bytes_of(&MeshUniform::new(model)));

                let base = self.vertices.len() as u32;
                let first = self.indices.len() as u32;
                self.vertices.extend_from_slice(&mesh.vertices);
                self.indices.extend(mesh.indices.iter().map(|i| i + base));
                first..self.indices.len() as u32
            })
            .collect()
    }

    fn write_slot(&mut self, at: usize, data: &[u8]) {
        self.uniform_bytes[at..at + data.len()].copy_from_slice(data);
    }
}

impl GrowBuffer {
    /// Makes sure `slot` holds at least `bytes`; returns `true` if it was
    /// (re)created.
    fn ensure(
        slot: &mut Option<GrowBuffer>,
        gpu: &GpuContext,
        label: &str,
        usage: wgpu::BufferUsages,
        bytes: u64,
    ) -> bool {
        if slot.as_ref().is_some_and(|b| b.capacity >= bytes) {
            return false;
        }

        let capacity = grown_capacity(bytes);
        *slot = Some(GrowBuffer {
            buffer: gpu.device.create_buffer(&wgpu::BufferDescriptor {
                label: Some(label),
                size: capacity,
                usage: usage | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            }),
            capacity,
        });
        log::debug!("{label} grown to {capacity} bytes");
        true
    }
}

impl DrawBindGroups {
    fn new(gpu: &GpuContext, pipeline: &TerminalPipeline, uniforms: &wgpu::Buffer) -> Self {
        let bind = |label: &str, layout: &wgpu::BindGroupLayout, size: usize| {
            gpu.device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some(label),
                layout,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                        buffer: uniforms,
                        offset: 0,
                        size: NonZeroU64::new(size as u64),
                    }),
                }],
            })
        };

        Self {
            view: bind("glyphterm view bind group", &pipeline.view_layout, std::mem::size_of::<ViewUniform>()),
            mesh: bind("glyphterm mesh bind group", &pipeline.mesh_layout, std::mem::size_of::<MeshUniform>()),
        }
    }
}

/// Distance between uniform slots: a 64-byte matrix rounded up to the
/// device's dynamic offset alignment.
fn uniform_stride(alignment: u64) -> u64 {
    let size = std::mem::size_of::<ViewUniform>().max(std::mem::size_of::<MeshUniform>()) as u64;
    size.next_multiple_of(alignment.max(1))
}

/// Next power of two, never below 256 bytes.
fn grown_capacity(required: u64) -> u64 {
    required.next_power_of_two().max(256)
}
