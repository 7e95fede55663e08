//! The material used for terminal rendering.
//!
//! A terminal font is a sprite sheet of glyphs with no alpha channel of its
//! own: every texel equal to the material's `clip_color` is background, every
//! other texel is glyph ink. The material carries that clip color and the
//! (optional) font texture; [`TerminalMaterial::prepare`] turns it into the
//! bind group 1 resources of the terminal shader.
//!
//! Without a texture the shader skips sampling and draws the foreground color
//! of every vertex, which is handy for solid blocks and debugging.

use anyhow::{ensure, Result};
use wgpu::util::DeviceExt;

use crate::coords::ColorRgba;
use crate::device::GpuContext;
use crate::grid::FontLayout;

use super::pipeline::TerminalPipeline;
use super::uniforms::MaterialUniform;

// NOTE: These must match the constants in terminal.wgsl!
bitflags::bitflags! {
    /// Feature bits of the material uniform's `flags` field.
    #[repr(transparent)]
    #[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
    pub struct TerminalMaterialFlags: u32 {
        const TEXTURE = 1 << 0;
    }
}

/// A font sprite sheet on the GPU with the sampler used to read it.
#[derive(Debug, Clone)]
pub struct FontTexture {
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
    pub format: wgpu::TextureFormat,
    /// Size in texels.
    pub size: (u32, u32),
}

impl FontTexture {
    /// Uploads an sRGB-encoded RGBA8 sheet, the usual form of PNG fonts.
    pub fn from_rgba8(gpu: &GpuContext, width: u32, height: u32, rgba: &[u8]) -> Result<Self> {
        Self::upload(gpu, width, height, rgba, wgpu::TextureFormat::Rgba8UnormSrgb)
    }

    /// Uploads tightly packed 4-byte texels in `format`
    /// (`Rgba8Unorm` or `Rgba8UnormSrgb`).
    pub fn upload(
        gpu: &GpuContext,
        width: u32,
        height: u32,
        rgba: &[u8],
        format: wgpu::TextureFormat,
    ) -> Result<Self> {
        ensure!(
            matches!(format, wgpu::TextureFormat::Rgba8Unorm | wgpu::TextureFormat::Rgba8UnormSrgb),
            "font textures must be RGBA8, got {format:?}"
        );
        let expected = checked_rgba8_len(width, height);
        ensure!(
            expected == Some(rgba.len()),
            "font sheet {width}x{height} needs {expected:?} bytes, got {}",
            rgba.len()
        );
        Ok(Self::create(gpu, width, height, rgba, format))
    }

    fn create(gpu: &GpuContext, width: u32, height: u32, rgba: &[u8], format: wgpu::TextureFormat) -> Self {
        let texture = gpu.device.create_texture_with_data(
            &gpu.queue,
            &wgpu::TextureDescriptor {
                label: Some("glyphterm font"),
                size: wgpu::Extent3d { width, height, depth_or_array_layers: 1 },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format,
                usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
                view_formats: &[],
            },
            wgpu::util::TextureDataOrder::LayerMajor,
            rgba,
        );
        log::debug!("uploaded font texture {width}x{height} {format:?}");

        Self {
            view: texture.create_view(&wgpu::TextureViewDescriptor::default()),
            sampler: Self::create_sampler(&gpu.device),
            format,
            size: (width, height),
        }
    }

    /// Glyph grid of this sheet, assuming 16×16 glyphs.
    pub fn layout(&self) -> FontLayout {
        FontLayout::from_texture_size(self.size.0, self.size.1)
    }

    /// Nearest-neighbour, clamp-to-edge sampler.
    ///
    /// Linear filtering would blend ink and clip texels at glyph edges into
    /// colors that match neither, so pixel fonts should use this.
    pub fn create_sampler(device: &wgpu::Device) -> wgpu::Sampler {
        device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("glyphterm font sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            mipmap_filter: wgpu::MipmapFilterMode::Nearest,
            ..Default::default()
        })
    }
}

fn checked_rgba8_len(width: u32, height: u32) -> Option<usize> {
    if width == 0 || height == 0 {
        return None;
    }
    (width as usize).checked_mul(height as usize)?.checked_mul(4)
}

/// The material for rendering a terminal.
#[derive(Debug, Clone)]
pub struct TerminalMaterial {
    /// The color on the font texture regarded as "background", as written
    /// in the font image.
    ///
    /// For sRGB textures it is decoded to linear before upload, matching what
    /// the sampler returns for the same texel.
    pub clip_color: ColorRgba,

    /// The font texture rendered by the terminal.
    pub texture: Option<FontTexture>,
}

impl Default for TerminalMaterial {
    fn default() -> Self {
        Self {
            clip_color: ColorRgba::BLACK,
            texture: None,
        }
    }
}

impl From<FontTexture> for TerminalMaterial {
    fn from(texture: FontTexture) -> Self {
        Self {
            clip_color: ColorRgba::BLACK,
            texture: Some(texture),
        }
    }
}

impl TerminalMaterial {
    pub fn with_clip_color(mut self, clip_color: ColorRgba) -> Self {
        self.clip_color = clip_color;
        self
    }

    pub fn flags(&self) -> TerminalMaterialFlags {
        let mut flags = TerminalMaterialFlags::empty();
        if self.texture.is_some() {
            flags |= TerminalMaterialFlags::TEXTURE;
        }
        flags
    }

    /// Clip color in the space the shader compares texels in.
    pub fn sampled_clip_color(&self) -> ColorRgba {
        sampled_clip_color(self.clip_color, self.texture.as_ref().map(|t| t.format))
    }

    /// The GPU representation of this material's uniform data.
    pub fn uniform(&self) -> MaterialUniform {
        MaterialUniform::new(self.sampled_clip_color().to_array(), self.flags().bits())
    }

    /// Creates the uniform buffer and bind group for bind group 1.
    pub fn prepare(&self, gpu: &GpuContext, pipeline: &TerminalPipeline) -> GpuTerminalMaterial {
        let device = &gpu.device;
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("glyphterm material ubo"),
            contents: bytemuck::bytes_of(&self.uniform()),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let texture = match &self.texture {
            Some(texture) => texture.clone(),
            None => FontTexture::create(gpu, 1, 1, &[255; 4], wgpu::TextureFormat::Rgba8Unorm),
        };

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("glyphterm material bind group"),
            layout: &pipeline.material_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&texture.view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&texture.sampler),
                },
            ],
        });

        let flags = self.flags();
        log::debug!("prepared terminal material (flags {flags:?}, clip {:?})", self.clip_color);

        GpuTerminalMaterial { buffer, bind_group, flags }
    }
}

/// The prepared GPU resources of a [`TerminalMaterial`].
#[derive(Debug)]
pub struct GpuTerminalMaterial {
    pub buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
    pub flags: TerminalMaterialFlags,
}

impl GpuTerminalMaterial {
    /// Rewrites the uniform in place.
    ///
    /// Only the clip color can change this way; attaching or removing a
    /// texture changes the bind group and needs a new `prepare`.
    pub fn update(&mut self, queue: &wgpu::Queue, material: &TerminalMaterial) {
        if material.flags() != self.flags {
            log::warn!(
                "terminal material texture changed ({:?} -> {:?}); re-prepare it to rebind",
                self.flags,
                material.flags()
            );
        }
        let uniform = MaterialUniform::new(material.uniform().clip_color, self.flags.bits());
        queue.write_buffer(&self.buffer, 0, bytemuck::bytes_of(&uniform));
    }
}

fn sampled_clip_color(clip: ColorRgba, format: Option<wgpu::TextureFormat>) -> ColorRgba {
    match format {
        Some(format) if format.is_srgb() => clip.srgb_to_linear(),
        _ => clip,
    }
}
