use glam::Mat4;

use crate::coords::{ColorRgba, Viewport};

use super::terminal::orthographic_view_proj;

/// Color attachment a terminal pass draws into.
///
/// The pipeline is keyed on `format`; `viewport` is the logical size used
/// by [`RenderTarget::view_proj`].
#[derive(Debug, Copy, Clone)]
pub struct RenderTarget<'a> {
    pub view: &'a wgpu::TextureView,
    pub format: wgpu::TextureFormat,
    pub viewport: Viewport,
}

impl<'a> RenderTarget<'a> {
    pub fn new(view: &'a wgpu::TextureView, format: wgpu::TextureFormat, viewport: Viewport) -> Self {
        Self { view, format, viewport }
    }

    /// Pixel-exact projection for this target: 1 world unit per logical
    /// pixel, origin at the center, +Y up.
    pub fn view_proj(&self) -> Mat4 {
        orthographic_view_proj(self.viewport)
    }

    /// Records a pass that clears the target to `color`.
    pub fn clear(&self, encoder: &mut wgpu::CommandEncoder, color: ColorRgba) {
        let _pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("glyphterm clear"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: self.view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(clear_value(color)),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });
    }
}

fn clear_value(color: ColorRgba) -> wgpu::Color {
    wgpu::Color {
        r: color.r as f64,
        g: color.g as f64,
        b: color.b as f64,
        a: color.a as f64,
    }
}
