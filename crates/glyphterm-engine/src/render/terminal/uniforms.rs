//! Uniform buffer layouts shared with `terminal.wgsl`.
//!
//! Every struct here is `#[repr(C)]` and sized to match WGSL uniform layout
//! rules exactly; the sizes double as `min_binding_size` in the bind group
//! layouts.

use std::num::NonZeroU64;

use bytemuck::{Pod, Zeroable};
use glam::Mat4;

use crate::coords::Viewport;

/// Bind group 0, binding 0. Supplied once per frame.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct ViewUniform {
    /// Column-major view-projection matrix.
    pub view_proj: [[f32; 4]; 4],
}

impl ViewUniform {
    #[inline]
    pub fn new(view_proj: Mat4) -> Self {
        Self { view_proj: view_proj.to_cols_array_2d() }
    }

    #[inline]
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_cols_array_2d(&self.view_proj)
    }
}

impl Default for ViewUniform {
    fn default() -> Self {
        Self::new(Mat4::IDENTITY)
    }
}

/// Bind group 1, binding 0. Supplied once per draw call.
///
/// Layout (32 bytes):
///
///  offset  0  clip_color  vec4<f32>
///  offset 16  flags       u32
///  offset 20  _pad        struct tail up to the 16-byte alignment of vec4
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
pub struct MaterialUniform {
    pub clip_color: [f32; 4],
    pub flags: u32,
    pub _pad: [u32; 3],
}

impl MaterialUniform {
    #[inline]
    pub fn new(clip_color: [f32; 4], flags: u32) -> Self {
        Self { clip_color, flags, _pad: [0; 3] }
    }
}

/// Bind group 2, binding 0. Supplied once per mesh instance.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct MeshUniform {
    /// Column-major model matrix.
    pub model: [[f32; 4]; 4],
}

impl MeshUniform {
    #[inline]
    pub fn new(model: Mat4) -> Self {
        Self { model: model.to_cols_array_2d() }
    }

    #[inline]
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_cols_array_2d(&self.model)
    }
}

impl Default for MeshUniform {
    fn default() -> Self {
        Self::new(Mat4::IDENTITY)
    }
}

/// Orthographic view-projection with the origin at the viewport center.
///
/// One world unit maps to one logical pixel, +Y up. Hosts with their own
/// camera build the matrix themselves.
pub fn orthographic_view_proj(viewport: Viewport) -> Mat4 {
    let half_w = viewport.width.max(1.0) * 0.5;
    let half_h = viewport.height.max(1.0) * 0.5;
    Mat4::orthographic_rh(-half_w, half_w, -half_h, half_h, -1000.0, 1000.0)
}

pub(super) fn min_binding_size<T: Pod>() -> NonZeroU64 {
    // All uniform structs in this module are non-empty.
    NonZeroU64::new(std::mem::size_of::<T>() as u64).unwrap_or(NonZeroU64::MIN)
}
