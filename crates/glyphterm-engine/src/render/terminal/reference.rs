//! CPU model of the terminal shader pair.
//!
//! Mirrors `terminal.wgsl` operation for operation so the per-vertex and
//! per-pixel rules can be checked without a GPU, and so hosts can predict
//! what a given tile will look like (e.g. for picking or screenshots).

use glam::{Vec2, Vec3, Vec4, Vec4Swizzles};

use super::material::TerminalMaterialFlags;
use super::uniforms::{MaterialUniform, MeshUniform, ViewUniform};
use super::vertex::TerminalVertex;

/// Per-channel tolerance of the clip color match. Same literal as `CLIP_EPSILON`
/// in the shader.
pub const CLIP_EPSILON: f32 = 0.001;

/// Output of the vertex stage / input of the fragment stage.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct VertexOutput {
    pub clip_position: Vec4,
    pub world_position: Vec4,
    pub uv: Vec2,
    pub bg_color: Vec4,
    pub fg_color: Vec4,
}

/// Something the fragment stage can sample a color from.
pub trait TexelSource {
    fn sample(&self, uv: Vec2) -> Vec4;
}

/// Returns the same texel everywhere.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SolidTexel(pub Vec4);

impl TexelSource for SolidTexel {
    fn sample(&self, _uv: Vec2) -> Vec4 {
        self.0
    }
}

/// In-memory RGBA image sampled nearest-neighbour with clamp-to-edge,
/// matching [`FontTexture::create_sampler`](super::FontTexture::create_sampler).
#[derive(Debug, Clone, PartialEq)]
pub struct TexelGrid {
    width: u32,
    height: u32,
    texels: Vec<Vec4>,
}

impl TexelGrid {
    /// Returns `None` if `texels.len() != width * height` or a dimension is zero.
    pub fn new(width: u32, height: u32, texels: Vec<Vec4>) -> Option<Self> {
        let len = (width as usize).checked_mul(height as usize)?;
        if len == 0 || texels.len() != len {
            return None;
        }
        Some(Self { width, height, texels })
    }

    /// Builds a grid from tightly packed RGBA8 unorm bytes.
    pub fn from_rgba8(width: u32, height: u32, bytes: &[u8]) -> Option<Self> {
        if bytes.len() % 4 != 0 {
            return None;
        }
        let texels = bytes
            .chunks_exact(4)
            .map(|px| Vec4::new(px[0] as f32, px[1] as f32, px[2] as f32, px[3] as f32) / 255.0)
            .collect();
        Self::new(width, height, texels)
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

impl TexelSource for TexelGrid {
    fn sample(&self, uv: Vec2) -> Vec4 {
        let x = ((uv.x * self.width as f32).floor() as i64).clamp(0, self.width as i64 - 1);
        let y = ((uv.y * self.height as f32).floor() as i64).clamp(0, self.height as i64 - 1);
        self.texels[y as usize * self.width as usize + x as usize]
    }
}

/// `vs_main`.
pub fn vertex_stage(view: &ViewUniform, mesh: &MeshUniform, vertex: &TerminalVertex) -> VertexOutput {
    let world_position = mesh.matrix() * Vec3::from(vertex.position).extend(1.0);

    VertexOutput {
        clip_position: view.matrix() * world_position,
        world_position,
        uv: Vec2::from(vertex.uv),
        bg_color: Vec4::from(vertex.bg_color),
        fg_color: Vec4::from(vertex.fg_color),
    }
}

/// `fs_main`.
pub fn fragment_stage<T: TexelSource + ?Sized>(
    material: &MaterialUniform,
    input: &VertexOutput,
    texels: &T,
) -> Vec4 {
    let flags = TerminalMaterialFlags::from_bits_retain(material.flags);
    if !flags.contains(TerminalMaterialFlags::TEXTURE) {
        return input.fg_color;
    }

    let tex_color = texels.sample(input.uv);
    if is_clip_texel(tex_color.xyz(), Vec4::from(material.clip_color).xyz()) {
        input.bg_color
    } else {
        (tex_color.xyz() * input.fg_color.xyz()).extend(input.fg_color.w)
    }
}

/// True when every channel differs from the clip color by strictly less than
/// [`CLIP_EPSILON`].
#[inline]
pub fn is_clip_texel(texel_rgb: Vec3, clip_rgb: Vec3) -> bool {
    (texel_rgb - clip_rgb).abs().cmplt(Vec3::splat(CLIP_EPSILON)).all()
}

/// Linear interpolation of vertex outputs across a triangle, as the
/// rasterizer does before invoking the fragment stage.
///
/// `bary` holds the weights of `a`, `b` and `c`; they are expected to sum to 1.
pub fn interpolate(a: &VertexOutput, b: &VertexOutput, c: &VertexOutput, bary: Vec3) -> VertexOutput {
    let mix4 = |x: Vec4, y: Vec4, z: Vec4| x * bary.x + y * bary.y + z * bary.z;
    let mix2 = |x: Vec2, y: Vec2, z: Vec2| x * bary.x + y * bary.y + z * bary.z;

    VertexOutput {
        clip_position: mix4(a.clip_position, b.clip_position, c.clip_position),
        world_position: mix4(a.world_position, b.world_position, c.world_position),
        uv: mix2(a.uv, b.uv, c.uv),
        bg_color: mix4(a.bg_color, b.bg_color, c.bg_color),
        fg_color: mix4(a.fg_color, b.fg_color, c.fg_color),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Mat4, Quat};

    const RED: [f32; 4] = [1.0, 0.0, 0.0, 1.0];
    const GREEN: [f32; 4] = [0.0, 1.0, 0.0, 1.0];
    const BLACK: [f32; 4] = [0.0, 0.0, 0.0, 1.0];

    fn frag(fg: [f32; 4], bg: [f32; 4]) -> VertexOutput {
        VertexOutput {
            clip_position: Vec4::ZERO,
            world_position: Vec4::ZERO,
            uv: Vec2::new(0.5, 0.5),
            bg_color: Vec4::from(bg),
            fg_color: Vec4::from(fg),
        }
    }

    fn textured(clip: [f32; 4]) -> MaterialUniform {
        MaterialUniform::new(clip, TerminalMaterialFlags::TEXTURE.bits())
    }

    fn approx(a: Vec4, b: Vec4) -> bool {
        (a - b).abs().max_element() < 1e-5
    }

    // ── vertex stage ──────────────────────────────────────────────────────

    #[test]
    fn clip_position_is_view_proj_times_model_times_position() {
        let view_proj = Mat4::orthographic_rh(-40.0, 40.0, -12.5, 12.5, -1.0, 1.0)
            * Mat4::from_translation(glam::Vec3::new(-3.0, 1.0, 0.0));
        let model = Mat4::from_scale_rotation_translation(
            glam::Vec3::new(2.0, 2.0, 1.0),
            Quat::from_rotation_z(0.3),
            glam::Vec3::new(5.0, -7.0, 0.0),
        );
        let vertex = TerminalVertex {
            position: [1.5, -2.0, 0.25],
            uv: [0.125, 0.875],
            bg_color: GREEN,
            fg_color: RED,
        };

        let out = vertex_stage(&ViewUniform::new(view_proj), &MeshUniform::new(model), &vertex);

        let expected = view_proj * model * Vec4::new(1.5, -2.0, 0.25, 1.0);
        assert!(approx(out.clip_position, expected));
        assert!(approx(out.world_position, model * Vec4::new(1.5, -2.0, 0.25, 1.0)));
    }

    #[test]
    fn vertex_attributes_pass_through() {
        let vertex = TerminalVertex {
            position: [0.0; 3],
            uv: [0.25, 0.75],
            bg_color: [0.1, 0.2, 0.3, 0.4],
            fg_color: [0.5, 0.6, 0.7, 0.8],
        };
        let out = vertex_stage(&ViewUniform::default(), &MeshUniform::default(), &vertex);
        assert_eq!(out.uv, Vec2::new(0.25, 0.75));
        assert_eq!(out.bg_color, Vec4::new(0.1, 0.2, 0.3, 0.4));
        assert_eq!(out.fg_color, Vec4::new(0.5, 0.6, 0.7, 0.8));
        assert_eq!(out.clip_position, Vec4::new(0.0, 0.0, 0.0, 1.0));
    }

    // ── fragment stage ────────────────────────────────────────────────────

    #[test]
    fn untextured_outputs_foreground_regardless_of_texture() {
        let material = MaterialUniform::new(BLACK, 0);
        for texel in [Vec4::ZERO, Vec4::ONE, Vec4::new(0.3, 0.9, 0.1, 0.5)] {
            let out = fragment_stage(&material, &frag([0.2, 0.4, 0.6, 0.8], GREEN), &SolidTexel(texel));
            assert_eq!(out, Vec4::new(0.2, 0.4, 0.6, 0.8));
        }
    }

    #[test]
    fn clip_texel_outputs_background() {
        let out = fragment_stage(&textured(BLACK), &frag(RED, GREEN), &SolidTexel(Vec4::from(BLACK)));
        assert_eq!(out, Vec4::new(0.0, 1.0, 0.0, 1.0));
    }

    #[test]
    fn background_keeps_interpolated_alpha() {
        let bg = [0.0, 0.0, 1.0, 0.25];
        let out = fragment_stage(&textured(BLACK), &frag(RED, bg), &SolidTexel(Vec4::ZERO));
        assert_eq!(out, Vec4::from(bg));
    }

    #[test]
    fn ink_texel_is_tinted_by_foreground() {
        let out = fragment_stage(&textured(BLACK), &frag(RED, GREEN), &SolidTexel(Vec4::ONE));
        assert_eq!(out, Vec4::new(1.0, 0.0, 0.0, 1.0));
    }

    #[test]
    fn ink_alpha_comes_from_foreground_not_texel() {
        let fg = [0.5, 0.5, 0.5, 0.6];
        let texel = Vec4::new(0.8, 0.4, 0.2, 0.1);
        let out = fragment_stage(&textured(BLACK), &frag(fg, GREEN), &SolidTexel(texel));
        assert!(approx(out, Vec4::new(0.4, 0.2, 0.1, 0.6)));
    }

    #[test]
    fn texel_alpha_is_ignored_for_clip_match() {
        let out = fragment_stage(
            &textured(BLACK),
            &frag(RED, GREEN),
            &SolidTexel(Vec4::new(0.0, 0.0, 0.0, 0.0)),
        );
        assert_eq!(out, Vec4::from(GREEN));
    }

    #[test]
    fn near_clip_texel_within_epsilon_is_background() {
        let clip = [0.5, 0.5, 0.5, 1.0];
        let texel = Vec4::new(0.5 + 0.0009, 0.5 - 0.0009, 0.5, 1.0);
        let out = fragment_stage(&textured(clip), &frag(RED, GREEN), &SolidTexel(texel));
        assert_eq!(out, Vec4::from(GREEN));
    }

    #[test]
    fn difference_of_epsilon_is_ink() {
        // Strict `<`: a texel exactly CLIP_EPSILON away falls on the ink branch.
        // Start from 0 so the offset is representable without rounding back under.
        let texel = Vec4::new(0.0, CLIP_EPSILON, 0.0, 1.0);
        assert!(!is_clip_texel(texel.xyz(), Vec3::ZERO));

        let out = fragment_stage(&textured(BLACK), &frag([1.0, 1.0, 1.0, 1.0], GREEN), &SolidTexel(texel));
        assert!(approx(out, Vec4::new(0.0, CLIP_EPSILON, 0.0, 1.0)));
    }

    #[test]
    fn only_bit_zero_enables_texturing() {
        let material = MaterialUniform::new(BLACK, 0b1110);
        let out = fragment_stage(&material, &frag(RED, GREEN), &SolidTexel(Vec4::ZERO));
        assert_eq!(out, Vec4::from(RED));
    }

    #[test]
    fn shader_uses_same_epsilon_literal() {
        let src = super::super::pipeline::TERMINAL_SHADER_SOURCE;
        assert!(src.contains("const CLIP_EPSILON: f32 = 0.001;"));
        assert_eq!(CLIP_EPSILON, 0.001);
    }

    // ── texel grid ────────────────────────────────────────────────────────

    #[test]
    fn texel_grid_samples_nearest_and_clamps() {
        let grid = TexelGrid::from_rgba8(
            2,
            1,
            &[0, 0, 0, 255, 255, 255, 255, 255],
        )
        .unwrap();
        assert_eq!(grid.sample(Vec2::new(0.25, 0.5)), Vec4::new(0.0, 0.0, 0.0, 1.0));
        assert_eq!(grid.sample(Vec2::new(0.75, 0.5)), Vec4::ONE);
        assert_eq!(grid.sample(Vec2::new(-3.0, 9.0)), Vec4::new(0.0, 0.0, 0.0, 1.0));
        assert_eq!(grid.sample(Vec2::new(1.0, 1.0)), Vec4::ONE);
    }

    #[test]
    fn texel_grid_rejects_mismatched_size() {
        assert!(TexelGrid::new(2, 2, vec![Vec4::ZERO; 3]).is_none());
        assert!(TexelGrid::new(0, 2, vec![]).is_none());
    }

    #[test]
    fn texel_grid_rejects_overflowing_size() {
        // 65536 * 65536 wraps to 0 in u32.
        assert!(TexelGrid::new(65_536, 65_536, vec![]).is_none());
        assert!(TexelGrid::new(u32::MAX, u32::MAX, vec![Vec4::ONE]).is_none());
        assert!(TexelGrid::from_rgba8(1, 1, &[0; 5]).is_none());
    }

    // ── interpolation ─────────────────────────────────────────────────────

    #[test]
    fn interpolation_at_vertex_returns_vertex() {
        let a = frag(RED, GREEN);
        let b = frag(GREEN, RED);
        let c = frag(BLACK, BLACK);
        assert_eq!(interpolate(&a, &b, &c, Vec3::new(0.0, 1.0, 0.0)), b);
    }

    #[test]
    fn interpolated_foreground_survives_untextured_pass() {
        let a = frag(RED, BLACK);
        let b = frag(GREEN, BLACK);
        let c = frag(GREEN, BLACK);
        let mid = interpolate(&a, &b, &c, Vec3::new(0.5, 0.25, 0.25));
        let out = fragment_stage(&MaterialUniform::new(BLACK, 0), &mid, &SolidTexel(Vec4::ONE));
        assert!(approx(out, Vec4::new(0.5, 0.5, 0.0, 1.0)));
    }
}
