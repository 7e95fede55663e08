//! Terminal shader pair and its wgpu binding contract.
//!
//! Bind groups:
//! - group 0, binding 0: [`ViewUniform`] (vertex)
//! - group 1, binding 0: [`MaterialUniform`] (fragment)
//! - group 1, bindings 1/2: font texture + filtering sampler (fragment)
//! - group 2, binding 0: [`MeshUniform`] (vertex)
//!
//! Vertex attributes: [`TerminalVertex`] at locations 0..=3.

mod material;
mod pipeline;
pub mod reference;
mod renderer;
mod uniforms;
mod vertex;

pub use material::{FontTexture, GpuTerminalMaterial, TerminalMaterial, TerminalMaterialFlags};
pub use pipeline::{
    material_bind_group_layout, mesh_bind_group_layout, view_bind_group_layout, TerminalPipeline,
    TerminalPipelineConfig, FRAGMENT_ENTRY_POINT, MATERIAL_GROUP, MESH_GROUP, TERMINAL_SHADER_SOURCE,
    VERTEX_ENTRY_POINT, VIEW_GROUP,
};
pub use renderer::{TerminalDraw, TerminalRenderer};
pub use uniforms::{orthographic_view_proj, MaterialUniform, MeshUniform, ViewUniform};
pub use vertex::TerminalVertex;
