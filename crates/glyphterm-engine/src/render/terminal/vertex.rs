use bytemuck::{Pod, Zeroable};

/// One terminal mesh vertex.
///
/// Vertex data layout (52 bytes):
///
///  offset  0  position  [f32; 3]   loc 0
///  offset 12  uv        [f32; 2]   loc 1
///  offset 20  bg_color  [f32; 4]   loc 2
///  offset 36  fg_color  [f32; 4]   loc 3
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
pub struct TerminalVertex {
    pub position: [f32; 3],
    pub uv:       [f32; 2],
    pub bg_color: [f32; 4],
    pub fg_color: [f32; 4],
}

impl TerminalVertex {
    pub const ATTRS: [wgpu::VertexAttribute; 4] = wgpu::vertex_attr_array![
        0 => Float32x3, // position
        1 => Float32x2, // uv
        2 => Float32x4, // bg_color
        3 => Float32x4  // fg_color
    ];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<TerminalVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}
