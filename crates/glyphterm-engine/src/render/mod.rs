//! GPU rendering subsystem.
//!
//! The terminal renderer consumes [`TerminalMesh`](crate::grid::TerminalMesh)es
//! and issues wgpu commands through the `terminal.wgsl` shader pair.
//!
//! Convention:
//! - CPU geometry is in world units, +Y up.
//! - The vertex shader applies `view_proj * model` from bind groups 0 and 2.

mod target;
pub mod terminal;

pub use target::RenderTarget;
