//! Terminal tile grid and the mesh builder that feeds the terminal shader.
//!
//! A grid is a rectangle of [`Tile`]s, each naming a glyph plus foreground
//! and background colors. [`MeshBuilder`] turns it into one quad per tile
//! whose UVs address the glyph's cell in a code page 437 sprite sheet.
//!
//! Coordinates: (0,0) is the bottom-left tile, +X right, +Y up.

mod glyph;
mod mesh;
mod tile;

pub use glyph::{glyph_char, glyph_index, FALLBACK_GLYPH};
pub use mesh::{FontLayout, MeshBuilder, TerminalMesh, TerminalPivot, TilePivot, TileScaling};
pub use tile::{Tile, TileGrid};
