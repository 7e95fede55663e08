use glam::Vec2;

use crate::render::terminal::TerminalVertex;

use super::glyph::glyph_index;
use super::tile::TileGrid;

/// Layout of the font sprite sheet.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FontLayout {
    /// Glyphs per row of the sheet.
    pub columns: u32,
    /// Rows of glyphs in the sheet.
    pub rows: u32,
    /// Size of one glyph in texture pixels.
    pub tile_px: (u32, u32),
}

impl Default for FontLayout {
    /// A 16×16 code page 437 sheet of 8×8 glyphs.
    fn default() -> Self {
        Self {
            columns: 16,
            rows: 16,
            tile_px: (8, 8),
        }
    }
}

impl FontLayout {
    /// Derives the glyph size of a 16×16 sheet from its texture size.
    pub fn from_texture_size(width: u32, height: u32) -> Self {
        Self {
            columns: 16,
            rows: 16,
            tile_px: ((width / 16).max(1), (height / 16).max(1)),
        }
    }

    /// `(uv_min, uv_max)` of sprite `index`; v grows downward in the image.
    pub fn uv_rect(&self, index: u8) -> (Vec2, Vec2) {
        let columns = self.columns.max(1);
        let rows = self.rows.max(1);
        let col = index as u32 % columns;
        let row = (index as u32 / columns).min(rows - 1);

        let step = Vec2::new(1.0 / columns as f32, 1.0 / rows as f32);
        let min = Vec2::new(col as f32, row as f32) * step;
        (min, min + step)
    }
}

/// Where the mesh origin sits on the terminal, (0,0) bottom-left.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TerminalPivot(pub Vec2);

impl Default for TerminalPivot {
    fn default() -> Self {
        Self(Vec2::new(0.5, 0.5))
    }
}

/// Where each tile's quad sits relative to its cell corner, (0,0) bottom-left.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct TilePivot(pub Vec2);

/// How big a tile is in world units.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum TileScaling {
    /// Each tile takes 1×1 world units. Meant for square fonts.
    #[default]
    World,
    /// One font pixel is one world unit. Supports non-square fonts.
    Pixels,
}

/// CPU-side terminal geometry: 4 vertices and 6 indices per tile.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TerminalMesh {
    pub vertices: Vec<TerminalVertex>,
    pub indices: Vec<u32>,
}

impl TerminalMesh {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    #[inline]
    pub fn tile_count(&self) -> usize {
        self.vertices.len() / 4
    }
}

/// Builds [`TerminalMesh`]es from [`TileGrid`]s.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct MeshBuilder {
    pub font: FontLayout,
    pub terminal_pivot: TerminalPivot,
    pub tile_pivot: TilePivot,
    pub scaling: TileScaling,
}

impl MeshBuilder {
    pub fn new(font: FontLayout) -> Self {
        Self { font, ..Self::default() }
    }

    pub fn with_terminal_pivot(mut self, x: f32, y: f32) -> Self {
        self.terminal_pivot = TerminalPivot(Vec2::new(x, y));
        self
    }

    pub fn with_tile_pivot(mut self, x: f32, y: f32) -> Self {
        self.tile_pivot = TilePivot(Vec2::new(x, y));
        self
    }

    pub fn with_scaling(mut self, scaling: TileScaling) -> Self {
        self.scaling = scaling;
        self
    }

    /// Size of one tile in world units.
    pub fn tile_size(&self) -> Vec2 {
        match self.scaling {
            TileScaling::World => Vec2::ONE,
            TileScaling::Pixels => Vec2::new(self.font.tile_px.0 as f32, self.font.tile_px.1 as f32),
        }
    }

    /// Size of the whole grid in world units.
    pub fn world_size(&self, grid: &TileGrid) -> Vec2 {
        let (w, h) = grid.size();
        Vec2::new(w as f32, h as f32) * self.tile_size()
    }

    pub fn build(&self, grid: &TileGrid) -> TerminalMesh {
        let mut mesh = TerminalMesh::default();
        self.build_into(grid, &mut mesh);
        mesh
    }

    /// Rebuilds `mesh` in place, reusing its allocations.
    pub fn build_into(&self, grid: &TileGrid, mesh: &mut TerminalMesh) {
        mesh.vertices.clear();
        mesh.indices.clear();
        mesh.vertices.reserve(grid.len() * 4);
        mesh.indices.reserve(grid.len() * 6);

        let tile_size = self.tile_size();
        let origin = -self.world_size(grid) * self.terminal_pivot.0 - tile_size * self.tile_pivot.0;

        for (x, y, tile) in grid.iter() {
            let min = origin + Vec2::new(x as f32, y as f32) * tile_size;
            let max = min + tile_size;
            let (uv_min, uv_max) = self.font.uv_rect(glyph_index(tile.glyph));

            let fg_color = tile.fg.to_array();
            let bg_color = tile.bg.to_array();
            let vertex = |px: f32, py: f32, u: f32, v: f32| TerminalVertex {
                position: [px, py, 0.0],
                uv: [u, v],
                bg_color,
                fg_color,
            };

            let base = mesh.vertices.len() as u32;
            // bottom-left, bottom-right, top-right, top-left (counter-clockwise)
            mesh.vertices.extend_from_slice(&[
                vertex(min.x, min.y, uv_min.x, uv_max.y),
                vertex(max.x, min.y, uv_max.x, uv_max.y),
                vertex(max.x, max.y, uv_max.x, uv_min.y),
                vertex(min.x, max.y, uv_min.x, uv_min.y),
            ]);
            mesh.indices
                .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        }
    }
}
