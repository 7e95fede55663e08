use crate::coords::ColorRgba;

/// One terminal cell.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Tile {
    pub glyph: char,
    pub fg: ColorRgba,
    pub bg: ColorRgba,
}

impl Default for Tile {
    fn default() -> Self {
        Self {
            glyph: ' ',
            fg: ColorRgba::WHITE,
            bg: ColorRgba::BLACK,
        }
    }
}

impl Tile {
    #[inline]
    pub fn new(glyph: char, fg: ColorRgba, bg: ColorRgba) -> Self {
        Self { glyph, fg, bg }
    }
}

/// Fixed-size grid of tiles, stored row by row from the bottom row up.
#[derive(Debug, Clone, PartialEq)]
pub struct TileGrid {
    width: u32,
    height: u32,
    tiles: Vec<Tile>,
}

impl TileGrid {
    /// Creates a grid filled with default tiles.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            tiles: vec![Tile::default(); width as usize * height as usize],
        }
    }

    /// `(width, height)` in tiles.
    #[inline]
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> Option<usize> {
        (x < self.width && y < self.height).then(|| (y * self.width + x) as usize)
    }

    pub fn get(&self, x: u32, y: u32) -> Option<&Tile> {
        self.index(x, y).map(|i| &self.tiles[i])
    }

    pub fn get_mut(&mut self, x: u32, y: u32) -> Option<&mut Tile> {
        self.index(x, y).map(|i| &mut self.tiles[i])
    }

    /// Tiles with their grid coordinates, bottom row first.
    pub fn iter(&self) -> impl Iterator<Item = (u32, u32, &Tile)> + '_ {
        let width = self.width.max(1);
        self.tiles
            .iter()
            .enumerate()
            .map(move |(i, t)| (i as u32 % width, i as u32 / width, t))
    }

    /// Replaces the glyph at `(x, y)`, keeping its colors.
    ///
    /// Returns `false` if the position is outside the grid.
    pub fn put_char(&mut self, x: u32, y: u32, glyph: char) -> bool {
        match self.get_mut(x, y) {
            Some(tile) => {
                tile.glyph = glyph;
                true
            }
            None => false,
        }
    }

    /// Replaces the whole tile at `(x, y)`.
    pub fn put_tile(&mut self, x: u32, y: u32, tile: Tile) -> bool {
        match self.get_mut(x, y) {
            Some(t) => {
                *t = tile;
                true
            }
            None => false,
        }
    }

    /// Writes `text` left to right starting at `(x, y)` with the given colors.
    ///
    /// No wrapping: characters past the right edge are dropped. Returns the
    /// number of tiles written.
    pub fn put_str(&mut self, x: u32, y: u32, text: &str, fg: ColorRgba, bg: ColorRgba) -> usize {
        if y >= self.height {
            return 0;
        }
        let mut written = 0;
        for (cx, c) in (x..self.width).zip(text.chars()) {
            if self.put_tile(cx, y, Tile::new(c, fg, bg)) {
                written += 1;
            }
        }
        written
    }

    /// Sets every tile to `tile`.
    pub fn fill(&mut self, tile: Tile) {
        self.tiles.fill(tile);
    }

    /// Resets every tile to the default.
    pub fn clear(&mut self) {
        self.fill(Tile::default());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: ColorRgba = ColorRgba::rgb(1.0, 0.0, 0.0);
    const BLUE: ColorRgba = ColorRgba::rgb(0.0, 0.0, 1.0);

    #[test]
    fn new_grid_is_blank() {
        let grid = TileGrid::new(4, 3);
        assert_eq!(grid.size(), (4, 3));
        assert_eq!(grid.len(), 12);
        assert!(grid.iter().all(|(_, _, t)| *t == Tile::default()));
    }

    #[test]
    fn out_of_range_writes_are_rejected() {
        let mut grid = TileGrid::new(2, 2);
        assert!(!grid.put_char(2, 0, 'x'));
        assert!(!grid.put_char(0, 2, 'x'));
        assert!(grid.get(5, 5).is_none());
        assert_eq!(grid.put_str(0, 9, "hi", RED, BLUE), 0);
    }

    #[test]
    fn put_char_keeps_colors() {
        let mut grid = TileGrid::new(2, 2);
        grid.put_tile(1, 1, Tile::new('a', RED, BLUE));
        assert!(grid.put_char(1, 1, 'b'));
        assert_eq!(grid.get(1, 1), Some(&Tile::new('b', RED, BLUE)));
    }

    #[test]
    fn put_str_clips_at_right_edge() {
        let mut grid = TileGrid::new(5, 1);
        assert_eq!(grid.put_str(2, 0, "hello", RED, BLUE), 3);
        let row: String = grid.iter().map(|(_, _, t)| t.glyph).collect();
        assert_eq!(row, "  hel");
        assert_eq!(grid.get(4, 0).map(|t| t.fg), Some(RED));
    }

    #[test]
    fn iter_reports_bottom_row_first() {
        let mut grid = TileGrid::new(2, 2);
        grid.put_char(1, 1, '#');
        let coords: Vec<(u32, u32)> = grid.iter().map(|(x, y, _)| (x, y)).collect();
        assert_eq!(coords, vec![(0, 0), (1, 0), (0, 1), (1, 1)]);
        assert_eq!(grid.iter().last().map(|(_, _, t)| t.glyph), Some('#'));
    }

    #[test]
    fn clear_resets_tiles() {
        let mut grid = TileGrid::new(3, 1);
        grid.fill(Tile::new('x', RED, BLUE));
        grid.clear();
        assert!(grid.iter().all(|(_, _, t)| t.glyph == ' '));
    }
}
