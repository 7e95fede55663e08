use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};

use crate::coords::ColorRgba;
use crate::device::GpuContext;
use crate::grid::FontLayout;
use crate::render::terminal::TerminalMaterial;

use super::sheet::FontSheet;

/// A font sheet and the color on it regarded as glyph background.
#[derive(Debug, Clone, PartialEq)]
pub struct TerminalFont {
    sheet: FontSheet,
    clip_color: ColorRgba,
}

impl TerminalFont {
    /// Black is the default clip color.
    pub fn new(sheet: FontSheet) -> Self {
        Self { sheet, clip_color: ColorRgba::BLACK }
    }

    pub fn with_clip_color(mut self, clip_color: ColorRgba) -> Self {
        self.clip_color = clip_color;
        self
    }

    /// The file name of the font, including extension.
    pub fn name(&self) -> &str {
        self.sheet.name()
    }

    pub fn sheet(&self) -> &FontSheet {
        &self.sheet
    }

    /// The clip color, as it appears in the font image.
    pub fn clip_color(&self) -> ColorRgba {
        self.clip_color
    }

    pub fn change_clip_color(&mut self, clip_color: ColorRgba) {
        self.clip_color = clip_color;
    }

    pub fn layout(&self) -> FontLayout {
        self.sheet.layout()
    }

    pub fn pixels_per_unit(&self) -> u32 {
        self.sheet.pixels_per_unit()
    }

    /// Uploads the sheet and returns a textured material keyed on this
    /// font's clip color.
    pub fn material(&self, gpu: &GpuContext) -> Result<TerminalMaterial> {
        let texture = self.sheet.upload(gpu)?;
        Ok(TerminalMaterial::from(texture).with_clip_color(self.clip_color))
    }
}

/// Fonts by name, plus the one currently in use.
#[derive(Debug, Default)]
pub struct TerminalFonts {
    map: HashMap<String, TerminalFont>,
    active: Option<String>,
}

impl TerminalFonts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a font. The first font added becomes active.
    pub fn insert(&mut self, font: TerminalFont) {
        let name = font.name().to_owned();
        if self.active.is_none() {
            self.active = Some(name.clone());
        }
        if self.map.insert(name.clone(), font).is_some() {
            log::debug!("replaced terminal font {name:?}");
        }
    }

    /// Loads every `.png` in `dir` with the given clip color. Returns how many
    /// fonts were added; undecodable files are skipped with a warning.
    pub fn load_dir(&mut self, dir: impl AsRef<Path>, clip_color: ColorRgba) -> Result<usize> {
        let dir = dir.as_ref();
        let entries = std::fs::read_dir(dir)
            .with_context(|| format!("failed to read font directory {}", dir.display()))?;

        let mut paths = Vec::new();
        for entry in entries {
            let path = entry?.path();
            let is_png = path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("png"));
            if is_png {
                paths.push(path);
            }
        }
        paths.sort();

        let mut added = 0;
        for path in paths {
            match FontSheet::open(&path) {
                Ok(sheet) => {
                    self.insert(TerminalFont::new(sheet).with_clip_color(clip_color));
                    added += 1;
                }
                Err(err) => log::warn!("skipping font {}: {err:#}", path.display()),
            }
        }
        Ok(added)
    }

    /// Retrieves a font by its full file name.
    pub fn get(&self, name: &str) -> Option<&TerminalFont> {
        self.map.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut TerminalFont> {
        self.map.get_mut(name)
    }

    /// Sorted font names.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.map.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Makes `name` the active font. Unknown names leave the active font as is
    /// and return `false`.
    pub fn change_font(&mut self, name: &str) -> bool {
        if !self.map.contains_key(name) {
            log::warn!("unknown terminal font {name:?}");
            return false;
        }
        self.active = Some(name.to_owned());
        true
    }

    pub fn active(&self) -> Option<&TerminalFont> {
        self.active.as_deref().and_then(|name| self.map.get(name))
    }

    pub fn active_mut(&mut self) -> Option<&mut TerminalFont> {
        match self.active.as_deref() {
            Some(name) => self.map.get_mut(name),
            None => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn font(name: &str, size: u32) -> TerminalFont {
        let bytes = vec![0; (size * size * 4) as usize];
        TerminalFont::new(FontSheet::from_rgba8(name, size, size, bytes).unwrap())
    }

    // ── terminal font ──

    #[test]
    fn clip_color_defaults_to_black() {
        assert_eq!(font("a.png", 16).clip_color(), ColorRgba::BLACK);
    }

    #[test]
    fn change_clip_color_replaces_it() {
        let mut f = font("a.png", 16);
        let magenta = ColorRgba::from_hex("ff00ff").unwrap();
        f.change_clip_color(magenta);
        assert_eq!(f.clip_color(), magenta);
        assert_eq!(f.with_clip_color(ColorRgba::WHITE).clip_color(), ColorRgba::WHITE);
    }

    #[test]
    fn layout_follows_sheet() {
        let f = font("px437_8x8.png", 128);
        assert_eq!(f.layout().tile_px, (8, 8));
        assert_eq!(f.pixels_per_unit(), 8);
    }

    // ── registry ──

    #[test]
    fn lookup_by_name() {
        let mut fonts = TerminalFonts::new();
        assert!(fonts.is_empty());
        fonts.insert(font("pastiche_8x8.png", 128));
        fonts.insert(font("taffer_10x10.png", 160));
        assert_eq!(fonts.len(), 2);
        assert_eq!(fonts.get("taffer_10x10.png").unwrap().pixels_per_unit(), 10);
        assert!(fonts.get("taffer_10x10").is_none());
        assert_eq!(fonts.names(), ["pastiche_8x8.png", "taffer_10x10.png"]);
    }

    #[test]
    fn first_font_is_active() {
        let mut fonts = TerminalFonts::new();
        assert!(fonts.active().is_none());
        fonts.insert(font("a.png", 16));
        fonts.insert(font("b.png", 32));
        assert_eq!(fonts.active().unwrap().name(), "a.png");
    }

    #[test]
    fn change_font_switches_active() {
        let mut fonts = TerminalFonts::new();
        fonts.insert(font("a.png", 16));
        fonts.insert(font("b.png", 32));
        assert!(fonts.change_font("b.png"));
        assert_eq!(fonts.active().unwrap().name(), "b.png");
    }

    #[test]
    fn change_to_unknown_font_keeps_active() {
        let mut fonts = TerminalFonts::new();
        fonts.insert(font("a.png", 16));
        assert!(!fonts.change_font("missing.png"));
        assert_eq!(fonts.active().unwrap().name(), "a.png");
    }

    #[test]
    fn clip_color_edits_stick_in_registry() {
        let mut fonts = TerminalFonts::new();
        fonts.insert(font("a.png", 16));
        fonts.active_mut().unwrap().change_clip_color(ColorRgba::WHITE);
        assert_eq!(fonts.get("a.png").unwrap().clip_color(), ColorRgba::WHITE);
        fonts.get_mut("a.png").unwrap().change_clip_color(ColorRgba::BLACK);
        assert_eq!(fonts.active().unwrap().clip_color(), ColorRgba::BLACK);
    }

    #[test]
    fn insert_replaces_same_name() {
        let mut fonts = TerminalFonts::new();
        fonts.insert(font("a.png", 16));
        fonts.insert(font("a.png", 32));
        assert_eq!(fonts.len(), 1);
        assert_eq!(fonts.get("a.png").unwrap().pixels_per_unit(), 2);
    }

    #[test]
    fn load_dir_reads_pngs_and_skips_others() {
        let dir = std::env::temp_dir().join(format!("glyphterm-fonts-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        image::RgbaImage::new(16, 16).save(dir.join("tiny_1x1.png")).unwrap();
        std::fs::write(dir.join("broken.png"), b"nope").unwrap();
        std::fs::write(dir.join("readme.txt"), b"fonts").unwrap();

        let mut fonts = TerminalFonts::new();
        let added = fonts.load_dir(&dir, ColorRgba::WHITE).unwrap();
        std::fs::remove_dir_all(&dir).unwrap();

        assert_eq!(added, 1);
        assert_eq!(fonts.names(), ["tiny_1x1.png"]);
        assert_eq!(fonts.active().unwrap().clip_color(), ColorRgba::WHITE);
    }
}
