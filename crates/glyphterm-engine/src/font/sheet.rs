use std::path::Path;

use anyhow::{ensure, Context, Result};

use crate::device::GpuContext;
use crate::grid::FontLayout;
use crate::render::terminal::FontTexture;

/// A decoded sprite sheet, 16×16 glyphs, sRGB-encoded RGBA8 rows top to bottom.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontSheet {
    name: String,
    width: u32,
    height: u32,
    rgba: Vec<u8>,
}

impl FontSheet {
    /// Wraps raw texels. Fails unless `rgba` holds exactly `width * height`
    /// texels of 4 bytes.
    pub fn from_rgba8(name: impl Into<String>, width: u32, height: u32, rgba: Vec<u8>) -> Result<Self> {
        let name = name.into();
        ensure!(width > 0 && height > 0, "font {name:?} has an empty sheet ({width}x{height})");
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(4))
            .with_context(|| format!("font {name:?} sheet {width}x{height} is too large"))?;
        ensure!(
            rgba.len() == expected,
            "font {name:?} sheet {width}x{height} needs {expected} bytes, got {}",
            rgba.len()
        );
        Ok(Self { name, width, height, rgba })
    }

    /// Decodes a PNG held in memory.
    pub fn decode_png(name: impl Into<String>, bytes: &[u8]) -> Result<Self> {
        let name = name.into();
        let img = image::load_from_memory_with_format(bytes, image::ImageFormat::Png)
            .with_context(|| format!("failed to decode font {name:?}"))?
            .to_rgba8();
        let (width, height) = img.dimensions();
        Self::from_rgba8(name, width, height, img.into_raw())
    }

    /// Loads an image file; the font is named after the file name.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .with_context(|| format!("font path {} has no file name", path.display()))?;
        let img = image::open(path)
            .with_context(|| format!("failed to load font sheet {}", path.display()))?
            .to_rgba8();
        let (width, height) = img.dimensions();
        log::info!("font sheet {} ({width}x{height})", path.display());
        Self::from_rgba8(name, width, height, img.into_raw())
    }

    /// The file name of the font, including extension.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn rgba(&self) -> &[u8] {
        &self.rgba
    }

    pub fn layout(&self) -> FontLayout {
        FontLayout::from_texture_size(self.width, self.height)
    }

    /// Vertical texels of one glyph.
    pub fn pixels_per_unit(&self) -> u32 {
        self.layout().tile_px.1
    }

    /// Uploads the sheet as an sRGB texture.
    pub fn upload(&self, gpu: &GpuContext) -> Result<FontTexture> {
        FontTexture::from_rgba8(gpu, self.width, self.height, &self.rgba)
    }
}
