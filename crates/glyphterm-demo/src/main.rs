use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use glam::{Mat4, Vec3};
use winit::event::WindowEvent;
use winit::keyboard::{Key, NamedKey};

use glyphterm_engine::coords::ColorRgba;
use glyphterm_engine::core::{App, AppControl, Frame};
use glyphterm_engine::device::{GpuContext, GpuInit};
use glyphterm_engine::font::{FontSheet, TerminalFont, TerminalFonts};
use glyphterm_engine::grid::{
    glyph_char, FontLayout, MeshBuilder, TerminalMesh, Tile, TileGrid, TileScaling,
};
use glyphterm_engine::logging::{init_logging, LoggingConfig};
use glyphterm_engine::render::terminal::{
    GpuTerminalMaterial, TerminalDraw, TerminalMaterial, TerminalRenderer,
};
use glyphterm_engine::window::{Runtime, RuntimeConfig};

const GRID_W: u32 = 40;
const GRID_H: u32 = 24;

/// Command line: `glyphterm-demo [FONT_PNG | FONT_DIR] [CLIP_HEX]`.
struct Args {
    font: Option<PathBuf>,
    clip_color: ColorRgba,
}

impl Args {
    fn parse() -> Result<Self> {
        let mut args = std::env::args().skip(1);
        let font = args.next().map(PathBuf::from);
        let clip_color = match args.next() {
            Some(hex) => ColorRgba::from_hex(&hex)
                .with_context(|| format!("invalid clip color {hex:?}"))?,
            None => ColorRgba::BLACK,
        };
        Ok(Self { font, clip_color })
    }

    fn load_fonts(&self) -> Result<TerminalFonts> {
        let mut fonts = TerminalFonts::new();
        let Some(path) = &self.font else {
            return Ok(fonts);
        };

        if path.is_dir() {
            if fonts.load_dir(path, self.clip_color)? == 0 {
                bail!("no PNG fonts in {}", path.display());
            }
        } else {
            let sheet = FontSheet::open(path)?;
            fonts.insert(TerminalFont::new(sheet).with_clip_color(self.clip_color));
        }
        log::info!("fonts: {}", fonts.names().join(", "));
        Ok(fonts)
    }
}

struct Demo {
    fonts: TerminalFonts,
    font_changed: bool,

    layout: FontLayout,
    grid: TileGrid,
    status: TileGrid,
    grid_mesh: TerminalMesh,
    status_mesh: TerminalMesh,

    renderer: TerminalRenderer,
    material: Option<GpuTerminalMaterial>,
}

impl Demo {
    fn new(fonts: TerminalFonts) -> Self {
        Self {
            fonts,
            font_changed: false,
            layout: FontLayout::default(),
            grid: TileGrid::new(GRID_W, GRID_H),
            status: TileGrid::new(GRID_W, 1),
            grid_mesh: TerminalMesh::default(),
            status_mesh: TerminalMesh::default(),
            renderer: TerminalRenderer::new(),
            material: None,
        }
    }

    /// Uploads the active font and prepares its material for `format`.
    fn prepare_material(&mut self, gpu: &GpuContext, format: wgpu::TextureFormat) -> Result<()> {
        let material = match self.fonts.active() {
            Some(font) => {
                self.layout = font.layout();
                font.material(gpu)?
            }
            None => {
                self.layout = FontLayout::default();
                TerminalMaterial::default()
            }
        };
        log::debug!("preparing terminal material ({:?})", material.flags());
        self.material = Some(material.prepare(gpu, self.renderer.pipeline(gpu, format)));
        Ok(())
    }

    fn next_font(&mut self) {
        let names = self.fonts.names();
        if names.len() < 2 {
            return;
        }
        let active = self.fonts.active().map(|f| f.name().to_owned());
        let index = names.iter().position(|n| Some(*n) == active.as_deref());
        let next = names[index.map_or(0, |i| (i + 1) % names.len())].to_owned();
        if self.fonts.change_font(&next) {
            log::info!("font: {next}");
            self.font_changed = true;
        }
    }

    /// Redraws the grid contents; `t` animates the palette.
    fn fill_grid(&mut self, t: f32) {
        let frame_fg = ColorRgba::rgb(0.4, 0.8, 1.0);
        let bg = ColorRgba::rgb(0.05, 0.05, 0.1);
        self.grid.fill(Tile::new(' ', ColorRgba::WHITE, bg));

        // Border; y = 0 is the bottom row.
        let (w, h) = self.grid.size();
        for x in 1..w - 1 {
            self.grid.put_tile(x, 0, Tile::new('═', frame_fg, bg));
            self.grid.put_tile(x, h - 1, Tile::new('═', frame_fg, bg));
        }
        for y in 1..h - 1 {
            self.grid.put_tile(0, y, Tile::new('║', frame_fg, bg));
            self.grid.put_tile(w - 1, y, Tile::new('║', frame_fg, bg));
        }
        self.grid.put_tile(0, 0, Tile::new('╚', frame_fg, bg));
        self.grid.put_tile(w - 1, 0, Tile::new('╝', frame_fg, bg));
        self.grid.put_tile(0, h - 1, Tile::new('╔', frame_fg, bg));
        self.grid.put_tile(w - 1, h - 1, Tile::new('╗', frame_fg, bg));

        self.grid.put_str(2, h - 1, " glyphterm ", ColorRgba::WHITE, bg);

        // Full code page, 16×16, hue shifting over time.
        for index in 0..=255u8 {
            let (col, row) = (index as u32 % 16, index as u32 / 16);
            let phase = t + (col + row) as f32 * 0.15;
            let fg = ColorRgba::rgb(
                0.5 + 0.5 * phase.sin(),
                0.5 + 0.5 * (phase + 2.1).sin(),
                0.5 + 0.5 * (phase + 4.2).sin(),
            );
            self.grid
                .put_tile(2 + col, h - 3 - row, Tile::new(glyph_char(index), fg, bg));
        }

        // Swatches: same glyph on different backgrounds.
        let swatches = [
            ColorRgba::rgb(0.8, 0.1, 0.1),
            ColorRgba::rgb(0.1, 0.6, 0.1),
            ColorRgba::rgb(0.1, 0.2, 0.8),
            ColorRgba::rgb(0.7, 0.6, 0.1),
        ];
        for (i, swatch) in swatches.iter().enumerate() {
            let y = h - 3 - i as u32 * 2;
            self.grid.put_str(20, y, "☺ ♥ ♦ ♣", ColorRgba::WHITE, *swatch);
        }

        let status_bg = ColorRgba::rgb(0.2, 0.2, 0.3);
        self.status.fill(Tile::new(' ', ColorRgba::WHITE, status_bg));
        let font = self.fonts.active().map_or("(no font)", |f| f.name());
        let line = format!(" {font}  t = {t:6.1}s  Tab: next font  Esc: quit");
        self.status.put_str(0, 0, &line, ColorRgba::WHITE, status_bg);
    }
}

impl App for Demo {
    fn on_start(&mut self, gpu: &GpuContext, format: wgpu::TextureFormat) -> Result<()> {
        self.prepare_material(gpu, format)
    }

    fn on_event(&mut self, event: &WindowEvent) -> AppControl {
        if let WindowEvent::KeyboardInput { event, .. } = event {
            if event.state.is_pressed() {
                match &event.logical_key {
                    Key::Named(NamedKey::Escape) => return AppControl::Exit,
                    Key::Named(NamedKey::Tab) => self.next_font(),
                    _ => {}
                }
            }
        }
        AppControl::Continue
    }

    fn on_frame(&mut self, frame: &mut Frame<'_>) -> AppControl {
        if std::mem::take(&mut self.font_changed) {
            if let Err(err) = self.prepare_material(frame.gpu, frame.target.format) {
                log::error!("font switch failed: {err:#}");
            }
        }

        self.fill_grid(frame.time.elapsed);

        // The grid sits on y = 0 and the status bar hangs below it.
        let builder = MeshBuilder::new(self.layout).with_scaling(TileScaling::Pixels);
        let grid_builder = builder.with_terminal_pivot(0.5, 0.0);
        let status_builder = builder.with_terminal_pivot(0.5, 1.0);
        grid_builder.build_into(&self.grid, &mut self.grid_mesh);
        status_builder.build_into(&self.status, &mut self.status_mesh);

        let grid_size = grid_builder.world_size(&self.grid);
        let status_size = status_builder.world_size(&self.status);
        let viewport = frame.target.viewport;

        // Largest integer scale that fits the window.
        let fit = (viewport.width / grid_size.x)
            .min(viewport.height / (grid_size.y + status_size.y))
            .floor()
            .max(1.0);
        let model = Mat4::from_translation(Vec3::new(0.0, (status_size.y - grid_size.y) * 0.5 * fit, 0.0))
            * Mat4::from_scale(Vec3::new(fit, fit, 1.0));

        let Some(material) = &self.material else {
            return AppControl::Continue;
        };
        let view_proj = frame.target.view_proj();
        self.renderer.render(
            frame.gpu,
            frame.encoder,
            &frame.target,
            &[
                TerminalDraw { mesh: &self.grid_mesh, material, view_proj, model },
                TerminalDraw { mesh: &self.status_mesh, material, view_proj, model },
            ],
        );
        AppControl::Continue
    }
}

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let args = Args::parse()?;
    let demo = Demo::new(args.load_fonts()?);

    let config = RuntimeConfig {
        clear_color: ColorRgba::rgb(0.02, 0.02, 0.03),
        ..RuntimeConfig::default()
    };
    Runtime::run(config, GpuInit::default(), demo)
}
