//! Terminal fonts: code page 437 sprite sheets with a clip color.
//!
//! A [`FontSheet`] is the decoded RGBA image. [`TerminalFont`] pairs it with
//! the color regarded as glyph background, and [`TerminalFonts`] keeps fonts
//! by file name and tracks which one is active.

mod registry;
mod sheet;

pub use registry::{TerminalFont, TerminalFonts};
pub use sheet::FontSheet;
