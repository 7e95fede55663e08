//! glyphterm engine crate.
//!
//! Owns the terminal shader and its wgpu binding contract, the tile grid that
//! feeds it, the fonts it samples, and the platform + GPU runtime pieces the
//! demo runs on.

pub mod device;
pub mod window;
pub mod time;
pub mod core;

pub mod logging;
pub mod coords;
pub mod font;
pub mod grid;
pub mod render;
