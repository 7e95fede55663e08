//! Color and viewport types shared by the grid, the renderer and the demo.
//!
//! Canonical CPU space for the terminal mesh:
//! - world units (1 per tile or 1 per font pixel, see `grid::TileScaling`)
//! - origin at the terminal pivot
//! - +X right, +Y up
//!
//! The view-projection uniform maps world units to clip space.

mod color;
mod viewport;

pub use color::{ColorRgba, ParseColorError};
pub use viewport::Viewport;
