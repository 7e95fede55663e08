//! Contract between the window runtime and the application drawing terminals.

mod app;
mod frame;

pub use app::{App, AppControl};
pub use frame::{logical_viewport, Frame};
