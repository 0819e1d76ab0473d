//! Card compositing: template, art window and SVG text overlay.

pub mod assets;
pub mod compositor;
pub mod overlay;
