//! Font data: UFO loading and conversion to command tables

pub mod conversions;
pub mod ufo;

pub use conversions::{ComponentData, FontData, GlyphData};
pub use ufo::{load_font_data, load_ufo_from_path};
