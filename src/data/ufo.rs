//! UFO file I/O operations

use super::conversions::FontData;
use crate::font_source::metrics::FontInfo;
use anyhow::{Context, Result};
use norad::Font;
use std::path::Path;
use tracing::info;

/// Load a UFO font file from disk
pub fn load_ufo_from_path(path: impl AsRef<Path>) -> Result<Font> {
    let path = path.as_ref();
    let font = Font::load(path).with_context(|| format!("Failed to load UFO from {}", path.display()))?;
    Ok(font)
}

/// Load a UFO and convert every glyph to a command table
pub fn load_font_data(path: impl AsRef<Path>) -> Result<(FontInfo, FontData)> {
    let path = path.as_ref();
    let font = load_ufo_from_path(path)?;
    let info = FontInfo::from_norad_font(&font);
    let data = FontData::from_norad_font(&font, Some(path.to_path_buf()));
    info!("Loaded {} with {} glyphs", info.get_display_name(), data.glyphs.len());
    Ok((info, data))
}
