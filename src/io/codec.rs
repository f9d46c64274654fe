//! Font serialization
//!
//! A codec turns an immutable snapshot of a font's command tables into a
//! finished asset. Codecs run off the editing thread, so they only ever see
//! owned snapshots.

use crate::data::conversions::FontData;
use crate::font_source::metrics::FontInfo;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;
use tracing::info;

/// Everything a codec needs, owned
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FontSnapshot {
    pub info: FontInfo,
    pub data: FontData,
}

impl FontSnapshot {
    pub fn new(info: FontInfo, data: FontData) -> Self {
        Self { info, data }
    }

    pub fn glyph_count(&self) -> usize {
        self.data.glyphs.len()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AssetPayload {
    /// Written to disk, e.g. a UFO directory
    Directory(PathBuf),
    Bytes(Vec<u8>),
}

/// A completed encode
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FontAsset {
    pub payload: AssetPayload,
    pub glyph_count: usize,
}

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("font has no glyphs to write")]
    EmptySnapshot,

    #[error("failed to write {path}: {message}")]
    Write { path: PathBuf, message: String },

    #[error("failed to serialize font: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("codec worker is busy with another job")]
    Busy,

    #[error("codec worker has shut down")]
    WorkerGone,

    #[error("codec job failed: {0}")]
    Job(String),
}

/// Turns a snapshot into an asset. Implementations must not touch shared
/// editor state.
pub trait FontCodec: Send + Sync {
    fn name(&self) -> &'static str;
    fn encode(&self, snapshot: &FontSnapshot) -> Result<FontAsset, CodecError>;
}

/// Writes a UFO directory with norad
#[derive(Clone, Debug)]
pub struct UfoCodec {
    pub output: PathBuf,
}

impl UfoCodec {
    pub fn new(output: impl Into<PathBuf>) -> Self {
        Self { output: output.into() }
    }
}

impl FontCodec for UfoCodec {
    fn name(&self) -> &'static str {
        "ufo"
    }

    fn encode(&self, snapshot: &FontSnapshot) -> Result<FontAsset, CodecError> {
        if snapshot.data.glyphs.is_empty() {
            return Err(CodecError::EmptySnapshot);
        }
        let font = snapshot.data.to_norad_font(&snapshot.info);
        font.save(&self.output).map_err(|e| CodecError::Write {
            path: self.output.clone(),
            message: e.to_string(),
        })?;
        info!("Wrote {} glyphs to {}", snapshot.glyph_count(), self.output.display());
        Ok(FontAsset {
            payload: AssetPayload::Directory(self.output.clone()),
            glyph_count: snapshot.glyph_count(),
        })
    }
}

/// Serializes the snapshot as JSON bytes
#[derive(Clone, Copy, Debug, Default)]
pub struct JsonCodec;

impl FontCodec for JsonCodec {
    fn name(&self) -> &'static str {
        "json"
    }

    fn encode(&self, snapshot: &FontSnapshot) -> Result<FontAsset, CodecError> {
        let bytes = serde_json::to_vec(snapshot)?;
        Ok(FontAsset {
            payload: AssetPayload::Bytes(bytes),
            glyph_count: snapshot.glyph_count(),
        })
    }
}
