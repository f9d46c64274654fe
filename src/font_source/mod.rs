//! Font source data structures
//!
//! This module contains everything related to the font files being edited
//! (UFO sources), as opposed to UI fonts used by the editor.

pub mod metrics;

pub use metrics::{FontInfo, FontMetrics, LineOrientation, MetricKind, MetricLine};
