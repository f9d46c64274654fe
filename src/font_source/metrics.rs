//! Font metrics and measurement data
//!
//! This module contains structures for font metrics like ascender,
//! descender, x-height, and other measurement information, plus the
//! metric lines that points snap to while editing.

use norad::Font;
use serde::{Deserialize, Serialize};

const DEFAULT_UNITS_PER_EM: f64 = 1024.0;

/// Font information
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FontInfo {
    pub family_name: String,
    pub style_name: String,
    pub metrics: FontMetrics,
}

/// Font metrics for spacing and positioning
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FontMetrics {
    pub units_per_em: f64,
    pub descender: Option<f64>,
    pub x_height: Option<f64>,
    pub cap_height: Option<f64>,
    pub ascender: Option<f64>,
    pub italic_angle: Option<f64>,
    pub line_height: f64,
}

impl Default for FontMetrics {
    fn default() -> Self {
        Self::with_units_per_em(DEFAULT_UNITS_PER_EM)
    }
}

/// Which way a guide line runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LineOrientation {
    /// Constant y; snaps the y coordinate
    Horizontal,
    /// Constant x; snaps the x coordinate
    Vertical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MetricKind {
    Baseline,
    Ascender,
    Descender,
    CapHeight,
    XHeight,
    LeftBearing,
    AdvanceWidth,
}

/// A fixed font metric line in glyph space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricLine {
    pub kind: MetricKind,
    pub orientation: LineOrientation,
    pub value: f64,
}

impl MetricLine {
    pub fn horizontal(kind: MetricKind, value: f64) -> Self {
        Self {
            kind,
            orientation: LineOrientation::Horizontal,
            value,
        }
    }

    pub fn vertical(kind: MetricKind, value: f64) -> Self {
        Self {
            kind,
            orientation: LineOrientation::Vertical,
            value,
        }
    }
}

impl FontInfo {
    /// Extract font info from norad Font
    pub fn from_norad_font(font: &Font) -> Self {
        Self {
            family_name: Self::extract_string_field(&font.font_info, |info| &info.family_name, "Untitled"),
            style_name: Self::extract_string_field(&font.font_info, |info| &info.style_name, "Regular"),
            metrics: FontMetrics::from_ufo(font),
        }
    }

    /// Helper to extract string fields with defaults
    fn extract_string_field<F>(font_info: &norad::FontInfo, getter: F, default: &str) -> String
    where
        F: Fn(&norad::FontInfo) -> &Option<String>,
    {
        getter(font_info)
            .as_ref()
            .cloned()
            .unwrap_or_else(|| default.to_string())
    }

    /// Get a display name combining family and style names
    pub fn get_display_name(&self) -> String {
        let parts: Vec<&str> = [&self.family_name, &self.style_name]
            .iter()
            .filter(|s| !s.is_empty())
            .map(|s| s.as_str())
            .collect();

        if parts.is_empty() {
            "Untitled Font".to_string()
        } else {
            parts.join(" ")
        }
    }

    /// Convert back to norad FontInfo
    pub fn to_norad_font_info(&self) -> norad::FontInfo {
        let mut info = norad::FontInfo::default();

        if !self.family_name.is_empty() {
            info.family_name = Some(self.family_name.clone());
        }
        if !self.style_name.is_empty() {
            info.style_name = Some(self.style_name.clone());
        }

        if let Some(units_per_em) =
            norad::fontinfo::NonNegativeIntegerOrFloat::new(self.metrics.units_per_em)
        {
            info.units_per_em = Some(units_per_em);
        }
        info.ascender = self.metrics.ascender;
        info.descender = self.metrics.descender;
        info.x_height = self.metrics.x_height;
        info.cap_height = self.metrics.cap_height;
        info.italic_angle = self.metrics.italic_angle;
        info
    }
}

impl FontMetrics {
    /// Metrics with every optional value left to the UPM based defaults
    pub fn with_units_per_em(units_per_em: f64) -> Self {
        Self {
            units_per_em,
            descender: None,
            x_height: None,
            cap_height: None,
            ascender: None,
            italic_angle: None,
            line_height: units_per_em,
        }
    }

    /// Extract metrics from a UFO
    pub fn from_ufo(ufo: &Font) -> Self {
        let font_info = &ufo.font_info;

        let units_per_em = font_info
            .units_per_em
            .map(|v| v.to_string().parse().unwrap_or(DEFAULT_UNITS_PER_EM))
            .unwrap_or(DEFAULT_UNITS_PER_EM);

        // Load metrics from UFO, using reasonable defaults based on units_per_em if missing
        let ascender = font_info.ascender.unwrap_or(units_per_em * 0.8); // 80% of UPM
        let descender = font_info.descender.unwrap_or(-(units_per_em * 0.2)); // -20% of UPM

        Self {
            units_per_em,
            descender: Some(descender),
            x_height: font_info.x_height,
            cap_height: font_info.cap_height,
            ascender: Some(ascender),
            italic_angle: font_info.italic_angle,
            line_height: ascender - descender,
        }
    }

    /// Get ascender value with sensible default based on UPM
    pub fn ascender_or_default(&self) -> f64 {
        self.ascender.unwrap_or(self.units_per_em * 0.8)
    }

    /// Get descender value with sensible default based on UPM
    pub fn descender_or_default(&self) -> f64 {
        self.descender.unwrap_or(-(self.units_per_em * 0.2))
    }

    /// Get x-height value with sensible default based on UPM
    pub fn x_height_or_default(&self) -> f64 {
        self.x_height.unwrap_or(self.units_per_em * 0.5)
    }

    /// Get cap-height value with sensible default based on UPM
    pub fn cap_height_or_default(&self) -> f64 {
        self.cap_height.unwrap_or(self.units_per_em * 0.7)
    }

    /// Snap lines for a glyph with the given advance width, in the order
    /// the snap engine tries them
    pub fn metric_lines(&self, advance_width: f64) -> Vec<MetricLine> {
        vec![
            MetricLine::horizontal(MetricKind::Baseline, 0.0),
            MetricLine::horizontal(MetricKind::Ascender, self.ascender_or_default()),
            MetricLine::horizontal(MetricKind::Descender, self.descender_or_default()),
            MetricLine::horizontal(MetricKind::CapHeight, self.cap_height_or_default()),
            MetricLine::horizontal(MetricKind::XHeight, self.x_height_or_default()),
            MetricLine::vertical(MetricKind::LeftBearing, 0.0),
            MetricLine::vertical(MetricKind::AdvanceWidth, advance_width),
        ]
    }
}
