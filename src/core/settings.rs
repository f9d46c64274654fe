//! Editor tunables
//!
//! Built-in defaults, overridden by `~/.config/glyphsmith/settings.json`,
//! overridden in turn by CLI flags.

use crate::core::config_file::ConfigFile;
use serde::{Deserialize, Serialize};

/// Snap tolerance in screen pixels
pub const SNAP_DISTANCE: f64 = 4.0;
/// Grid rounding only applies within this fraction of a cell
pub const GRID_SNAP_FRACTION: f64 = 0.25;
pub const ROTATION_STEP_DEGREES: f64 = 15.0;
/// Freehand simplification tolerance in screen pixels
pub const SIMPLIFY_TOLERANCE: f64 = 2.0;
pub const GUIDELINE_OVERHANG: f64 = 40.0;
pub const NUDGE_AMOUNT: f64 = 1.0;
pub const SHIFT_NUDGE_AMOUNT: f64 = 10.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditorSettings {
    pub snap_distance: f64,
    pub grid_snap_fraction: f64,
    pub rotation_step_degrees: f64,
    pub simplify_tolerance: f64,
    pub guideline_overhang: f64,
    pub nudge: f64,
    pub shift_nudge: f64,
    /// No grid rounding when unset
    pub grid_size: Option<f64>,
    pub snap_to_points: bool,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            snap_distance: SNAP_DISTANCE,
            grid_snap_fraction: GRID_SNAP_FRACTION,
            rotation_step_degrees: ROTATION_STEP_DEGREES,
            simplify_tolerance: SIMPLIFY_TOLERANCE,
            guideline_overhang: GUIDELINE_OVERHANG,
            nudge: NUDGE_AMOUNT,
            shift_nudge: SHIFT_NUDGE_AMOUNT,
            grid_size: None,
            snap_to_points: true,
        }
    }
}

impl EditorSettings {
    /// Layer config file values over the defaults
    pub fn from_config(config: Option<&ConfigFile>) -> Self {
        let mut settings = Self::default();
        let Some(config) = config else {
            return settings;
        };
        if let Some(value) = config.snap_distance {
            settings.snap_distance = value;
        }
        if let Some(value) = config.rotation_step_degrees {
            settings.rotation_step_degrees = value;
        }
        if let Some(value) = config.simplify_tolerance {
            settings.simplify_tolerance = value;
        }
        if let Some(value) = config.snap_to_points {
            settings.snap_to_points = value;
        }
        if config.grid_size.is_some() {
            settings.grid_size = config.grid_size;
        }
        settings
    }

    /// CLI overrides win over everything else
    pub fn with_grid(mut self, grid: Option<f64>) -> Self {
        if grid.is_some() {
            self.grid_size = grid;
        }
        self
    }

    pub fn nudge_amount(&self, shift: bool) -> f64 {
        if shift {
            self.shift_nudge
        } else {
            self.nudge
        }
    }
}
