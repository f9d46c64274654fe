//! Editing Functionality
//!
//! This module contains the engines that mutate a glyph outline:
//! - Path topology: point insertion, deletion with healing, curve conversion
//! - Transform mode: scale, rotate, warp and flip through a bounding box
//! - Snapping with guidelines, point drags and nudges
//! - Gesture ownership and the edit session that routes input

pub mod conversion;
pub mod deletion;
pub mod drag;
pub mod insertion;
pub mod movement;
pub mod session;
pub mod snapping;
pub mod transform;

// Re-export commonly used items
pub use deletion::{delete_points, DeleteOutcome};
pub use drag::{DragSession, GestureKind, GestureLock};
pub use insertion::insert_point;
pub use session::{EditSession, HitTarget};
pub use snapping::{Guideline, Ruler, SnapHandler, SnapRequest, SnapResult, SnapSource};
pub use transform::{TransformEngine, TransformOp, TransformPhase, TransformSnapshot};
