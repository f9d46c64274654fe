//! Editing tools
//!
//! The active tool decides what a pointer gesture does. Only one tool is
//! active at a time.

pub mod freehand;
pub mod tool_state;

pub use freehand::FreehandStroke;
pub use tool_state::{ToolId, ToolState};
