//! Tool state management - single source of truth for the active tool
//!
//! Switching tools is how conflicting gestures are kept apart: the edit
//! session reacts to a switch by cancelling any drawing in progress and
//! leaving transform mode.

use tracing::{debug, info};

/// Which tool is currently active
#[derive(Debug, Default, Clone)]
pub struct ToolState {
    /// Currently active tool
    pub active: ToolId,

    /// Set when the active tool changed since the last `clear_changed`
    active_changed: bool,

    /// Previous tool
    previous: Option<ToolId>,

    /// Stack for temporary tool modes (e.g. holding a key for transform)
    temporary_stack: Vec<ToolId>,
}

impl ToolState {
    /// Switch to a new tool. Returns true if the active tool changed.
    pub fn activate(&mut self, tool: ToolId) -> bool {
        if self.active == tool {
            return false;
        }
        self.previous = Some(self.active);
        self.active = tool;
        self.active_changed = true;
        info!("Tool switched to {}", tool.name());
        true
    }

    /// Push a temporary tool
    pub fn push_temporary(&mut self, tool: ToolId) {
        self.temporary_stack.push(self.active);
        self.active = tool;
        self.active_changed = true;
        debug!("Pushed temporary tool: {:?}", tool);
    }

    /// Pop temporary tool and return to previous
    pub fn pop_temporary(&mut self) -> bool {
        if let Some(previous) = self.temporary_stack.pop() {
            self.active = previous;
            self.active_changed = true;
            debug!("Popped temporary tool, returned to: {:?}", previous);
            true
        } else {
            false
        }
    }

    /// Check if the active tool changed since the flag was last cleared
    pub fn just_changed(&self) -> bool {
        self.active_changed
    }

    pub fn clear_changed(&mut self) {
        self.active_changed = false;
    }

    /// Check if a specific tool is active
    pub fn is_active(&self, tool: ToolId) -> bool {
        self.active == tool
    }

    /// Get the previous tool
    pub fn previous(&self) -> Option<ToolId> {
        self.previous
    }
}

/// Tool identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ToolId {
    #[default]
    Select,
    Pen,
    Freehand,
    Transform,
}

impl ToolId {
    /// Get the tool's display name
    pub fn name(&self) -> &'static str {
        match self {
            ToolId::Select => "Select",
            ToolId::Pen => "Pen",
            ToolId::Freehand => "Freehand",
            ToolId::Transform => "Transform",
        }
    }
}
