//! Font state store boundary
//!
//! The editing engine never keeps the record of truth for an outline. It
//! reads and writes the active glyph through a [`FontStore`] handed in by
//! the caller.

use super::command::{Command, CommandId};
use super::table::CommandTable;
use std::collections::HashMap;

/// Accessor and mutators for the active glyph's command table
pub trait FontStore {
    fn get_commands(&self) -> CommandTable;
    fn replace_commands(&mut self, table: CommandTable);
    fn update_commands(&mut self, patch: &HashMap<CommandId, Command>);
}

/// In-memory store holding a single glyph outline
#[derive(Clone, Debug, Default)]
pub struct GlyphStore {
    pub table: CommandTable,
    /// Bumped on every write, lets callers detect stale views
    pub revision: u64,
}

impl GlyphStore {
    pub fn new(table: CommandTable) -> Self {
        Self { table, revision: 0 }
    }
}

impl FontStore for GlyphStore {
    fn get_commands(&self) -> CommandTable {
        self.table.clone()
    }

    fn replace_commands(&mut self, table: CommandTable) {
        self.table = table;
        self.revision += 1;
    }

    fn update_commands(&mut self, patch: &HashMap<CommandId, Command>) {
        self.table.update(patch);
        self.revision += 1;
    }
}
