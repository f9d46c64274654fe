//! Edit history entries and an undo/redo stack
//!
//! Every committed mutation produces one [`HistoryEntry`] carrying both
//! the state before and after. Replaying a side of an entry goes through a
//! [`FontStore`], so the history never owns font state itself.

use super::command::{Command, CommandId};
use super::store::FontStore;
use super::table::CommandTable;
use crate::editing::transform::TransformSnapshot;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// Before/after pair
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Change<T> {
    pub old: T,
    pub new: T,
}

impl<T> Change<T> {
    pub fn new(old: T, new: T) -> Self {
        Self { old, new }
    }

    fn side(&self, side: Side) -> &T {
        match side {
            Side::Old => &self.old,
            Side::New => &self.new,
        }
    }
}

/// Which half of an entry to apply
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    Old,
    New,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum HistoryEntry {
    #[serde(rename = "command.update")]
    CommandUpdate(Change<Command>),
    #[serde(rename = "commands.update")]
    CommandsUpdate(Change<HashMap<CommandId, Command>>),
    #[serde(rename = "commands.delete")]
    CommandsDelete(Change<CommandTable>),
    #[serde(rename = "commands.add")]
    CommandsAdd(Change<CommandTable>),
    #[serde(rename = "transform")]
    Transform(Change<TransformSnapshot>),
}

impl HistoryEntry {
    pub fn label(&self) -> &'static str {
        match self {
            HistoryEntry::CommandUpdate(_) => "command.update",
            HistoryEntry::CommandsUpdate(_) => "commands.update",
            HistoryEntry::CommandsDelete(_) => "commands.delete",
            HistoryEntry::CommandsAdd(_) => "commands.add",
            HistoryEntry::Transform(_) => "transform",
        }
    }

    /// Write one side of the entry into the store.
    ///
    /// Transform entries also hand back the snapshot so the caller can
    /// restore the transform engine's matrices.
    pub fn apply<S: FontStore + ?Sized>(&self, side: Side, store: &mut S) -> Option<TransformSnapshot> {
        match self {
            HistoryEntry::CommandUpdate(change) => {
                let command = change.side(side).clone();
                let mut patch = HashMap::new();
                patch.insert(command.id.clone(), command);
                store.update_commands(&patch);
                None
            }
            HistoryEntry::CommandsUpdate(change) => {
                store.update_commands(change.side(side));
                None
            }
            HistoryEntry::CommandsDelete(change) | HistoryEntry::CommandsAdd(change) => {
                store.replace_commands(change.side(side).clone());
                None
            }
            HistoryEntry::Transform(change) => {
                let snapshot = change.side(side);
                store.update_commands(&snapshot.commands);
                Some(snapshot.clone())
            }
        }
    }
}

/// Sink for committed edits
pub trait HistoryStore {
    fn add(&mut self, entry: HistoryEntry);
}

impl HistoryStore for Vec<HistoryEntry> {
    fn add(&mut self, entry: HistoryEntry) {
        self.push(entry);
    }
}

/// Bounded undo/redo stack
#[derive(Debug)]
pub struct HistoryStack {
    undo: Vec<HistoryEntry>,
    redo: Vec<HistoryEntry>,
    limit: usize,
}

impl Default for HistoryStack {
    fn default() -> Self {
        Self::with_limit(256)
    }
}

impl HistoryStack {
    pub fn with_limit(limit: usize) -> Self {
        Self {
            undo: Vec::new(),
            redo: Vec::new(),
            limit: limit.max(1),
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    pub fn len(&self) -> usize {
        self.undo.len()
    }

    pub fn is_empty(&self) -> bool {
        self.undo.is_empty()
    }

    pub fn last(&self) -> Option<&HistoryEntry> {
        self.undo.last()
    }

    /// Revert the most recent entry, returning it
    pub fn undo<S: FontStore + ?Sized>(&mut self, store: &mut S) -> Option<HistoryEntry> {
        let entry = self.undo.pop()?;
        entry.apply(Side::Old, store);
        debug!("Undo {}", entry.label());
        self.redo.push(entry.clone());
        Some(entry)
    }

    /// Re-apply the most recently undone entry, returning it
    pub fn redo<S: FontStore + ?Sized>(&mut self, store: &mut S) -> Option<HistoryEntry> {
        let entry = self.redo.pop()?;
        entry.apply(Side::New, store);
        debug!("Redo {}", entry.label());
        self.undo.push(entry.clone());
        Some(entry)
    }
}

impl HistoryStore for HistoryStack {
    fn add(&mut self, entry: HistoryEntry) {
        debug!("History add {}", entry.label());
        self.redo.clear();
        self.undo.push(entry);
        if self.undo.len() > self.limit {
            let overflow = self.undo.len() - self.limit;
            self.undo.drain(..overflow);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::state::store::GlyphStore;
    use kurbo::Point;

    fn store() -> GlyphStore {
        GlyphStore::new(CommandTable::normalize(vec![
            Command::move_to("m", 0.0, 0.0),
            Command::line_to("l", 10.0, 0.0),
        ]))
    }

    #[test]
    fn test_undo_redo_command_update() {
        let mut store = store();
        let mut history = HistoryStack::default();

        let old = store.table.get(&"l".into()).cloned().unwrap();
        let mut new = old.clone();
        new.set_point(Point::new(20.0, 5.0));
        store.update_commands(&HashMap::from([(new.id.clone(), new.clone())]));
        history.add(HistoryEntry::CommandUpdate(Change::new(old, new)));

        assert!(history.undo(&mut store).is_some());
        assert_eq!(store.table.point(&"l".into()), Some(Point::new(10.0, 0.0)));
        assert!(history.can_redo());

        assert!(history.redo(&mut store).is_some());
        assert_eq!(store.table.point(&"l".into()), Some(Point::new(20.0, 5.0)));
        assert!(!history.can_redo());
    }

    #[test]
    fn test_new_entry_clears_redo() {
        let mut store = store();
        let mut history = HistoryStack::default();
        let table = store.get_commands();
        history.add(HistoryEntry::CommandsAdd(Change::new(table.clone(), table.clone())));
        history.undo(&mut store);
        assert!(history.can_redo());
        history.add(HistoryEntry::CommandsDelete(Change::new(table.clone(), table)));
        assert!(!history.can_redo());
    }

    #[test]
    fn test_limit_drops_oldest() {
        let mut history = HistoryStack::with_limit(2);
        let table = CommandTable::new();
        for _ in 0..5 {
            history.add(HistoryEntry::CommandsAdd(Change::new(table.clone(), table.clone())));
        }
        assert_eq!(history.len(), 2);
    }

    #[test]
    fn test_entry_serializes_with_type_tag() {
        let command = Command::line_to("l", 1.0, 2.0);
        let entry = HistoryEntry::CommandUpdate(Change::new(command.clone(), command));
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["type"], "command.update");
        assert_eq!(json["payload"]["old"]["command"], "lineTo");
    }
}
