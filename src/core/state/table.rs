//! Command table: ordered ids plus an id-keyed command map
//!
//! `ids` is the only source of draw order. `items` holds exactly one entry
//! for every id in `ids`.

use super::command::{Command, CommandId, CommandKind};
use kurbo::Point;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::ops::Range;

/// Ordered, id-addressable outline of a glyph
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CommandTable {
    pub ids: Vec<CommandId>,
    pub items: HashMap<CommandId, Command>,
}

/// Splice `new_items` into `arr` at `index`, replacing `replace_count`
/// existing entries. Out-of-range indices clamp to the end.
pub fn insert_to_array<T, I>(arr: &mut Vec<T>, index: usize, new_items: I, replace_count: usize)
where
    I: IntoIterator<Item = T>,
{
    let start = index.min(arr.len());
    let end = (start + replace_count).min(arr.len());
    arr.splice(start..end, new_items);
}

impl CommandTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from commands in draw order
    pub fn normalize<I>(list: I) -> Self
    where
        I: IntoIterator<Item = Command>,
    {
        Self::normalize_with(list, |command| command)
    }

    /// Build a table from commands in draw order, passing each through `updater`
    pub fn normalize_with<I, F>(list: I, mut updater: F) -> Self
    where
        I: IntoIterator<Item = Command>,
        F: FnMut(Command) -> Command,
    {
        let mut table = Self::new();
        for command in list {
            table.push(updater(command));
        }
        table
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn get(&self, id: &CommandId) -> Option<&Command> {
        self.items.get(id)
    }

    pub fn get_mut(&mut self, id: &CommandId) -> Option<&mut Command> {
        self.items.get_mut(id)
    }

    pub fn contains(&self, id: &CommandId) -> bool {
        self.items.contains_key(id)
    }

    /// Command at a draw-order index
    pub fn at(&self, index: usize) -> Option<&Command> {
        self.ids.get(index).and_then(|id| self.items.get(id))
    }

    pub fn kind_at(&self, index: usize) -> Option<CommandKind> {
        self.at(index).map(Command::kind)
    }

    pub fn position(&self, id: &CommandId) -> Option<usize> {
        self.ids.iter().position(|candidate| candidate == id)
    }

    pub fn point(&self, id: &CommandId) -> Option<Point> {
        self.get(id).and_then(Command::point)
    }

    /// Commands in draw order
    pub fn iter(&self) -> impl Iterator<Item = &Command> + '_ {
        self.ids.iter().filter_map(|id| self.items.get(id))
    }

    /// Commands in draw order, cloned
    pub fn to_list(&self) -> Vec<Command> {
        self.iter().cloned().collect()
    }

    pub fn push(&mut self, command: Command) {
        self.ids.push(command.id.clone());
        self.items.insert(command.id.clone(), command);
    }

    /// Replace `replace_count` commands starting at `index` with `commands`
    pub fn splice(&mut self, index: usize, commands: Vec<Command>, replace_count: usize) {
        let start = index.min(self.ids.len());
        let end = (start + replace_count).min(self.ids.len());
        for id in &self.ids[start..end] {
            self.items.remove(id);
        }
        let new_ids: Vec<CommandId> = commands.iter().map(|c| c.id.clone()).collect();
        for command in commands {
            self.items.insert(command.id.clone(), command);
        }
        insert_to_array(&mut self.ids, start, new_ids, end - start);
    }

    pub fn remove(&mut self, id: &CommandId) -> Option<Command> {
        let index = self.position(id)?;
        self.ids.remove(index);
        self.items.remove(id)
    }

    /// Overwrite existing commands; ids not present in the table are ignored
    pub fn update(&mut self, patch: &HashMap<CommandId, Command>) {
        for (id, command) in patch {
            if let Some(existing) = self.items.get_mut(id) {
                *existing = command.clone();
            }
        }
    }

    /// Sub-table of the given ids, kept in draw order
    pub fn subset(&self, ids: &HashSet<CommandId>) -> CommandTable {
        CommandTable::normalize(self.iter().filter(|c| ids.contains(&c.id)).cloned())
    }

    /// Nearest on-curve point strictly before `index`, within the same contour
    pub fn previous_anchor(&self, index: usize) -> Option<(usize, Point)> {
        for i in (0..index.min(self.len())).rev() {
            let command = self.at(i)?;
            match command.kind() {
                CommandKind::ClosePath => return None,
                kind if kind.is_anchor() => return command.point().map(|p| (i, p)),
                _ => continue,
            }
        }
        None
    }

    /// Index range of the contour containing `index`: from its `moveTo` up to
    /// and including its `closePath`, or up to the next `moveTo`
    pub fn contour_range(&self, index: usize) -> Range<usize> {
        let len = self.len();
        if index >= len {
            return len..len;
        }

        let mut start = 0;
        for i in (0..=index).rev() {
            match self.kind_at(i) {
                Some(CommandKind::MoveTo) => {
                    start = i;
                    break;
                }
                Some(CommandKind::ClosePath) if i < index => {
                    start = i + 1;
                    break;
                }
                _ => {}
            }
        }

        let mut end = len;
        for i in (index.max(start))..len {
            match self.kind_at(i) {
                Some(CommandKind::ClosePath) => {
                    end = i + 1;
                    break;
                }
                Some(CommandKind::MoveTo) if i > start => {
                    end = i;
                    break;
                }
                _ => {}
            }
        }
        start..end
    }

    /// Ranges of every contour, in draw order
    pub fn contours(&self) -> Vec<Range<usize>> {
        let mut ranges = Vec::new();
        let mut index = 0;
        while index < self.len() {
            let range = self.contour_range(index);
            index = range.end.max(index + 1);
            ranges.push(range);
        }
        ranges
    }

    /// Checks the id/item invariant
    pub fn is_consistent(&self) -> bool {
        let unique: HashSet<&CommandId> = self.ids.iter().collect();
        unique.len() == self.ids.len()
            && self.items.len() == self.ids.len()
            && self
                .ids
                .iter()
                .all(|id| self.items.get(id).is_some_and(|c| &c.id == id))
    }
}
