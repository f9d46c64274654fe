//! Outline state: commands, command tables, the font store boundary and
//! edit history.

pub mod command;
pub mod history;
pub mod store;
pub mod table;

pub use command::{Command, CommandId, CommandKind, PathCommand};
pub use history::{Change, HistoryEntry, HistoryStack, HistoryStore, Side};
pub use store::{FontStore, GlyphStore};
pub use table::{insert_to_array, CommandTable};
