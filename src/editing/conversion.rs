//! Segment type conversion
//!
//! Quadratic runs are restructured into cubic triplets with exact degree
//! elevation, and straight segments can be promoted to curves by adding
//! two control points along the chord.

use crate::core::state::{
    Change, Command, CommandId, CommandKind, CommandTable, FontStore, HistoryEntry, HistoryStore,
    PathCommand,
};
use crate::geometry::bezier::quadratic_to_cubic;
use tracing::debug;

/// Replace the `quadCP, quadTo` run ending at `index` with `CP1, CP2,
/// bezierCurveTo`. The control point id carries over to CP1 and the anchor
/// keeps its id. Returns false if there's no quadratic run there.
pub fn convert_quadratic_at(table: &mut CommandTable, index: usize) -> bool {
    let Some(cp_index) = index.checked_sub(1) else {
        return false;
    };
    if table.kind_at(index) != Some(CommandKind::QuadraticCurveTo)
        || table.kind_at(cp_index) != Some(CommandKind::QuadraticCurveToCp)
    {
        return false;
    }
    let Some((_, start)) = table.previous_anchor(cp_index) else {
        return false;
    };
    let (Some(control), Some(anchor)) = (table.at(cp_index).cloned(), table.at(index).cloned()) else {
        return false;
    };
    let (Some(c), Some(e)) = (control.point(), anchor.point()) else {
        return false;
    };

    let (cp1, cp2, end) = quadratic_to_cubic(start, c, e);
    let replacement = vec![
        Command::new(control.id, PathCommand::CubicCp1(cp1)),
        Command::fresh(PathCommand::CubicCp2(cp2)),
        Command::new(anchor.id, PathCommand::CubicTo(end)),
    ];
    table.splice(cp_index, replacement, 2);
    true
}

/// Convert every quadratic run in the table, returning how many changed
pub fn convert_quadratics(table: &mut CommandTable) -> usize {
    let mut converted = 0;
    let mut index = 0;
    while index < table.len() {
        if convert_quadratic_at(table, index) {
            converted += 1;
            // the run grew by one entry
            index += 2;
        } else {
            index += 1;
        }
    }
    converted
}

/// Promote the `lineTo` at `index` to a cubic with handles at 1/3 and 2/3
/// of the chord. The anchor keeps its id.
pub fn line_to_curve_at(table: &mut CommandTable, index: usize) -> Option<CommandId> {
    if table.kind_at(index) != Some(CommandKind::LineTo) {
        return None;
    }
    let (_, start) = table.previous_anchor(index)?;
    let anchor = table.at(index)?.clone();
    let end = anchor.point()?;

    let replacement = vec![
        Command::fresh(PathCommand::CubicCp1(start.lerp(end, 1.0 / 3.0))),
        Command::fresh(PathCommand::CubicCp2(start.lerp(end, 2.0 / 3.0))),
        Command::new(anchor.id.clone(), PathCommand::CubicTo(end)),
    ];
    table.splice(index, replacement, 1);
    Some(anchor.id)
}

/// Store-level quadratic conversion with a `commands.add` history pair
pub fn convert_quadratics_in_store<S, H>(store: &mut S, history: &mut H) -> usize
where
    S: FontStore + ?Sized,
    H: HistoryStore + ?Sized,
{
    let old = store.get_commands();
    let mut new = old.clone();
    let converted = convert_quadratics(&mut new);
    if converted > 0 {
        debug!("Converted {} quadratic segments to cubic", converted);
        history.add(HistoryEntry::CommandsAdd(Change::new(old, new.clone())));
        store.replace_commands(new);
    }
    converted
}

/// Store-level line to curve conversion of the segment ending at `id`
pub fn convert_line_to_curve<S, H>(store: &mut S, history: &mut H, id: &CommandId) -> bool
where
    S: FontStore + ?Sized,
    H: HistoryStore + ?Sized,
{
    let old = store.get_commands();
    let Some(index) = old.position(id) else {
        return false;
    };
    let mut new = old.clone();
    if line_to_curve_at(&mut new, index).is_none() {
        return false;
    }
    debug!("Converted line {} to curve", id);
    history.add(HistoryEntry::CommandsAdd(Change::new(old, new.clone())));
    store.replace_commands(new);
    true
}
