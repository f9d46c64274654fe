//! Point insertion on existing segments
//!
//! Clicking on a segment adds an on-curve point there. Straight segments
//! get a new `lineTo`; cubic segments are split with de Casteljau so the
//! outline keeps its shape, turning one `CP1, CP2, anchor` run into two.

use crate::core::state::{
    Change, Command, CommandId, CommandKind, CommandTable, FontStore, HistoryEntry, HistoryStore,
    PathCommand,
};
use crate::geometry::bezier::{nearest_t, quadratic_to_cubic, split_cubic};
use kurbo::{CubicBez, Point};
use tracing::{debug, warn};

/// Insert a point on the segment ending at `target`.
///
/// `t` is the curve parameter of the click on a curved segment; when absent
/// it is recovered from `point`. Returns the id of the new on-curve point,
/// or `None` (with no mutation and no history) when the segment's control
/// points can't be found.
pub fn insert_point<S, H>(
    store: &mut S,
    history: &mut H,
    target: &CommandId,
    point: Point,
    t: Option<f64>,
) -> Option<CommandId>
where
    S: FontStore + ?Sized,
    H: HistoryStore + ?Sized,
{
    let old = store.get_commands();
    let Some((new, primary)) = insert_into_table(&old, target, point, t) else {
        warn!("Nothing inserted at {}: segment is malformed", target);
        return None;
    };

    debug!("Inserted {} before {}", primary, target);
    history.add(HistoryEntry::CommandsAdd(Change::new(old, new.clone())));
    store.replace_commands(new);
    Some(primary)
}

/// Pure form of [`insert_point`]: the edited copy plus the primary id
pub fn insert_into_table(
    table: &CommandTable,
    target: &CommandId,
    point: Point,
    t: Option<f64>,
) -> Option<(CommandTable, CommandId)> {
    let index = table.position(target)?;
    let command = table.get(target)?;

    match command.kind() {
        CommandKind::LineTo | CommandKind::ClosePath => {
            let inserted = Command::fresh(PathCommand::LineTo(point));
            let primary = inserted.id.clone();
            let mut out = table.clone();
            out.splice(index, vec![inserted], 0);
            Some((out, primary))
        }
        CommandKind::BezierCurveTo => split_cubic_run(table, index, point, t),
        CommandKind::QuadraticCurveTo => split_quadratic_run(table, index, point, t),
        _ => None,
    }
}

/// `CP1, CP2, anchor` at `index - 2 ..= index` becomes two triplets
fn split_cubic_run(
    table: &CommandTable,
    index: usize,
    point: Point,
    t: Option<f64>,
) -> Option<(CommandTable, CommandId)> {
    let first = index.checked_sub(2)?;
    if table.kind_at(first)? != CommandKind::BezierCurveToCp1
        || table.kind_at(index - 1)? != CommandKind::BezierCurveToCp2
    {
        return None;
    }
    let (_, start) = table.previous_anchor(first)?;
    let cp1 = table.at(first)?.point()?;
    let cp2 = table.at(index - 1)?.point()?;
    let end = table.at(index)?;

    let cubic = CubicBez::new(start, cp1, cp2, end.point()?);
    let replacement = split_into_commands(cubic, end, point, t);
    let primary = replacement[2].id.clone();

    let mut out = table.clone();
    out.splice(first, replacement, 3);
    Some((out, primary))
}

/// `quadCP, quadTo` is elevated to a cubic and split the same way
fn split_quadratic_run(
    table: &CommandTable,
    index: usize,
    point: Point,
    t: Option<f64>,
) -> Option<(CommandTable, CommandId)> {
    let cp_index = index.checked_sub(1)?;
    if table.kind_at(cp_index)? != CommandKind::QuadraticCurveToCp {
        return None;
    }
    let (_, start) = table.previous_anchor(cp_index)?;
    let control = table.at(cp_index)?.point()?;
    let end = table.at(index)?;

    let (cp1, cp2, end_point) = quadratic_to_cubic(start, control, end.point()?);
    let cubic = CubicBez::new(start, cp1, cp2, end_point);
    let replacement = split_into_commands(cubic, end, point, t);
    let primary = replacement[2].id.clone();

    let mut out = table.clone();
    out.splice(cp_index, replacement, 2);
    Some((out, primary))
}

/// Six commands for the two halves. The original anchor keeps its id as
/// the right half's endpoint.
fn split_into_commands(cubic: CubicBez, end: &Command, point: Point, t: Option<f64>) -> Vec<Command> {
    let t = t.unwrap_or_else(|| nearest_t(cubic, point)).clamp(0.0, 1.0);
    let (left, right) = split_cubic(cubic, t);

    vec![
        Command::fresh(PathCommand::CubicCp1(left.p1)),
        Command::fresh(PathCommand::CubicCp2(left.p2)),
        Command::fresh(PathCommand::CubicTo(left.p3)),
        Command::fresh(PathCommand::CubicCp1(right.p1)),
        Command::fresh(PathCommand::CubicCp2(right.p2)),
        Command::new(end.id.clone(), PathCommand::CubicTo(right.p3)),
    ]
}
