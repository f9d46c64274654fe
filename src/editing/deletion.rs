//! Point deletion with topology healing
//!
//! Removing a point can invalidate its neighbours: a curve anchor without
//! its control points, a contour with nothing after its `moveTo`, a
//! `closePath` closing nothing. Deletion therefore runs as a worklist over
//! one working copy of the table, followed by a healing pass repeated
//! until nothing changes.

use crate::core::state::{
    Change, CommandId, CommandKind, CommandTable, FontStore, HistoryEntry, HistoryStore,
};
use std::collections::{HashSet, VecDeque};
use tracing::{debug, warn};

/// Result of a delete, kept mostly for inspection and tests
#[derive(Debug, Default, Clone, PartialEq)]
pub struct DeleteOutcome {
    /// Every id that left the table, selected or pulled in
    pub removed: HashSet<CommandId>,
    /// Ids whose command was demoted to `moveTo`
    pub demoted: Vec<CommandId>,
    /// Worklist pops plus healing passes
    pub iterations: usize,
}

impl DeleteOutcome {
    pub fn changed(&self) -> bool {
        !self.removed.is_empty() || !self.demoted.is_empty()
    }
}

/// Delete `selection` from the store's table, healing what's left.
///
/// A `commands.delete` history entry is recorded only when the table
/// actually changed.
pub fn delete_points<S, H>(store: &mut S, history: &mut H, selection: &HashSet<CommandId>) -> DeleteOutcome
where
    S: FontStore + ?Sized,
    H: HistoryStore + ?Sized,
{
    let old = store.get_commands();
    let (new, outcome) = delete_from_table(&old, selection);
    if !outcome.changed() {
        debug!("Delete of {} ids changed nothing", selection.len());
        return outcome;
    }

    debug!(
        "Deleted {} commands in {} iterations",
        outcome.removed.len(),
        outcome.iterations
    );
    history.add(HistoryEntry::CommandsDelete(Change::new(old, new.clone())));
    store.replace_commands(new);
    outcome
}

/// Pure form of [`delete_points`]
pub fn delete_from_table(table: &CommandTable, selection: &HashSet<CommandId>) -> (CommandTable, DeleteOutcome) {
    let mut work = table.clone();
    let mut outcome = DeleteOutcome::default();

    // Draw order keeps the result independent of hash iteration order
    let mut queue: VecDeque<CommandId> = table
        .ids
        .iter()
        .filter(|id| selection.contains(*id))
        .cloned()
        .collect();

    let guard = iteration_limit(table);
    while let Some(id) = queue.pop_front() {
        outcome.iterations += 1;
        if outcome.iterations > guard {
            warn!("Delete worklist exceeded {} iterations, stopping", guard);
            break;
        }
        if outcome.removed.contains(&id) {
            continue;
        }
        let Some(index) = work.position(&id) else {
            continue;
        };
        let Some(kind) = work.kind_at(index) else {
            continue;
        };

        match kind {
            CommandKind::MoveTo => {
                remove(&mut work, &mut outcome, &id);
                promote_next_start(&mut work, &mut outcome, index);
                continue;
            }
            CommandKind::BezierCurveTo => {
                enqueue_if(&work, &mut queue, index.checked_sub(1), CommandKind::BezierCurveToCp2);
                enqueue_if(&work, &mut queue, index.checked_sub(2), CommandKind::BezierCurveToCp1);
            }
            CommandKind::BezierCurveToCp1 => {
                enqueue_if(&work, &mut queue, Some(index + 1), CommandKind::BezierCurveToCp2);
                enqueue_if(&work, &mut queue, Some(index + 2), CommandKind::BezierCurveTo);
            }
            CommandKind::BezierCurveToCp2 => {
                enqueue_if(&work, &mut queue, index.checked_sub(1), CommandKind::BezierCurveToCp1);
                enqueue_if(&work, &mut queue, Some(index + 1), CommandKind::BezierCurveTo);
            }
            CommandKind::QuadraticCurveTo => {
                enqueue_if(&work, &mut queue, index.checked_sub(1), CommandKind::QuadraticCurveToCp);
            }
            CommandKind::QuadraticCurveToCp => {
                enqueue_if(&work, &mut queue, Some(index + 1), CommandKind::QuadraticCurveTo);
            }
            CommandKind::LineTo | CommandKind::ClosePath => {}
        }
        remove(&mut work, &mut outcome, &id);
    }

    while heal(&mut work, &mut outcome) {
        outcome.iterations += 1;
        if outcome.iterations > guard {
            warn!("Healing exceeded {} iterations, stopping", guard);
            break;
        }
    }

    (work, outcome)
}

fn iteration_limit(table: &CommandTable) -> usize {
    table.len() * 4 + 16
}

fn remove(work: &mut CommandTable, outcome: &mut DeleteOutcome, id: &CommandId) {
    if work.remove(id).is_some() {
        outcome.removed.insert(id.clone());
        outcome.demoted.retain(|d| d != id);
    }
}

fn enqueue_if(work: &CommandTable, queue: &mut VecDeque<CommandId>, index: Option<usize>, kind: CommandKind) {
    let Some(index) = index else {
        return;
    };
    if work.kind_at(index) == Some(kind) {
        if let Some(id) = work.ids.get(index) {
            queue.push_back(id.clone());
        }
    }
}

/// After a `moveTo` at `index` is gone, the contour needs a new start.
///
/// A curve segment right after the old start goes with it, then any stray
/// control points, and the first surviving on-curve point becomes the
/// `moveTo`.
fn promote_next_start(work: &mut CommandTable, outcome: &mut DeleteOutcome, index: usize) {
    if work.kind_at(index) == Some(CommandKind::BezierCurveToCp1) {
        for _ in 0..3 {
            if let Some(id) = work.ids.get(index).cloned() {
                if matches!(
                    work.kind_at(index),
                    Some(CommandKind::BezierCurveToCp1 | CommandKind::BezierCurveToCp2 | CommandKind::BezierCurveTo)
                ) {
                    remove(work, outcome, &id);
                }
            }
        }
    }

    while let Some(kind) = work.kind_at(index) {
        if !kind.is_control() {
            break;
        }
        if let Some(id) = work.ids.get(index).cloned() {
            remove(work, outcome, &id);
        }
    }

    let Some(kind) = work.kind_at(index) else {
        return;
    };
    // Nothing left to close; the `closePath` would otherwise close the
    // previous contour
    if kind == CommandKind::ClosePath {
        if let Some(id) = work.ids.get(index).cloned() {
            remove(work, outcome, &id);
        }
        return;
    }
    if kind.is_anchor() && kind != CommandKind::MoveTo {
        if let Some(id) = work.ids.get(index).cloned() {
            if let Some(command) = work.get_mut(&id) {
                command.set_kind(CommandKind::MoveTo);
                outcome.demoted.push(id);
            }
        }
    }
}

/// One healing pass. Returns whether anything was removed.
///
/// Prunes a `closePath` at the very start or right after another
/// `closePath`, and a `moveTo` that starts nothing. A `moveTo` directly
/// followed by `closePath` takes the `closePath` with it.
fn heal(work: &mut CommandTable, outcome: &mut DeleteOutcome) -> bool {
    let mut doomed = Vec::new();
    for index in 0..work.len() {
        let kind = work.kind_at(index);
        let previous = index.checked_sub(1).and_then(|i| work.kind_at(i));
        let next = work.kind_at(index + 1);

        match kind {
            Some(CommandKind::ClosePath) if index == 0 || previous == Some(CommandKind::ClosePath) => {
                doomed.push(work.ids[index].clone());
            }
            Some(CommandKind::MoveTo) if matches!(next, None | Some(CommandKind::MoveTo)) => {
                doomed.push(work.ids[index].clone());
            }
            Some(CommandKind::MoveTo) if next == Some(CommandKind::ClosePath) => {
                doomed.push(work.ids[index].clone());
                doomed.push(work.ids[index + 1].clone());
            }
            _ => continue,
        }
        // One structural change per pass keeps neighbour checks valid
        break;
    }

    let changed = !doomed.is_empty();
    for id in doomed {
        remove(work, outcome, &id);
    }
    changed
}
