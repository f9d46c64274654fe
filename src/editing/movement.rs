//! Dragging selected points
//!
//! A drag moves the selection plus the off-curve points attached to any
//! selected on-curve point, so handles travel with their anchor. Every tick
//! places each point at its position from drag start plus the total
//! displacement. The primary point is the one that snaps; the rest follow
//! with the same offset.

use super::drag::{DragSession, GestureKind, GestureLock};
use super::snapping::SnapResult;
use crate::core::state::{Change, Command, CommandId, CommandKind, CommandTable, FontStore, HistoryEntry, HistoryStore};
use crate::geometry::utilities::axis_lock_position;
use crate::io::input::ModifierState;
use kurbo::{Point, Vec2};
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Selection plus the control points that belong to selected anchors
pub fn with_connected_offcurves(table: &CommandTable, selection: &HashSet<CommandId>) -> HashSet<CommandId> {
    let mut moving = HashSet::new();
    for id in selection {
        let Some(index) = table.position(id) else {
            continue;
        };
        let Some(kind) = table.kind_at(index) else {
            continue;
        };
        if kind == CommandKind::ClosePath {
            continue;
        }
        moving.insert(id.clone());
        if kind.is_control() {
            continue;
        }

        // Incoming handle of this anchor's segment
        if let Some(previous) = index.checked_sub(1) {
            if matches!(
                table.kind_at(previous),
                Some(CommandKind::BezierCurveToCp2 | CommandKind::QuadraticCurveToCp)
            ) && matches!(kind, CommandKind::BezierCurveTo | CommandKind::QuadraticCurveTo)
            {
                if let Some(command) = table.at(previous) {
                    moving.insert(command.id.clone());
                }
            }
        }
        // Outgoing handle of the next segment
        if matches!(
            table.kind_at(index + 1),
            Some(CommandKind::BezierCurveToCp1 | CommandKind::QuadraticCurveToCp)
        ) {
            if let Some(command) = table.at(index + 1) {
                moving.insert(command.id.clone());
            }
        }
    }
    moving
}

/// A live drag of selected points
#[derive(Debug)]
pub struct PointDrag {
    session: DragSession,
    primary: CommandId,
    originals: HashMap<CommandId, Command>,
    latest: HashMap<CommandId, Command>,
}

impl PointDrag {
    /// Start dragging `selection` with `primary` under the pointer.
    ///
    /// `None` when another gesture owns the outline or `primary` has no
    /// position.
    pub fn begin<S: FontStore + ?Sized>(
        lock: &GestureLock,
        store: &S,
        selection: &HashSet<CommandId>,
        primary: &CommandId,
        pointer: Point,
    ) -> Option<Self> {
        let table = store.get_commands();
        table.point(primary)?;
        let mut selection = selection.clone();
        selection.insert(primary.clone());

        let session = DragSession::begin(lock, GestureKind::PointDrag, pointer)?;
        let originals: HashMap<CommandId, Command> = with_connected_offcurves(&table, &selection)
            .into_iter()
            .filter_map(|id| table.get(&id).map(|command| (id, command.clone())))
            .collect();
        debug!("Dragging {} points", originals.len());

        Some(Self {
            session,
            primary: primary.clone(),
            latest: originals.clone(),
            originals,
        })
    }

    /// Ids moved by this drag; these are never snap targets
    pub fn moving(&self) -> HashSet<CommandId> {
        self.originals.keys().cloned().collect()
    }

    pub fn primary(&self) -> &CommandId {
        &self.primary
    }

    /// Where the primary point would land before snapping
    pub fn proposed(&self, pointer: Point, modifiers: ModifierState) -> Option<Point> {
        let origin = self.originals.get(&self.primary)?.point()?;
        let delta = constrain(pointer - self.session.origin(), modifiers);
        Some(origin + delta)
    }

    /// Move everything for `pointer`. `snap` maps the primary point's
    /// proposed position to its snapped one. Returns `None` once cancelled.
    pub fn update<S, F>(&mut self, store: &mut S, pointer: Point, modifiers: ModifierState, snap: F) -> Option<SnapResult>
    where
        S: FontStore + ?Sized,
        F: FnOnce(Point) -> SnapResult,
    {
        let delta = constrain(self.session.update(pointer)?, modifiers);
        let origin = self.originals.get(&self.primary)?.point()?;
        let proposed = origin + delta;
        let result = snap(proposed);
        let delta = delta + (result.position - proposed);

        self.latest = self
            .originals
            .iter()
            .map(|(id, command)| {
                let mut moved = command.clone();
                if let Some(point) = command.point() {
                    moved.set_point(point + delta);
                }
                (id.clone(), moved)
            })
            .collect();
        store.update_commands(&self.latest);
        Some(result)
    }

    /// Finish the drag, recording a `commands.update` entry if anything moved
    pub fn end<H: HistoryStore + ?Sized>(self, history: &mut H) -> bool {
        if self.session.is_cancelled() || self.latest == self.originals {
            return false;
        }
        debug!("Point drag committed ({} points)", self.latest.len());
        history.add(HistoryEntry::CommandsUpdate(Change::new(self.originals, self.latest)));
        true
    }

    /// Put every moved point back and stop processing moves
    pub fn cancel<S: FontStore + ?Sized>(&mut self, store: &mut S) {
        if self.session.is_cancelled() {
            return;
        }
        self.session.cancel();
        store.update_commands(&self.originals);
        self.latest = self.originals.clone();
    }

    pub fn is_cancelled(&self) -> bool {
        self.session.is_cancelled()
    }
}

/// Shift locks the displacement to its dominant axis
fn constrain(delta: Vec2, modifiers: ModifierState) -> Vec2 {
    if modifiers.shift {
        axis_lock_position(delta.to_point(), Point::ZERO).to_vec2()
    } else {
        delta
    }
}

/// Translate selected commands by a fixed amount, e.g. arrow key nudges
pub fn nudge_selection<S, H>(store: &mut S, history: &mut H, selection: &HashSet<CommandId>, delta: Vec2) -> bool
where
    S: FontStore + ?Sized,
    H: HistoryStore + ?Sized,
{
    let table = store.get_commands();
    let moving = with_connected_offcurves(&table, selection);
    let old: HashMap<CommandId, Command> = moving
        .iter()
        .filter_map(|id| table.get(id).filter(|command| command.point().is_some()))
        .map(|command| (command.id.clone(), command.clone()))
        .collect();
    if old.is_empty() || delta == Vec2::ZERO {
        return false;
    }
    let new: HashMap<CommandId, Command> = old
        .iter()
        .map(|(id, command)| {
            let mut moved = command.clone();
            if let Some(point) = command.point() {
                moved.set_point(point + delta);
            }
            (id.clone(), moved)
        })
        .collect();
    history.add(HistoryEntry::CommandsUpdate(Change::new(old, new.clone())));
    store.update_commands(&new);
    true
}
