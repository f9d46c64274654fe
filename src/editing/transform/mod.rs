//! Transform mode: scale, rotate and warp a selection through its bounding box
//!
//! Lifecycle:
//!
//! ```text
//! disabled -> enabled -> dragging -> enabled -> ... -> disabled
//! ```
//!
//! Enabling captures the selection's commands and bounds. Every tick of a
//! drag recomputes the selection from those captured commands and the
//! cumulative matrices, never from the previous tick's output. Matrices
//! survive a committed drag, so the next gesture composes on top; they are
//! only dropped when transform mode is disabled.
//!
//! Points are mapped in bounds-local space: `min + M(p - min)`, with
//! `M = affine ∘ perspective` (perspective first).

mod flip;

use crate::core::state::{Change, Command, CommandId, FontStore, HistoryEntry, HistoryStore};
use crate::geometry::bounds::{compute_bounds_of, BoundingBox};
use crate::geometry::perspective::Perspective;
use crate::geometry::quadrant::{FlipAxis, Quadrant};
use crate::geometry::utilities::{angle_between, snap_angle};
use crate::io::input::ModifierState;
use kurbo::{Affine, Point, Vec2};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::{debug, info};

/// Default rotation snap step
pub const ROTATION_STEP_DEGREES: f64 = 15.0;

/// Below this a scale reference extent is treated as collapsed
const MIN_EXTENT: f64 = 1e-9;

/// Frozen transform state, used both as the drag rollback base and as the
/// payload of `transform` history entries
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransformSnapshot {
    pub affine: Affine,
    pub perspective: Perspective,
    /// Warp corners in bounds-local space, BL BR TR TL
    pub warp: [Point; 4],
    pub bounds: BoundingBox,
    /// The transformed commands as they were when the snapshot was taken
    pub commands: HashMap<CommandId, Command>,
}

/// What the dragged handle does
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransformOp {
    Scale(Quadrant),
    Rotate(Quadrant),
    /// Only corner handles warp
    Warp(Quadrant),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformPhase {
    Disabled,
    Enabled,
    Dragging,
}

#[derive(Debug, Clone)]
struct Gesture {
    op: TransformOp,
    snapshot: TransformSnapshot,
    /// Pointer at drag start, bounds-local
    start: Point,
}

#[derive(Debug, Clone)]
struct TransformState {
    affine: Affine,
    perspective: Perspective,
    warp: [Point; 4],
    bounds: BoundingBox,
    /// Selection as captured on enable, in draw order
    base: Vec<Command>,
    gesture: Option<Gesture>,
    last_flip: Option<(Quadrant, FlipAxis)>,
}

#[derive(Debug, Clone)]
pub struct TransformEngine {
    state: Option<TransformState>,
    rotation_step: f64,
}

impl Default for TransformEngine {
    fn default() -> Self {
        Self::new(ROTATION_STEP_DEGREES)
    }
}

/// Corners of a local rect in `Quadrant::corner_index` order
fn rect_corners(bounds: &BoundingBox) -> [Point; 4] {
    if bounds.is_empty() {
        return [Point::ZERO; 4];
    }
    let rect = bounds.local_rect();
    [
        Quadrant::BottomLeft.point_in_rect(rect),
        Quadrant::BottomRight.point_in_rect(rect),
        Quadrant::TopRight.point_in_rect(rect),
        Quadrant::TopLeft.point_in_rect(rect),
    ]
}

fn about(pivot: Point, transform: Affine) -> Affine {
    Affine::translate(pivot.to_vec2()) * transform * Affine::translate(-pivot.to_vec2())
}

impl TransformState {
    fn offset(&self) -> Vec2 {
        self.bounds.min().to_vec2()
    }

    /// Bounds-local point through the combined matrix
    fn map_local(&self, local: Point) -> Point {
        self.affine * self.perspective.apply(local)
    }

    fn map(&self, point: Point) -> Point {
        self.map_local(point - self.offset()) + self.offset()
    }

    fn mapped_commands(&self) -> HashMap<CommandId, Command> {
        self.base
            .iter()
            .map(|command| {
                let mut mapped = command.clone();
                if let Some(point) = command.point() {
                    mapped.set_point(self.map(point));
                }
                (mapped.id.clone(), mapped)
            })
            .collect()
    }

    fn snapshot_with(&self, commands: HashMap<CommandId, Command>) -> TransformSnapshot {
        TransformSnapshot {
            affine: self.affine,
            perspective: self.perspective,
            warp: self.warp,
            bounds: self.bounds,
            commands,
        }
    }

    fn load(&mut self, snapshot: &TransformSnapshot) {
        self.affine = snapshot.affine;
        self.perspective = snapshot.perspective;
        self.warp = snapshot.warp;
        self.bounds = snapshot.bounds;
    }
}

impl TransformEngine {
    pub fn new(rotation_step_degrees: f64) -> Self {
        Self {
            state: None,
            rotation_step: rotation_step_degrees.to_radians(),
        }
    }

    pub fn phase(&self) -> TransformPhase {
        match &self.state {
            None => TransformPhase::Disabled,
            Some(state) if state.gesture.is_some() => TransformPhase::Dragging,
            Some(_) => TransformPhase::Enabled,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.state.is_some()
    }

    /// Enter transform mode on `selection`, or on the whole glyph when the
    /// selection is empty. Matrices start at identity.
    pub fn enable<S: FontStore + ?Sized>(&mut self, store: &S, selection: &HashSet<CommandId>) -> BoundingBox {
        let table = store.get_commands();
        let base: Vec<Command> = table
            .iter()
            .filter(|command| command.point().is_some())
            .filter(|command| selection.is_empty() || selection.contains(&command.id))
            .cloned()
            .collect();
        let bounds = compute_bounds_of(&base, 1.0);

        info!(
            "Transform mode enabled on {} commands ({} x {})",
            base.len(),
            bounds.width,
            bounds.height
        );
        self.state = Some(TransformState {
            affine: Affine::IDENTITY,
            perspective: Perspective::IDENTITY,
            warp: rect_corners(&bounds),
            bounds,
            base,
            gesture: None,
            last_flip: None,
        });
        bounds
    }

    /// Re-read the selection from the store after an edit made outside the
    /// engine. Matrices go back to identity. No-op while disabled.
    pub fn rebase<S: FontStore + ?Sized>(&mut self, store: &S, selection: &HashSet<CommandId>) -> bool {
        if self.state.is_none() {
            return false;
        }
        debug!("Transform base refreshed from the store");
        self.enable(store, selection);
        true
    }

    /// Leave transform mode. A live gesture is dropped as-is; cancel it
    /// first to roll the outline back.
    pub fn disable(&mut self) {
        if self.state.take().is_some() {
            info!("Transform mode disabled");
        }
    }

    pub fn bounds(&self) -> Option<BoundingBox> {
        self.state.as_ref().map(|state| state.bounds)
    }

    /// Handles are only drawn for a selection with some extent
    pub fn handles_visible(&self) -> bool {
        self.state.as_ref().is_some_and(|state| !state.bounds.is_degenerate())
    }

    pub fn affine(&self) -> Affine {
        self.state.as_ref().map_or(Affine::IDENTITY, |state| state.affine)
    }

    pub fn perspective(&self) -> Perspective {
        self.state.as_ref().map_or(Perspective::IDENTITY, |state| state.perspective)
    }

    /// The displayed matrix: `affine ∘ perspective`, bounds-local
    pub fn target(&self) -> Perspective {
        Perspective::from_affine(self.affine()).compose(&self.perspective())
    }

    /// Map a glyph-space point of the original selection
    pub fn map(&self, point: Point) -> Point {
        self.state.as_ref().map_or(point, |state| state.map(point))
    }

    /// Where a handle is drawn, in glyph space
    pub fn handle_position(&self, handle: Quadrant) -> Option<Point> {
        let state = self.state.as_ref().filter(|state| !state.bounds.is_degenerate())?;
        let local = handle.point_in_rect(state.bounds.local_rect());
        Some(state.map_local(local) + state.offset())
    }

    /// Current state with the commands it produces
    pub fn snapshot(&self) -> Option<TransformSnapshot> {
        let state = self.state.as_ref()?;
        Some(state.snapshot_with(state.mapped_commands()))
    }

    /// Put matrices back from a snapshot, e.g. when undoing a transform
    pub fn restore(&mut self, snapshot: &TransformSnapshot) {
        if let Some(state) = self.state.as_mut() {
            state.load(snapshot);
            state.gesture = None;
            state.last_flip = None;
        }
    }

    /// Start a handle drag at glyph-space `pointer`.
    ///
    /// The rollback snapshot is only taken if none is live, so a repeated
    /// pointer-down inside one gesture keeps the original base.
    pub fn begin_drag<S: FontStore + ?Sized>(&mut self, store: &S, op: TransformOp, pointer: Point) -> bool {
        let Some(state) = self.state.as_mut() else {
            return false;
        };
        if state.bounds.is_degenerate() {
            debug!("Nothing to transform, ignoring drag");
            return false;
        }
        if let TransformOp::Warp(corner) = op {
            if corner.corner_index().is_none() {
                return false;
            }
        }
        if state.gesture.is_some() {
            return true;
        }

        let table = store.get_commands();
        let commands = state
            .base
            .iter()
            .filter_map(|command| table.get(&command.id))
            .map(|command| (command.id.clone(), command.clone()))
            .collect();
        state.gesture = Some(Gesture {
            op,
            snapshot: state.snapshot_with(commands),
            start: pointer - state.offset(),
        });
        debug!("Transform drag started: {:?}", op);
        true
    }

    /// Recompute the live matrices for glyph-space `pointer` and write the
    /// resulting points to the store. Returns false outside a drag.
    pub fn drag_move<S: FontStore + ?Sized>(&mut self, store: &mut S, pointer: Point, modifiers: ModifierState) -> bool {
        let rotation_step = self.rotation_step;
        let Some(state) = self.state.as_mut() else {
            return false;
        };
        let Some(gesture) = state.gesture.clone() else {
            return false;
        };

        let pointer = pointer - state.offset();
        let snap = &gesture.snapshot;
        let snap_state = TransformState {
            affine: snap.affine,
            perspective: snap.perspective,
            warp: snap.warp,
            bounds: snap.bounds,
            base: Vec::new(),
            gesture: None,
            last_flip: None,
        };
        let local_rect = snap.bounds.local_rect();

        match gesture.op {
            TransformOp::Scale(handle) => {
                let reference = if modifiers.alt {
                    Quadrant::Center
                } else {
                    handle.opposite()
                };
                let pivot = snap_state.map_local(reference.point_in_rect(local_rect));
                let handle_point = snap_state.map_local(handle.point_in_rect(local_rect));
                let (sx, sy) = scale_factors(handle, handle_point - pivot, pointer - pivot, modifiers.shift);
                state.affine = about(pivot, Affine::scale_non_uniform(sx, sy)) * snap.affine;
            }
            TransformOp::Rotate(handle) => {
                let reference = if modifiers.alt { handle } else { Quadrant::Center };
                let pivot = snap_state.map_local(reference.point_in_rect(local_rect));
                let mut angle = angle_between(pivot, pointer) - angle_between(pivot, gesture.start);
                if modifiers.shift {
                    angle = snap_angle(angle, rotation_step);
                }
                state.affine = about(pivot, Affine::rotate(angle)) * snap.affine;
            }
            TransformOp::Warp(corner) => {
                let Some(k) = corner.corner_index() else {
                    return false;
                };
                if snap.affine.determinant().abs() < MIN_EXTENT {
                    return false;
                }
                let mut warp = snap.warp;
                warp[k] = snap.affine.inverse() * pointer;
                match Perspective::from_quad(rect_corners(&snap.bounds), warp) {
                    Some(perspective) => {
                        state.warp = warp;
                        state.perspective = perspective;
                    }
                    None => debug!("Warp corners collinear, keeping previous mapping"),
                }
            }
        }

        store.update_commands(&state.mapped_commands());
        true
    }

    /// Commit the gesture: push a `transform` history entry from the
    /// rollback snapshot to the current state and drop the snapshot.
    pub fn end_drag<H: HistoryStore + ?Sized>(&mut self, history: &mut H) -> bool {
        let Some(state) = self.state.as_mut() else {
            return false;
        };
        let Some(gesture) = state.gesture.take() else {
            return false;
        };
        state.last_flip = None;

        let current = state.snapshot_with(state.mapped_commands());
        if current.affine == gesture.snapshot.affine && current.perspective == gesture.snapshot.perspective {
            debug!("Transform drag ended without change");
            return false;
        }
        debug!("Transform drag committed: {:?}", gesture.op);
        history.add(HistoryEntry::Transform(Change::new(gesture.snapshot, current)));
        true
    }

    /// Abort the gesture, putting matrices and points back
    pub fn cancel_drag<S: FontStore + ?Sized>(&mut self, store: &mut S) -> bool {
        let Some(state) = self.state.as_mut() else {
            return false;
        };
        let Some(gesture) = state.gesture.take() else {
            return false;
        };
        state.load(&gesture.snapshot);
        store.update_commands(&gesture.snapshot.commands);
        debug!("Transform drag cancelled");
        true
    }
}

/// Per-axis scale for dragging a handle from `from` to `to`, both relative
/// to the pivot. Axes the handle doesn't move stay at 1.
fn scale_factors(handle: Quadrant, from: Vec2, to: Vec2, keep_aspect: bool) -> (f64, f64) {
    let (moves_x, moves_y) = handle.moves_axes();
    let factor = |moves: bool, from: f64, to: f64| {
        if moves && from.abs() > MIN_EXTENT {
            to / from
        } else {
            1.0
        }
    };
    let sx = factor(moves_x, from.x, to.x);
    let sy = factor(moves_y, from.y, to.y);

    if !keep_aspect {
        return (sx, sy);
    }
    let magnitude = match (moves_x, moves_y) {
        (true, false) => sx.abs(),
        (false, true) => sy.abs(),
        _ => sx.abs().max(sy.abs()),
    };
    (magnitude * sx.signum(), magnitude * sy.signum())
}
