//! Freehand tool for drawing new contours
//!
//! Pointer input accumulates a raw polyline. On pointer-up the stroke is
//! simplified and fitted into bezier commands, which are appended to the
//! glyph as a new open contour.

use crate::core::state::{Change, CommandId, FontStore, HistoryEntry, HistoryStore};
use crate::editing::drag::{DragSession, GestureKind, GestureLock};
use crate::geometry::simplify::fit_stroke;
use kurbo::Point;
use tracing::{debug, info};

/// The state of the freehand gesture
#[derive(Debug, Default)]
pub enum FreehandGestureState {
    #[default]
    Ready,
    Drawing {
        session: DragSession,
        points: Vec<Point>,
    },
}

/// Freehand stroke collector
#[derive(Debug)]
pub struct FreehandStroke {
    pub gesture: FreehandGestureState,
    /// Simplification tolerance in screen pixels
    tolerance: f64,
}

impl FreehandStroke {
    pub fn new(tolerance: f64) -> Self {
        Self {
            gesture: FreehandGestureState::Ready,
            tolerance,
        }
    }

    /// Start a stroke at glyph-space `point`
    pub fn begin(&mut self, lock: &GestureLock, point: Point) -> bool {
        if self.is_drawing() {
            return false;
        }
        let Some(session) = DragSession::begin(lock, GestureKind::Freehand, point) else {
            return false;
        };
        self.gesture = FreehandGestureState::Drawing {
            session,
            points: vec![point],
        };
        true
    }

    pub fn add_point(&mut self, point: Point) -> bool {
        let FreehandGestureState::Drawing { session, points } = &mut self.gesture else {
            return false;
        };
        if session.update(point).is_none() {
            return false;
        }
        if points.last() != Some(&point) {
            points.push(point);
        }
        true
    }

    pub fn is_drawing(&self) -> bool {
        matches!(self.gesture, FreehandGestureState::Drawing { .. })
    }

    /// Raw points collected so far
    pub fn points(&self) -> &[Point] {
        match &self.gesture {
            FreehandGestureState::Drawing { points, .. } => points,
            FreehandGestureState::Ready => &[],
        }
    }

    /// Drop the stroke without touching the outline
    pub fn cancel(&mut self) -> bool {
        if !self.is_drawing() {
            return false;
        }
        self.gesture = FreehandGestureState::Ready;
        debug!("Freehand stroke cancelled");
        true
    }

    /// Fit the stroke and append it to the glyph. `zoom` converts the pixel
    /// tolerance into glyph units. Returns the ids of the new commands.
    pub fn finish<S, H>(&mut self, store: &mut S, history: &mut H, zoom: f64) -> Vec<CommandId>
    where
        S: FontStore + ?Sized,
        H: HistoryStore + ?Sized,
    {
        let FreehandGestureState::Drawing { points, .. } = std::mem::take(&mut self.gesture) else {
            return Vec::new();
        };
        if points.len() < 2 {
            debug!("Freehand stroke too short, discarded");
            return Vec::new();
        }

        let tolerance = if zoom > 0.0 { self.tolerance / zoom } else { self.tolerance };
        let fitted = fit_stroke(&points, tolerance);
        let ids: Vec<CommandId> = fitted.iter().map(|command| command.id.clone()).collect();

        let old = store.get_commands();
        let mut new = old.clone();
        for command in fitted {
            new.push(command);
        }
        info!("Freehand stroke: {} raw points fitted to {} commands", points.len(), ids.len());
        history.add(HistoryEntry::CommandsAdd(Change::new(old, new.clone())));
        store.replace_commands(new);
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::state::{CommandKind, GlyphStore};

    #[test]
    fn test_stroke_appends_contour() {
        let lock = GestureLock::new();
        let mut store = GlyphStore::default();
        let mut history: Vec<HistoryEntry> = Vec::new();
        let mut stroke = FreehandStroke::new(2.0);

        assert!(stroke.begin(&lock, Point::new(0.0, 0.0)));
        assert!(lock.is_held());
        for i in 1..=20 {
            let x = i as f64 * 5.0;
            stroke.add_point(Point::new(x, (x / 10.0).sin() * 30.0));
        }
        let ids = stroke.finish(&mut store, &mut history, 1.0);

        assert!(!lock.is_held());
        assert!(!ids.is_empty());
        assert_eq!(store.table.len(), ids.len());
        assert_eq!(store.table.kind_at(0), Some(CommandKind::MoveTo));
        assert!(ids.len() < 21, "stroke was simplified");
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].label(), "commands.add");
    }

    #[test]
    fn test_cancel_leaves_outline_alone() {
        let lock = GestureLock::new();
        let mut store = GlyphStore::default();
        let mut history: Vec<HistoryEntry> = Vec::new();
        let mut stroke = FreehandStroke::new(2.0);

        stroke.begin(&lock, Point::ZERO);
        stroke.add_point(Point::new(10.0, 10.0));
        assert!(stroke.cancel());
        assert!(!lock.is_held());
        assert!(!stroke.add_point(Point::new(20.0, 20.0)));
        assert!(stroke.finish(&mut store, &mut history, 1.0).is_empty());
        assert!(store.table.is_empty());
        assert!(history.is_empty());
    }

    #[test]
    fn test_single_point_is_discarded() {
        let lock = GestureLock::new();
        let mut store = GlyphStore::default();
        let mut history: Vec<HistoryEntry> = Vec::new();
        let mut stroke = FreehandStroke::new(2.0);
        stroke.begin(&lock, Point::ZERO);
        stroke.add_point(Point::ZERO);
        assert!(stroke.finish(&mut store, &mut history, 1.0).is_empty());
        assert!(history.is_empty());
    }

    #[test]
    fn test_busy_lock_blocks_stroke() {
        let lock = GestureLock::new();
        let _guard = lock.try_acquire(GestureKind::PointDrag);
        let mut stroke = FreehandStroke::new(2.0);
        assert!(!stroke.begin(&lock, Point::ZERO));
        assert!(!stroke.is_drawing());
    }
}
