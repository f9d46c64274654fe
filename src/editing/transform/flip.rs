//! Mirroring the selection about one of the nine bounding-box anchors

use super::{about, TransformEngine};
use crate::core::state::{Change, FontStore, HistoryEntry, HistoryStore};
use crate::geometry::bounds::compute_bounds_of;
use crate::geometry::quadrant::{FlipAxis, Quadrant};
use kurbo::{Affine, Point};
use tracing::debug;

impl TransformEngine {
    /// Flip about `anchor` of the selection's current (visual) bounds.
    ///
    /// Flipping about the same anchor and axis twice in a row uses the
    /// mirrored anchor the second time, which is where the first flip moved
    /// the original anchor, so the pair restores the shape.
    pub fn flip<S, H>(&mut self, store: &mut S, history: &mut H, anchor: Quadrant, axis: FlipAxis) -> bool
    where
        S: FontStore + ?Sized,
        H: HistoryStore + ?Sized,
    {
        let Some(state) = self.state.as_mut() else {
            return false;
        };
        if state.gesture.is_some() {
            return false;
        }
        let visual = compute_bounds_of(state.mapped_commands().values(), 1.0);
        if visual.is_degenerate() {
            return false;
        }

        let effective = if state.last_flip == Some((anchor, axis)) {
            state.last_flip = None;
            anchor.mirror(axis)
        } else {
            state.last_flip = Some((anchor, axis));
            anchor
        };
        let origin = effective.point_in_rect(visual.to_rect());
        debug!("Flip {:?} about {:?} at {:?}", axis, effective, origin);

        let last_flip = state.last_flip;
        let flipped = self.flip_about(store, history, origin, axis);
        if let Some(state) = self.state.as_mut() {
            state.last_flip = last_flip;
        }
        flipped
    }

    /// Flip about a fixed glyph-space origin. Two calls with the same
    /// origin and axis restore every point.
    pub fn flip_about<S, H>(&mut self, store: &mut S, history: &mut H, origin: Point, axis: FlipAxis) -> bool
    where
        S: FontStore + ?Sized,
        H: HistoryStore + ?Sized,
    {
        let Some(state) = self.state.as_mut() else {
            return false;
        };
        if state.gesture.is_some() {
            return false;
        }
        state.last_flip = None;

        let old = state.snapshot_with(state.mapped_commands());
        let (sx, sy) = axis.scale_factors();
        let local_origin = origin - state.offset();
        state.affine = about(local_origin, Affine::scale_non_uniform(sx, sy)) * state.affine;

        let commands = state.mapped_commands();
        store.update_commands(&commands);
        let new = state.snapshot_with(commands);
        history.add(HistoryEntry::Transform(Change::new(old, new)));
        true
    }
}

#[cfg(test)]
mod tests {
    use crate::core::state::{Command, CommandTable, GlyphStore, HistoryEntry};
    use crate::editing::transform::TransformEngine;
    use crate::geometry::quadrant::{FlipAxis, Quadrant};
    use kurbo::Point;
    use std::collections::HashSet;

    fn approx_eq(a: Point, b: Point) -> bool {
        (a.x - b.x).abs() < 1e-6 && (a.y - b.y).abs() < 1e-6
    }

    fn triangle() -> GlyphStore {
        GlyphStore::new(CommandTable::normalize(vec![
            Command::move_to("a", 10.0, 10.0),
            Command::line_to("b", 60.0, 10.0),
            Command::line_to("c", 10.0, 90.0),
            Command::close_path("z"),
        ]))
    }

    #[test]
    fn test_double_flip_about_fixed_origin_restores() {
        let mut store = triangle();
        let before = store.table.clone();
        let mut engine = TransformEngine::default();
        let mut history: Vec<HistoryEntry> = Vec::new();
        engine.enable(&store, &HashSet::new());

        let origin = Point::new(37.0, 55.5);
        engine.flip_about(&mut store, &mut history, origin, FlipAxis::Vertical);
        assert!(approx_eq(store.table.point(&"c".into()).unwrap(), Point::new(10.0, 21.0)));
        engine.flip_about(&mut store, &mut history, origin, FlipAxis::Vertical);

        for id in ["a", "b", "c"] {
            let restored = store.table.point(&id.into()).unwrap();
            assert!(approx_eq(restored, before.point(&id.into()).unwrap()), "{id} moved");
        }
        assert_eq!(history.len(), 2);
    }

    #[test]
    fn test_repeated_anchor_flip_toggles_origin() {
        let mut store = triangle();
        let before = store.table.clone();
        let mut engine = TransformEngine::default();
        let mut history: Vec<HistoryEntry> = Vec::new();
        engine.enable(&store, &HashSet::new());

        assert!(engine.flip(&mut store, &mut history, Quadrant::Left, FlipAxis::Horizontal));
        // mirrored across x = 10
        assert!(approx_eq(store.table.point(&"b".into()).unwrap(), Point::new(-40.0, 10.0)));

        assert!(engine.flip(&mut store, &mut history, Quadrant::Left, FlipAxis::Horizontal));
        for id in ["a", "b", "c"] {
            assert!(approx_eq(
                store.table.point(&id.into()).unwrap(),
                before.point(&id.into()).unwrap()
            ));
        }
    }

    #[test]
    fn test_flip_history_undo() {
        let mut store = triangle();
        let before = store.table.clone();
        let mut engine = TransformEngine::default();
        let mut history = crate::core::state::HistoryStack::default();
        engine.enable(&store, &HashSet::new());

        engine.flip(&mut store, &mut history, Quadrant::Center, FlipAxis::Vertical);
        let entry = history.undo(&mut store).unwrap();
        let HistoryEntry::Transform(change) = entry else {
            panic!("expected a transform entry");
        };
        engine.restore(&change.old);
        assert_eq!(store.table, before);
        assert_eq!(engine.affine(), kurbo::Affine::IDENTITY);
    }
}
