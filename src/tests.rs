//! End-to-end checks through the public API

#[cfg(test)]
mod table_tests {
    use crate::core::state::{Command, CommandTable};
    use crate::geometry::compute_bounds;

    #[test]
    fn test_normalize_round_trip() {
        let table = CommandTable::normalize(vec![
            Command::move_to("m", 0.0, 0.0),
            Command::cubic_cp1("c1", 10.0, 20.0),
            Command::cubic_cp2("c2", 30.0, 20.0),
            Command::cubic_to("b", 40.0, 0.0),
            Command::close_path("z"),
        ]);
        let rebuilt = CommandTable::normalize(table.ids.iter().filter_map(|id| table.items.get(id).cloned()));
        assert_eq!(rebuilt, table);
        assert!(rebuilt.is_consistent());
    }

    #[test]
    fn test_bounds_of_open_triangle() {
        let table = CommandTable::normalize(vec![
            Command::move_to("a", 0.0, 0.0),
            Command::line_to("b", 10.0, 0.0),
            Command::line_to("c", 10.0, 10.0),
        ]);
        let bounds = compute_bounds(&table, 1.0);
        assert_eq!(
            (bounds.min_x, bounds.min_y, bounds.max_x, bounds.max_y, bounds.width, bounds.height),
            (0.0, 0.0, 10.0, 10.0, 10.0, 10.0)
        );
    }
}

#[cfg(test)]
mod topology_tests {
    use crate::core::state::{Command, CommandId, CommandKind, CommandTable, GlyphStore, HistoryEntry};
    use crate::editing::{delete_points, insert_point};
    use crate::geometry::bezier::{quadratic_to_cubic, split_cubic};
    use kurbo::{CubicBez, Line, ParamCurve, ParamCurveNearest, Point};
    use std::collections::HashSet;

    #[test]
    fn test_insert_on_straight_segment() {
        let mut store = GlyphStore::new(CommandTable::normalize(vec![
            Command::move_to("m", 0.0, 0.0),
            Command::line_to("l", 10.0, 0.0),
        ]));
        let mut history: Vec<HistoryEntry> = Vec::new();
        let primary = insert_point(&mut store, &mut history, &CommandId::from("l"), Point::new(5.0, 0.0), None)
            .expect("insert on a line always succeeds");

        let table = &store.table;
        assert_eq!(table.len(), 3);
        assert_eq!(table.ids[0], CommandId::from("m"));
        assert_eq!(table.ids[1], primary);
        assert_eq!(table.ids[2], CommandId::from("l"));
        assert_eq!(table.point(&primary), Some(Point::new(5.0, 0.0)));
        assert_eq!(table.kind_at(1), Some(CommandKind::LineTo));
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn test_delete_bezier_anchor_empties_table() {
        let mut store = GlyphStore::new(CommandTable::normalize(vec![
            Command::move_to("m", 0.0, 0.0),
            Command::cubic_cp1("c1", 10.0, 20.0),
            Command::cubic_cp2("c2", 30.0, 20.0),
            Command::cubic_to("b", 40.0, 0.0),
        ]));
        let mut history: Vec<HistoryEntry> = Vec::new();
        let outcome = delete_points(&mut store, &mut history, &HashSet::from([CommandId::from("b")]));

        assert!(store.table.is_empty());
        assert_eq!(outcome.removed.len(), 4);
        assert_eq!(history[0].label(), "commands.delete");
    }

    #[test]
    fn test_deleting_whole_contour_leaves_no_dangling_close() {
        let mut store = GlyphStore::new(CommandTable::normalize(vec![
            Command::move_to("m1", 0.0, 0.0),
            Command::line_to("l1", 10.0, 0.0),
            Command::line_to("l2", 10.0, 10.0),
            Command::close_path("z1"),
            Command::move_to("m2", 20.0, 0.0),
            Command::line_to("l3", 30.0, 0.0),
            Command::close_path("z2"),
        ]));
        let mut history: Vec<HistoryEntry> = Vec::new();
        let selection: HashSet<CommandId> = ["m1", "l1", "l2", "z1"].into_iter().map(CommandId::from).collect();
        delete_points(&mut store, &mut history, &selection);

        let table = &store.table;
        assert!(table.is_consistent());
        assert_eq!(table.kind_at(0), Some(CommandKind::MoveTo));
        for i in 0..table.len() {
            if table.kind_at(i) == Some(CommandKind::ClosePath) {
                assert!(i > 0 && table.kind_at(i - 1) != Some(CommandKind::ClosePath));
            }
        }
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn test_midpoint_quadratic_elevates_onto_chord() {
        let (p0, e) = (Point::new(0.0, 0.0), Point::new(30.0, 60.0));
        let (cp1, cp2, _) = quadratic_to_cubic(p0, p0.midpoint(e), e);
        let chord = Line::new(p0, e);
        assert!(chord.nearest(cp1, 1e-9).distance_sq < 1e-12);
        assert!(chord.nearest(cp2, 1e-9).distance_sq < 1e-12);
    }

    #[test]
    fn test_split_halves_trace_the_original() {
        let cubic = CubicBez::new((0.0, 0.0), (10.0, 40.0), (50.0, 40.0), (60.0, 0.0));
        let (left, right) = split_cubic(cubic, 0.5);
        for i in 0..=10 {
            let s = i as f64 / 10.0;
            assert!(left.eval(s).distance(cubic.eval(s * 0.5)) < 1e-6);
            assert!(right.eval(s).distance(cubic.eval(0.5 + s * 0.5)) < 1e-6);
        }
    }
}

#[cfg(test)]
mod transform_tests {
    use crate::core::state::{Command, CommandTable, GlyphStore, HistoryEntry};
    use crate::editing::TransformEngine;
    use crate::geometry::FlipAxis;
    use kurbo::Point;
    use std::collections::HashSet;

    #[test]
    fn test_double_flip_restores_points() {
        let original = CommandTable::normalize(vec![
            Command::move_to("m", 3.0, 7.0),
            Command::cubic_cp1("c1", 15.5, 22.25),
            Command::cubic_cp2("c2", 31.0, 19.0),
            Command::cubic_to("b", 42.0, 1.5),
        ]);
        let mut store = GlyphStore::new(original.clone());
        let mut history: Vec<HistoryEntry> = Vec::new();
        let mut engine = TransformEngine::default();
        engine.enable(&store, &HashSet::new());

        let origin = Point::new(12.0, 5.0);
        assert!(engine.flip_about(&mut store, &mut history, origin, FlipAxis::Vertical));
        assert!(engine.flip_about(&mut store, &mut history, origin, FlipAxis::Vertical));

        for command in original.iter() {
            let (Some(before), Some(after)) = (command.point(), store.table.point(&command.id)) else {
                continue;
            };
            assert!(before.distance(after) < 1e-9, "{} moved from {:?} to {:?}", command.id, before, after);
        }
    }
}

#[cfg(test)]
mod snapping_tests {
    use crate::core::state::{Command, CommandId, CommandTable};
    use crate::editing::snapping::{SnapHandler, SnapRequest, SnapSource};
    use kurbo::Point;
    use std::collections::HashSet;

    #[test]
    fn test_tie_break_is_stable() {
        // Two candidates at the same x, both in range
        let table = CommandTable::normalize(vec![
            Command::move_to("m", 0.0, 0.0),
            Command::line_to("p", 50.0, 0.0),
            Command::line_to("q", 50.0, 100.0),
            Command::line_to("dragged", 80.0, 50.0),
        ]);
        let selection = HashSet::from([CommandId::from("dragged")]);
        let mut handler = SnapHandler::default();
        handler.start_snap(&[], &[], &table, 0..table.len(), &selection);

        let request = SnapRequest {
            proposed: Point::new(51.0, 50.0),
            scale: 1.0,
            zoom: 1.0,
            grid: None,
            snap_points: true,
        };
        let first = handler.snap_position(&request);
        for _ in 0..10 {
            assert_eq!(handler.snap_position(&request), first);
        }
        let source = first.x.map(|snap| snap.source);
        assert!(matches!(source, Some(SnapSource::Point { ref id, .. }) if *id == CommandId::from("p")));
        assert_eq!(first.position.x, 50.0);
    }
}
