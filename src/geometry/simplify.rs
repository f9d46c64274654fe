//! Polyline simplification and bezier role fitting for freehand strokes

use crate::core::state::{Command, PathCommand};
use crate::geometry::utilities::distance_to_line_segment;
use kurbo::{Line, Point};

/// Reduce a polyline with the Ramer-Douglas-Peucker algorithm.
///
/// The first and last points always survive. Every dropped point lies
/// within `tolerance` of the simplified polyline.
pub fn douglas_peucker(points: &[Point], tolerance: f64) -> Vec<Point> {
    if points.len() <= 2 {
        return points.to_vec();
    }

    let mut keep = vec![false; points.len()];
    keep[0] = true;
    keep[points.len() - 1] = true;

    // Explicit stack instead of recursion; long strokes get deep
    let mut spans = vec![(0, points.len() - 1)];
    let tolerance = tolerance.max(0.0);
    while let Some((start, end)) = spans.pop() {
        if end <= start + 1 {
            continue;
        }
        let chord = Line::new(points[start], points[end]);
        let mut max_idx = start;
        let mut max_distance = -1.0;
        for (i, point) in points.iter().enumerate().take(end).skip(start + 1) {
            let d = distance_to_line_segment(*point, chord);
            if d > max_distance {
                max_distance = d;
                max_idx = i;
            }
        }
        if max_distance > tolerance {
            keep[max_idx] = true;
            spans.push((start, max_idx));
            spans.push((max_idx, end));
        }
    }

    points
        .iter()
        .zip(keep)
        .filter_map(|(point, kept)| kept.then_some(*point))
        .collect()
}

/// Assign bezier roles to simplified vertices: a `moveTo`, then repeating
/// `CP1, CP2, anchor` triples.
///
/// A trailing single vertex becomes a `lineTo`. A trailing pair becomes a
/// curve whose second control point sits on its anchor.
pub fn fit_commands(points: &[Point]) -> Vec<Command> {
    let Some((&first, rest)) = points.split_first() else {
        return Vec::new();
    };

    let mut commands = Vec::with_capacity(points.len() + 1);
    commands.push(Command::fresh(PathCommand::MoveTo(first)));

    let mut triples = rest.chunks_exact(3);
    for triple in triples.by_ref() {
        commands.push(Command::fresh(PathCommand::CubicCp1(triple[0])));
        commands.push(Command::fresh(PathCommand::CubicCp2(triple[1])));
        commands.push(Command::fresh(PathCommand::CubicTo(triple[2])));
    }

    match triples.remainder() {
        [end] => commands.push(Command::fresh(PathCommand::LineTo(*end))),
        [cp, end] => {
            commands.push(Command::fresh(PathCommand::CubicCp1(*cp)));
            commands.push(Command::fresh(PathCommand::CubicCp2(*end)));
            commands.push(Command::fresh(PathCommand::CubicTo(*end)));
        }
        _ => {}
    }
    commands
}

/// Simplify a raw stroke and fit it into commands in one step
pub fn fit_stroke(points: &[Point], tolerance: f64) -> Vec<Command> {
    fit_commands(&douglas_peucker(points, tolerance))
}
