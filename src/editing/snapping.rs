//! Snapping for dragged points, with the guidelines that explain each snap
//!
//! Targets are gathered once when a drag starts and reused for every tick.
//! Each axis snaps independently: the first target within tolerance wins,
//! trying metric lines, then rulers, then other on-curve points of the
//! active contour, in that order. An axis nothing snapped may still round
//! to the grid when it's already close to a grid line.
//!
//! Snapping never fails: with no match the proposed position comes back
//! unchanged with no sources.

use crate::core::settings::EditorSettings;
use crate::core::state::{CommandId, CommandTable};
use crate::font_source::metrics::{LineOrientation, MetricKind, MetricLine};
use kurbo::{Line, Point};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::ops::Range;

/// A user-placed guide
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ruler {
    pub orientation: LineOrientation,
    pub value: f64,
}

/// What produced a snap on one axis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SnapSource {
    Metric(MetricKind),
    /// Index into the rulers the handler was started with
    Ruler(usize),
    Point { id: CommandId, position: Point },
    Grid,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisSnap {
    pub value: f64,
    pub source: SnapSource,
}

/// A temporary line drawn from the dragged point to what it snapped to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Guideline {
    pub line: Line,
    pub source: SnapSource,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SnapResult {
    pub position: Point,
    pub x: Option<AxisSnap>,
    pub y: Option<AxisSnap>,
    pub guidelines: Vec<Guideline>,
}

impl SnapResult {
    fn unchanged(position: Point) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Sources that produced a snap, x first
    pub fn sources(&self) -> impl Iterator<Item = &SnapSource> {
        self.x.iter().chain(self.y.iter()).map(|snap| &snap.source)
    }
}

/// Per-tick inputs
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapRequest {
    pub proposed: Point,
    /// Glyph units to screen pixels; tolerance is `snap_distance / scale`
    pub scale: f64,
    /// Canvas zoom, sizes guideline overhang
    pub zoom: f64,
    pub grid: Option<f64>,
    pub snap_points: bool,
}

#[derive(Debug, Clone, PartialEq)]
struct Target {
    value: f64,
    source: SnapSource,
}

#[derive(Debug, Clone, Default, PartialEq)]
struct Targets {
    x: Vec<Target>,
    y: Vec<Target>,
}

#[derive(Debug, Clone)]
pub struct SnapHandler {
    targets: Option<Targets>,
    snap_distance: f64,
    grid_fraction: f64,
    guideline_overhang: f64,
}

impl Default for SnapHandler {
    fn default() -> Self {
        Self::new(&EditorSettings::default())
    }
}

impl SnapHandler {
    pub fn new(settings: &EditorSettings) -> Self {
        Self {
            targets: None,
            snap_distance: settings.snap_distance,
            grid_fraction: settings.grid_snap_fraction,
            guideline_overhang: settings.guideline_overhang,
        }
    }

    /// Gather targets for a drag. Selected commands and control points
    /// never become targets.
    pub fn start_snap(
        &mut self,
        metrics: &[MetricLine],
        rulers: &[Ruler],
        table: &CommandTable,
        active_contour: Range<usize>,
        selection: &HashSet<CommandId>,
    ) {
        let mut targets = Targets::default();

        for line in metrics {
            let target = Target {
                value: line.value,
                source: SnapSource::Metric(line.kind),
            };
            match line.orientation {
                LineOrientation::Horizontal => targets.y.push(target),
                LineOrientation::Vertical => targets.x.push(target),
            }
        }

        for (index, ruler) in rulers.iter().enumerate() {
            let target = Target {
                value: ruler.value,
                source: SnapSource::Ruler(index),
            };
            match ruler.orientation {
                LineOrientation::Horizontal => targets.y.push(target),
                LineOrientation::Vertical => targets.x.push(target),
            }
        }

        let end = active_contour.end.min(table.len());
        for index in active_contour.start.min(end)..end {
            let Some(command) = table.at(index) else {
                continue;
            };
            if !command.kind().is_anchor() || selection.contains(&command.id) {
                continue;
            }
            let Some(position) = command.point() else {
                continue;
            };
            let source = SnapSource::Point {
                id: command.id.clone(),
                position,
            };
            targets.x.push(Target {
                value: position.x,
                source: source.clone(),
            });
            targets.y.push(Target {
                value: position.y,
                source,
            });
        }

        self.targets = Some(targets);
    }

    /// Drop the targets; guidelines disappear with them
    pub fn clear(&mut self) {
        self.targets = None;
    }

    pub fn is_active(&self) -> bool {
        self.targets.is_some()
    }

    pub fn snap_position(&self, request: &SnapRequest) -> SnapResult {
        let proposed = request.proposed;
        let Some(targets) = &self.targets else {
            return SnapResult::unchanged(proposed);
        };
        if request.scale.is_nan() || request.scale <= 0.0 || !proposed.x.is_finite() || !proposed.y.is_finite() {
            return SnapResult::unchanged(proposed);
        }

        let tolerance = self.snap_distance / request.scale;
        let x = first_within(&targets.x, proposed.x, tolerance, request.snap_points)
            .or_else(|| self.grid_snap(proposed.x, request.grid));
        let y = first_within(&targets.y, proposed.y, tolerance, request.snap_points)
            .or_else(|| self.grid_snap(proposed.y, request.grid));

        let position = Point::new(
            x.as_ref().map_or(proposed.x, |snap| snap.value),
            y.as_ref().map_or(proposed.y, |snap| snap.value),
        );
        let overhang = if request.zoom > 0.0 {
            self.guideline_overhang / request.zoom
        } else {
            self.guideline_overhang
        };
        let mut guidelines = Vec::new();
        if let Some(snap) = &x {
            guidelines.extend(guideline(position, snap, LineOrientation::Vertical, overhang));
        }
        if let Some(snap) = &y {
            guidelines.extend(guideline(position, snap, LineOrientation::Horizontal, overhang));
        }

        SnapResult {
            position,
            x,
            y,
            guidelines,
        }
    }

    /// Round to the grid only within `grid_fraction` of a cell
    fn grid_snap(&self, value: f64, grid: Option<f64>) -> Option<AxisSnap> {
        let grid = grid.filter(|size| *size > 0.0)?;
        let nearest = (value / grid).round() * grid;
        ((value - nearest).abs() <= grid * self.grid_fraction).then_some(AxisSnap {
            value: nearest,
            source: SnapSource::Grid,
        })
    }
}

fn first_within(targets: &[Target], value: f64, tolerance: f64, snap_points: bool) -> Option<AxisSnap> {
    targets
        .iter()
        .filter(|target| snap_points || !matches!(target.source, SnapSource::Point { .. }))
        .find(|target| (target.value - value).abs() <= tolerance)
        .map(|target| AxisSnap {
            value: target.value,
            source: target.source.clone(),
        })
}

/// Guide for one snapped axis; `orientation` is the direction of the line
fn guideline(position: Point, snap: &AxisSnap, orientation: LineOrientation, overhang: f64) -> Option<Guideline> {
    let line = match &snap.source {
        SnapSource::Grid => return None,
        SnapSource::Point { position: source, .. } => Line::new(*source, position),
        SnapSource::Metric(_) | SnapSource::Ruler(_) => match orientation {
            LineOrientation::Horizontal => Line::new(
                Point::new(position.x - overhang, snap.value),
                Point::new(position.x + overhang, snap.value),
            ),
            LineOrientation::Vertical => Line::new(
                Point::new(snap.value, position.y - overhang),
                Point::new(snap.value, position.y + overhang),
            ),
        },
    };
    Some(Guideline {
        line,
        source: snap.source.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::state::Command;
    use crate::font_source::metrics::FontMetrics;

    fn contour() -> CommandTable {
        CommandTable::normalize(vec![
            Command::move_to("m", 0.0, 0.0),
            Command::line_to("p1", 100.0, 300.0),
            Command::cubic_cp1("c1", 150.0, 420.0),
            Command::cubic_cp2("c2", 250.0, 420.0),
            Command::cubic_to("p2", 300.0, 300.0),
            Command::line_to("drag", 200.0, 100.0),
            Command::close_path("z"),
        ])
    }

    fn request(x: f64, y: f64) -> SnapRequest {
        SnapRequest {
            proposed: Point::new(x, y),
            scale: 1.0,
            zoom: 1.0,
            grid: None,
            snap_points: true,
        }
    }

    fn handler(metrics: &[MetricLine], rulers: &[Ruler]) -> SnapHandler {
        let table = contour();
        let mut handler = SnapHandler::default();
        let selection = HashSet::from([CommandId::from("drag")]);
        handler.start_snap(metrics, rulers, &table, 0..table.len(), &selection);
        handler
    }

    #[test]
    fn test_snaps_to_point_and_draws_segment() {
        let handler = handler(&[], &[]);
        let result = handler.snap_position(&request(102.0, 180.0));
        assert_eq!(result.position, Point::new(100.0, 180.0));
        assert_eq!(
            result.x.as_ref().map(|snap| &snap.source),
            Some(&SnapSource::Point {
                id: "p1".into(),
                position: Point::new(100.0, 300.0)
            })
        );
        assert!(result.y.is_none());
        assert_eq!(result.guidelines.len(), 1);
        assert_eq!(result.guidelines[0].line, Line::new((100.0, 300.0), (100.0, 180.0)));
    }

    #[test]
    fn test_control_points_and_selection_are_ignored() {
        let handler = handler(&[], &[]);
        // near c1.x and the dragged point's own x
        let result = handler.snap_position(&request(151.0, 20.0));
        assert_eq!(result.position, Point::new(151.0, 20.0));
        let result = handler.snap_position(&request(201.0, 99.0));
        assert!(result.x.is_none() && result.y.is_none());
        assert!(result.guidelines.is_empty());
    }

    #[test]
    fn test_metric_lines_come_first() {
        let metrics = FontMetrics::with_units_per_em(1000.0).metric_lines(600.0);
        let handler = handler(&metrics, &[]);
        // baseline (y=0) and the moveTo at y=0 both qualify
        let result = handler.snap_position(&request(50.0, 3.0));
        assert_eq!(result.position.y, 0.0);
        assert_eq!(result.y.unwrap().source, SnapSource::Metric(MetricKind::Baseline));
    }

    #[test]
    fn test_tolerance_scales_with_view() {
        let handler = handler(&[], &[]);
        let mut zoomed_in = request(103.0, 0.0);
        zoomed_in.scale = 2.0;
        assert!(handler.snap_position(&zoomed_in).x.is_none());
        zoomed_in.scale = 0.5;
        assert_eq!(handler.snap_position(&zoomed_in).position.x, 100.0);
    }

    #[test]
    fn test_tie_break_is_deterministic() {
        let rulers = [
            Ruler {
                orientation: LineOrientation::Vertical,
                value: 402.0,
            },
            Ruler {
                orientation: LineOrientation::Vertical,
                value: 398.0,
            },
        ];
        let handler = handler(&[], &rulers);
        let first = handler.snap_position(&request(400.0, 50.0));
        for _ in 0..10 {
            assert_eq!(handler.snap_position(&request(400.0, 50.0)), first);
        }
        assert_eq!(first.x.unwrap().source, SnapSource::Ruler(0));
    }

    #[test]
    fn test_grid_only_near_lines() {
        let handler = handler(&[], &[]);
        let mut near = request(448.0, 52.0);
        near.grid = Some(50.0);
        assert_eq!(handler.snap_position(&near).position, Point::new(450.0, 50.0));

        let mut far = request(470.0, 75.0);
        far.grid = Some(50.0);
        assert_eq!(handler.snap_position(&far).position, Point::new(470.0, 75.0));
    }

    #[test]
    fn test_point_snapping_can_be_disabled() {
        let handler = handler(&[], &[]);
        let mut request = request(102.0, 180.0);
        request.snap_points = false;
        assert_eq!(handler.snap_position(&request).position, Point::new(102.0, 180.0));
    }

    #[test]
    fn test_inactive_handler_passes_through() {
        let mut handler = handler(&[], &[]);
        handler.clear();
        let result = handler.snap_position(&request(102.0, 180.0));
        assert_eq!(result, SnapResult::unchanged(Point::new(102.0, 180.0)));
    }
}
