//! UFO format conversion utilities
//!
//! Conversion between norad glyphs and command tables. This is pure data
//! transformation: a UFO contour is a ring of typed points, a command
//! table contour is a `moveTo` followed by segment commands and an
//! optional `closePath`.
//!
//! Reading rotates closed contours to start at their first on-curve point,
//! elevates single-offcurve `curve` segments to cubics and expands
//! multi-offcurve `qcurve` runs with implied on-curve midpoints. Writing
//! folds a closing anchor that repeats the `moveTo` back into the first
//! point, which takes the type of that closing segment.

use crate::core::state::{Command, CommandKind, CommandTable, PathCommand};
use crate::font_source::metrics::FontInfo;
use crate::geometry::bezier::quadratic_to_cubic;
use kurbo::Point;
use norad::{Font, PointType};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::warn;

/// One glyph of the default layer, with its outline as a command table
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GlyphData {
    pub name: String,
    pub advance_width: f64,
    pub advance_height: Option<f64>,
    pub unicode_values: Vec<char>,
    pub commands: CommandTable,
    pub components: Vec<ComponentData>,
}

/// Component reference with its 2x3 transform
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ComponentData {
    pub base_glyph: String,
    pub transform: [f64; 6],
}

/// Every glyph of a font's default layer, keyed by name
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FontData {
    pub glyphs: BTreeMap<String, GlyphData>,
    pub path: Option<PathBuf>,
}

impl GlyphData {
    /// Convert from norad glyph
    pub fn from_norad_glyph(norad_glyph: &norad::Glyph) -> Self {
        let components = norad_glyph
            .components
            .iter()
            .map(ComponentData::from_norad_component)
            .collect();

        Self {
            name: norad_glyph.name().to_string(),
            advance_width: norad_glyph.width,
            advance_height: Some(norad_glyph.height),
            unicode_values: norad_glyph.codepoints.iter().collect(),
            commands: table_from_contours(&norad_glyph.contours),
            components,
        }
    }

    /// Convert back to norad glyph
    pub fn to_norad_glyph(&self) -> norad::Glyph {
        let mut glyph = norad::Glyph::new(&self.name);
        glyph.width = self.advance_width;
        glyph.height = self.advance_height.unwrap_or(0.0);

        for &codepoint in &self.unicode_values {
            glyph.codepoints.insert(codepoint);
        }

        glyph.contours = contours_from_table(&self.commands);
        glyph.components = self
            .components
            .iter()
            .filter_map(ComponentData::to_norad_component)
            .collect();

        glyph
    }
}

impl ComponentData {
    pub fn from_norad_component(norad_component: &norad::Component) -> Self {
        Self {
            base_glyph: norad_component.base.to_string(),
            transform: [
                norad_component.transform.x_scale,
                norad_component.transform.xy_scale,
                norad_component.transform.yx_scale,
                norad_component.transform.y_scale,
                norad_component.transform.x_offset,
                norad_component.transform.y_offset,
            ],
        }
    }

    /// `None` if the base glyph name is not a valid UFO name
    pub fn to_norad_component(&self) -> Option<norad::Component> {
        let base_name: norad::Name = match self.base_glyph.parse() {
            Ok(name) => name,
            Err(_) => {
                warn!("Dropping component with invalid base glyph name {:?}", self.base_glyph);
                return None;
            }
        };

        let transform = norad::AffineTransform {
            x_scale: self.transform[0],
            xy_scale: self.transform[1],
            yx_scale: self.transform[2],
            y_scale: self.transform[3],
            x_offset: self.transform[4],
            y_offset: self.transform[5],
        };

        Some(norad::Component::new(base_name, transform, None))
    }
}

impl FontData {
    /// Extract every glyph of the default layer
    pub fn from_norad_font(font: &Font, path: Option<PathBuf>) -> Self {
        let glyphs = font
            .default_layer()
            .iter()
            .map(|glyph| (glyph.name().to_string(), GlyphData::from_norad_glyph(glyph)))
            .collect();

        Self { glyphs, path }
    }

    /// Build a complete norad Font
    pub fn to_norad_font(&self, info: &FontInfo) -> Font {
        let mut font = Font::new();
        font.font_info = info.to_norad_font_info();

        let layer = font.default_layer_mut();
        for glyph_data in self.glyphs.values() {
            layer.insert_glyph(glyph_data.to_norad_glyph());
        }

        font
    }

    pub fn glyph(&self, name: &str) -> Option<&GlyphData> {
        self.glyphs.get(name)
    }
}

/// All contours of a glyph as one command table
pub fn table_from_contours(contours: &[norad::Contour]) -> CommandTable {
    CommandTable::normalize(contours.iter().flat_map(commands_from_contour))
}

/// One UFO contour as commands with fresh ids
pub fn commands_from_contour(contour: &norad::Contour) -> Vec<Command> {
    let points = &contour.points;
    let Some(first) = points.first() else {
        return Vec::new();
    };
    let open = first.typ == PointType::Move;

    let ring: Vec<&norad::ContourPoint> = if open {
        points.iter().collect()
    } else {
        let Some(start) = points.iter().position(|p| p.typ != PointType::OffCurve) else {
            warn!("Skipping contour with no on-curve points");
            return Vec::new();
        };
        points[start..].iter().chain(points[..start].iter()).collect()
    };

    let start = Point::new(ring[0].x, ring[0].y);
    let mut commands = vec![Command::fresh(PathCommand::MoveTo(start))];
    let mut previous = start;
    let mut pending: Vec<Point> = Vec::new();

    for point in &ring[1..] {
        let position = Point::new(point.x, point.y);
        if point.typ == PointType::OffCurve {
            pending.push(position);
            continue;
        }
        push_segment(&mut commands, &point.typ, previous, &pending, position);
        pending.clear();
        previous = position;
    }

    if !open {
        // The first point's type says how the ring closes onto it
        let closes_straight = matches!(ring[0].typ, PointType::Line | PointType::Move) || pending.is_empty();
        if !closes_straight {
            push_segment(&mut commands, &ring[0].typ, previous, &pending, start);
        }
        commands.push(Command::fresh(PathCommand::ClosePath));
    }
    commands
}

fn push_segment(commands: &mut Vec<Command>, typ: &PointType, previous: Point, offcurves: &[Point], end: Point) {
    match (typ, offcurves) {
        (PointType::Curve, [cp1, cp2]) => {
            commands.push(Command::fresh(PathCommand::CubicCp1(*cp1)));
            commands.push(Command::fresh(PathCommand::CubicCp2(*cp2)));
            commands.push(Command::fresh(PathCommand::CubicTo(end)));
        }
        (PointType::Curve, [control]) => {
            let (cp1, cp2, end) = quadratic_to_cubic(previous, *control, end);
            commands.push(Command::fresh(PathCommand::CubicCp1(cp1)));
            commands.push(Command::fresh(PathCommand::CubicCp2(cp2)));
            commands.push(Command::fresh(PathCommand::CubicTo(end)));
        }
        (PointType::Curve, [.., cp1, cp2]) => {
            warn!("Curve segment with {} off-curve points, keeping the last two", offcurves.len());
            commands.push(Command::fresh(PathCommand::CubicCp1(*cp1)));
            commands.push(Command::fresh(PathCommand::CubicCp2(*cp2)));
            commands.push(Command::fresh(PathCommand::CubicTo(end)));
        }
        (PointType::QCurve, [_, ..]) => {
            for (i, control) in offcurves.iter().enumerate() {
                let anchor = match offcurves.get(i + 1) {
                    Some(next) => control.midpoint(*next),
                    None => end,
                };
                commands.push(Command::fresh(PathCommand::QuadCp(*control)));
                commands.push(Command::fresh(PathCommand::QuadTo(anchor)));
            }
        }
        _ => commands.push(Command::fresh(PathCommand::LineTo(end))),
    }
}

/// Every contour of a command table as UFO contours
pub fn contours_from_table(table: &CommandTable) -> Vec<norad::Contour> {
    table
        .contours()
        .into_iter()
        .filter_map(|range| {
            let commands: Vec<&Command> = range.filter_map(|i| table.at(i)).collect();
            contour_from_commands(&commands)
        })
        .collect()
}

/// One table contour as a UFO contour; `None` without a leading `moveTo`
pub fn contour_from_commands(commands: &[&Command]) -> Option<norad::Contour> {
    let (first, rest) = commands.split_first()?;
    let start = match first.command {
        PathCommand::MoveTo(point) => point,
        _ => {
            warn!("Contour starting with {:?} skipped", first.kind());
            return None;
        }
    };
    let closed = rest.last().is_some_and(|c| c.kind() == CommandKind::ClosePath);

    let mut points: Vec<(Point, PointType)> = rest
        .iter()
        .filter_map(|command| {
            let typ = match command.kind() {
                CommandKind::LineTo => PointType::Line,
                CommandKind::BezierCurveTo => PointType::Curve,
                CommandKind::QuadraticCurveTo => PointType::QCurve,
                CommandKind::BezierCurveToCp1 | CommandKind::BezierCurveToCp2 | CommandKind::QuadraticCurveToCp => {
                    PointType::OffCurve
                }
                CommandKind::MoveTo | CommandKind::ClosePath => return None,
            };
            command.point().map(|point| (point, typ))
        })
        .collect();

    let first_type = if !closed {
        PointType::Move
    } else {
        let last_anchor = points.iter().rposition(|(_, typ)| *typ != PointType::OffCurve);
        match last_anchor {
            Some(index) if points[index].0 == start && index == points.len() - 1 => {
                let (_, typ) = points.remove(index);
                typ
            }
            _ => PointType::Line,
        }
    };

    let mut contour_points = Vec::with_capacity(points.len() + 1);
    contour_points.push(norad::ContourPoint::new(start.x, start.y, first_type, false, None, None));
    for (point, typ) in points {
        contour_points.push(norad::ContourPoint::new(point.x, point.y, typ, false, None, None));
    }
    Some(norad::Contour::new(contour_points, None))
}
