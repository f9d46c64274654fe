//! Path command data structures
//!
//! A glyph outline is stored as a flat run of commands. Every command
//! carries at most one point: cubic and quadratic control points are
//! standalone commands that precede the anchor they shape, so a cubic
//! segment is always the triplet `CP1, CP2, anchor`.

use kurbo::Point;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_COMMAND_ID: AtomicU64 = AtomicU64::new(1);

/// Unique identifier of a command within a glyph
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommandId(String);

impl CommandId {
    pub fn new<S: Into<String>>(id: S) -> Self {
        Self(id.into())
    }

    /// Generate a fresh id, unique for the lifetime of the process
    pub fn next() -> Self {
        let n = NEXT_COMMAND_ID.fetch_add(1, Ordering::Relaxed);
        Self(format!("cmd-{n}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CommandId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CommandId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// The drawing instruction name, as used on the wire and in logs
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CommandKind {
    #[serde(rename = "moveTo")]
    MoveTo,
    #[serde(rename = "lineTo")]
    LineTo,
    #[serde(rename = "quadraticCurveTo")]
    QuadraticCurveTo,
    #[serde(rename = "quadraticCurveToCP")]
    QuadraticCurveToCp,
    #[serde(rename = "bezierCurveTo")]
    BezierCurveTo,
    #[serde(rename = "bezierCurveToCP1")]
    BezierCurveToCp1,
    #[serde(rename = "bezierCurveToCP2")]
    BezierCurveToCp2,
    #[serde(rename = "closePath")]
    ClosePath,
}

impl CommandKind {
    /// Control points shape a curve but are never drawn through
    pub fn is_control(&self) -> bool {
        matches!(
            self,
            CommandKind::QuadraticCurveToCp
                | CommandKind::BezierCurveToCp1
                | CommandKind::BezierCurveToCp2
        )
    }

    /// On-curve points: everything with coordinates that is not a control point
    pub fn is_anchor(&self) -> bool {
        !self.is_control() && *self != CommandKind::ClosePath
    }
}

/// A single path instruction with its typed payload
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PathCommand {
    MoveTo(Point),
    LineTo(Point),
    QuadCp(Point),
    QuadTo(Point),
    CubicCp1(Point),
    CubicCp2(Point),
    CubicTo(Point),
    ClosePath,
}

impl PathCommand {
    pub fn kind(&self) -> CommandKind {
        match self {
            PathCommand::MoveTo(_) => CommandKind::MoveTo,
            PathCommand::LineTo(_) => CommandKind::LineTo,
            PathCommand::QuadCp(_) => CommandKind::QuadraticCurveToCp,
            PathCommand::QuadTo(_) => CommandKind::QuadraticCurveTo,
            PathCommand::CubicCp1(_) => CommandKind::BezierCurveToCp1,
            PathCommand::CubicCp2(_) => CommandKind::BezierCurveToCp2,
            PathCommand::CubicTo(_) => CommandKind::BezierCurveTo,
            PathCommand::ClosePath => CommandKind::ClosePath,
        }
    }

    /// Build a command of the given kind; `ClosePath` ignores the point
    pub fn from_kind(kind: CommandKind, point: Point) -> Self {
        match kind {
            CommandKind::MoveTo => PathCommand::MoveTo(point),
            CommandKind::LineTo => PathCommand::LineTo(point),
            CommandKind::QuadraticCurveToCp => PathCommand::QuadCp(point),
            CommandKind::QuadraticCurveTo => PathCommand::QuadTo(point),
            CommandKind::BezierCurveToCp1 => PathCommand::CubicCp1(point),
            CommandKind::BezierCurveToCp2 => PathCommand::CubicCp2(point),
            CommandKind::BezierCurveTo => PathCommand::CubicTo(point),
            CommandKind::ClosePath => PathCommand::ClosePath,
        }
    }

    pub fn point(&self) -> Option<Point> {
        match *self {
            PathCommand::MoveTo(p)
            | PathCommand::LineTo(p)
            | PathCommand::QuadCp(p)
            | PathCommand::QuadTo(p)
            | PathCommand::CubicCp1(p)
            | PathCommand::CubicCp2(p)
            | PathCommand::CubicTo(p) => Some(p),
            PathCommand::ClosePath => None,
        }
    }

    /// Same kind, new coordinates
    pub fn with_point(&self, point: Point) -> Self {
        Self::from_kind(self.kind(), point)
    }
}

/// A command in a glyph's command table
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(into = "RawCommand", try_from = "RawCommand")]
pub struct Command {
    pub id: CommandId,
    pub command: PathCommand,
}

impl Command {
    pub fn new(id: CommandId, command: PathCommand) -> Self {
        Self { id, command }
    }

    /// Create a command with a freshly generated id
    pub fn fresh(command: PathCommand) -> Self {
        Self::new(CommandId::next(), command)
    }

    pub fn move_to(id: &str, x: f64, y: f64) -> Self {
        Self::new(id.into(), PathCommand::MoveTo(Point::new(x, y)))
    }

    pub fn line_to(id: &str, x: f64, y: f64) -> Self {
        Self::new(id.into(), PathCommand::LineTo(Point::new(x, y)))
    }

    pub fn cubic_cp1(id: &str, x: f64, y: f64) -> Self {
        Self::new(id.into(), PathCommand::CubicCp1(Point::new(x, y)))
    }

    pub fn cubic_cp2(id: &str, x: f64, y: f64) -> Self {
        Self::new(id.into(), PathCommand::CubicCp2(Point::new(x, y)))
    }

    pub fn cubic_to(id: &str, x: f64, y: f64) -> Self {
        Self::new(id.into(), PathCommand::CubicTo(Point::new(x, y)))
    }

    pub fn quad_cp(id: &str, x: f64, y: f64) -> Self {
        Self::new(id.into(), PathCommand::QuadCp(Point::new(x, y)))
    }

    pub fn quad_to(id: &str, x: f64, y: f64) -> Self {
        Self::new(id.into(), PathCommand::QuadTo(Point::new(x, y)))
    }

    pub fn close_path(id: &str) -> Self {
        Self::new(id.into(), PathCommand::ClosePath)
    }

    pub fn kind(&self) -> CommandKind {
        self.command.kind()
    }

    pub fn point(&self) -> Option<Point> {
        self.command.point()
    }

    /// Move the command's point; no-op for `ClosePath`
    pub fn set_point(&mut self, point: Point) {
        self.command = self.command.with_point(point);
    }

    /// Change the kind while keeping id and coordinates
    pub fn set_kind(&mut self, kind: CommandKind) {
        let point = self.point().unwrap_or(Point::ZERO);
        self.command = PathCommand::from_kind(kind, point);
    }
}

/// Wire shape of a command: `{ id, command, args }`
#[derive(Clone, Debug, Serialize, Deserialize)]
struct RawCommand {
    id: CommandId,
    command: CommandKind,
    args: Vec<f64>,
}

impl From<Command> for RawCommand {
    fn from(command: Command) -> Self {
        let args = command
            .point()
            .map(|p| vec![p.x, p.y])
            .unwrap_or_default();
        Self {
            id: command.id,
            command: command.command.kind(),
            args,
        }
    }
}

impl TryFrom<RawCommand> for Command {
    type Error = String;

    fn try_from(raw: RawCommand) -> Result<Self, Self::Error> {
        let command = match (raw.command, raw.args.as_slice()) {
            (CommandKind::ClosePath, []) => PathCommand::ClosePath,
            (CommandKind::ClosePath, _) => {
                return Err(format!("closePath '{}' must not carry args", raw.id));
            }
            (kind, [x, y]) => PathCommand::from_kind(kind, Point::new(*x, *y)),
            (kind, args) => {
                return Err(format!(
                    "{:?} '{}' expects 2 args, got {}",
                    kind,
                    raw.id,
                    args.len()
                ));
            }
        };
        Ok(Self { id: raw.id, command })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_wire_shape() {
        let command = Command::cubic_cp1("a", 10.0, 20.0);
        let json = serde_json::to_value(&command).unwrap();
        assert_eq!(json["id"], "a");
        assert_eq!(json["command"], "bezierCurveToCP1");
        assert_eq!(json["args"], serde_json::json!([10.0, 20.0]));

        let close: Command =
            serde_json::from_str(r#"{"id":"z","command":"closePath","args":[]}"#).unwrap();
        assert_eq!(close.kind(), CommandKind::ClosePath);
        assert_eq!(close.point(), None);
    }

    #[test]
    fn test_arity_is_checked() {
        let bad = serde_json::from_str::<Command>(r#"{"id":"b","command":"lineTo","args":[1.0]}"#);
        assert!(bad.is_err(), "lineTo with one arg should be rejected");

        let bad = serde_json::from_str::<Command>(
            r#"{"id":"c","command":"closePath","args":[1.0, 2.0]}"#,
        );
        assert!(bad.is_err(), "closePath with args should be rejected");
    }

    #[test]
    fn test_kind_classification() {
        assert!(CommandKind::BezierCurveToCp1.is_control());
        assert!(CommandKind::QuadraticCurveToCp.is_control());
        assert!(CommandKind::BezierCurveTo.is_anchor());
        assert!(CommandKind::MoveTo.is_anchor());
        assert!(!CommandKind::ClosePath.is_anchor());
        assert!(!CommandKind::ClosePath.is_control());
    }

    #[test]
    fn test_set_point_and_kind() {
        let mut command = Command::line_to("l", 1.0, 2.0);
        command.set_point(Point::new(3.0, 4.0));
        assert_eq!(command.point(), Some(Point::new(3.0, 4.0)));

        command.set_kind(CommandKind::MoveTo);
        assert_eq!(command.command, PathCommand::MoveTo(Point::new(3.0, 4.0)));

        let mut close = Command::close_path("z");
        close.set_point(Point::new(9.0, 9.0));
        assert_eq!(close.point(), None);
    }

    #[test]
    fn test_fresh_ids_are_unique() {
        let a = CommandId::next();
        let b = CommandId::next();
        assert_ne!(a, b);
    }
}
