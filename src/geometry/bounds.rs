//! Bounding boxes derived from command tables
//!
//! Bounds are never stored: they are folded from the point-bearing
//! commands whenever a selection or the active contour changes.

use crate::core::state::{Command, CommandTable};
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

/// Extent box in glyph space.
///
/// Serialized as its extrema, or `null` for the empty box so the infinite
/// fold seed survives a JSON round trip.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "BoundsRepr", into = "BoundsRepr")]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
    pub width: f64,
    pub height: f64,
}

/// Origin plus size, the shape handed to renderers
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Serialize, Deserialize)]
struct Extrema {
    min_x: f64,
    min_y: f64,
    max_x: f64,
    max_y: f64,
}

#[derive(Serialize, Deserialize)]
#[serde(transparent)]
struct BoundsRepr(Option<Extrema>);

impl From<BoundingBox> for BoundsRepr {
    fn from(bounds: BoundingBox) -> Self {
        if bounds.is_empty() {
            return BoundsRepr(None);
        }
        BoundsRepr(Some(Extrema {
            min_x: bounds.min_x,
            min_y: bounds.min_y,
            max_x: bounds.max_x,
            max_y: bounds.max_y,
        }))
    }
}

impl From<BoundsRepr> for BoundingBox {
    fn from(repr: BoundsRepr) -> Self {
        match repr.0 {
            Some(e) => BoundingBox::from_extrema(e.min_x, e.min_y, e.max_x, e.max_y),
            None => BoundingBox::EMPTY,
        }
    }
}

impl BoundingBox {
    /// The fold seed: a box that contains nothing
    pub const EMPTY: BoundingBox = BoundingBox {
        min_x: f64::INFINITY,
        min_y: f64::INFINITY,
        max_x: f64::NEG_INFINITY,
        max_y: f64::NEG_INFINITY,
        width: f64::NEG_INFINITY,
        height: f64::NEG_INFINITY,
    };

    pub fn from_extrema(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
            width: max_x - min_x,
            height: max_y - min_y,
        }
    }

    pub fn from_rect(rect: Rect) -> Self {
        let rect = rect.abs();
        Self::from_extrema(rect.x0, rect.y0, rect.x1, rect.y1)
    }

    /// No point contributed to the box
    pub fn is_empty(&self) -> bool {
        !self.width.is_finite() || !self.height.is_finite()
    }

    /// True when there is nothing to transform or draw handles for:
    /// no finite extent, or a single point.
    pub fn is_degenerate(&self) -> bool {
        self.is_empty() || (self.width == 0.0 && self.height == 0.0)
    }

    pub fn min(&self) -> Point {
        Point::new(self.min_x, self.min_y)
    }

    pub fn center(&self) -> Point {
        Point::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    pub fn to_rect(&self) -> Rect {
        Rect::new(self.min_x, self.min_y, self.max_x, self.max_y)
    }

    /// Same size, origin moved to (0, 0)
    pub fn local_rect(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }

    pub fn to_bounds(&self) -> Bounds {
        Bounds {
            x: self.min_x,
            y: self.min_y,
            width: self.width,
            height: self.height,
        }
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.min_x && point.x <= self.max_x && point.y >= self.min_y && point.y <= self.max_y
    }

    fn include(mut self, point: Point) -> Self {
        self.min_x = self.min_x.min(point.x);
        self.min_y = self.min_y.min(point.y);
        self.max_x = self.max_x.max(point.x);
        self.max_y = self.max_y.max(point.y);
        self
    }

    fn scaled(self, scale: f64) -> Self {
        Self::from_extrema(
            self.min_x * scale,
            self.min_y * scale,
            self.max_x * scale,
            self.max_y * scale,
        )
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::EMPTY
    }
}

/// Bounds of every point-bearing command in `table`.
///
/// Extrema are measured in glyph space first and multiplied by `scale`
/// afterwards. A table without points yields a box with infinite extrema
/// (see [`BoundingBox::is_degenerate`]).
pub fn compute_bounds(table: &CommandTable, scale: f64) -> BoundingBox {
    compute_bounds_of(table.iter(), scale)
}

/// Same as [`compute_bounds`] over an arbitrary run of commands
pub fn compute_bounds_of<'a, I>(commands: I, scale: f64) -> BoundingBox
where
    I: IntoIterator<Item = &'a Command>,
{
    let folded = commands
        .into_iter()
        .filter_map(Command::point)
        .fold(BoundingBox::EMPTY, BoundingBox::include);

    if folded.min_x > folded.max_x {
        return BoundingBox::EMPTY;
    }
    folded.scaled(scale)
}
