//! Quadrant system for transform handles and flip origins
//!
//! This module provides a 9-point grid system (like a tic-tac-toe board) for
//! locating handles on a bounding box and picking transform anchors.

use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

/// Nine positions in a 2D grid, used for transform handles and anchors
///
/// Think of this as a 3x3 grid (glyph space is y-up, so `Top` is max y):
///
/// ```text
/// TopLeft     Top     TopRight
/// Left        Center  Right
/// BottomLeft  Bottom  BottomRight
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Quadrant {
    #[default]
    Center,
    TopLeft,
    Top,
    TopRight,
    Right,
    BottomRight,
    Bottom,
    BottomLeft,
    Left,
}

/// Axis a flip mirrors across
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FlipAxis {
    /// Scale by (-1, 1)
    Horizontal,
    /// Scale by (1, -1)
    Vertical,
}

impl Quadrant {
    pub const ALL: [Quadrant; 9] = [
        Quadrant::TopLeft,
        Quadrant::Top,
        Quadrant::TopRight,
        Quadrant::Left,
        Quadrant::Center,
        Quadrant::Right,
        Quadrant::BottomLeft,
        Quadrant::Bottom,
        Quadrant::BottomRight,
    ];

    /// Horizontal and vertical position as fractions of the rect (0, 0.5, 1)
    fn fractions(&self) -> (f64, f64) {
        match self {
            Quadrant::TopLeft => (0.0, 1.0),
            Quadrant::Top => (0.5, 1.0),
            Quadrant::TopRight => (1.0, 1.0),
            Quadrant::Left => (0.0, 0.5),
            Quadrant::Center => (0.5, 0.5),
            Quadrant::Right => (1.0, 0.5),
            Quadrant::BottomLeft => (0.0, 0.0),
            Quadrant::Bottom => (0.5, 0.0),
            Quadrant::BottomRight => (1.0, 0.0),
        }
    }

    fn from_fractions(fx: f64, fy: f64) -> Self {
        Quadrant::ALL
            .into_iter()
            .find(|q| q.fractions() == (fx, fy))
            .unwrap_or_default()
    }

    /// The point of `rect` this quadrant names
    pub fn point_in_rect(&self, rect: Rect) -> Point {
        let (fx, fy) = self.fractions();
        Point::new(
            rect.x0 + (rect.x1 - rect.x0) * fx,
            rect.y0 + (rect.y1 - rect.y0) * fy,
        )
    }

    /// The handle across the box from this one
    pub fn opposite(&self) -> Quadrant {
        let (fx, fy) = self.fractions();
        Quadrant::from_fractions(1.0 - fx, 1.0 - fy)
    }

    /// Reflection across the given flip axis
    pub fn mirror(&self, axis: FlipAxis) -> Quadrant {
        let (fx, fy) = self.fractions();
        match axis {
            FlipAxis::Horizontal => Quadrant::from_fractions(1.0 - fx, fy),
            FlipAxis::Vertical => Quadrant::from_fractions(fx, 1.0 - fy),
        }
    }

    pub fn is_corner(&self) -> bool {
        matches!(
            self,
            Quadrant::TopLeft | Quadrant::TopRight | Quadrant::BottomLeft | Quadrant::BottomRight
        )
    }

    /// Whether dragging this handle changes the width / the height
    pub fn moves_axes(&self) -> (bool, bool) {
        let (fx, fy) = self.fractions();
        (fx != 0.5, fy != 0.5)
    }

    /// Index of a corner in counter-clockwise order from bottom-left
    pub fn corner_index(&self) -> Option<usize> {
        match self {
            Quadrant::BottomLeft => Some(0),
            Quadrant::BottomRight => Some(1),
            Quadrant::TopRight => Some(2),
            Quadrant::TopLeft => Some(3),
            _ => None,
        }
    }
}

impl FlipAxis {
    pub fn scale_factors(&self) -> (f64, f64) {
        match self {
            FlipAxis::Horizontal => (-1.0, 1.0),
            FlipAxis::Vertical => (1.0, -1.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quadrant_positioning() {
        let rect = Rect::new(10.0, 10.0, 100.0, 100.0);

        assert_eq!(Quadrant::BottomLeft.point_in_rect(rect), Point::new(10.0, 10.0));
        assert_eq!(Quadrant::Center.point_in_rect(rect), Point::new(55.0, 55.0));
        assert_eq!(Quadrant::TopRight.point_in_rect(rect), Point::new(100.0, 100.0));
        assert_eq!(Quadrant::Top.point_in_rect(rect), Point::new(55.0, 100.0));
    }

    #[test]
    fn quadrant_opposites_and_mirrors() {
        assert_eq!(Quadrant::TopLeft.opposite(), Quadrant::BottomRight);
        assert_eq!(Quadrant::Top.opposite(), Quadrant::Bottom);
        assert_eq!(Quadrant::Center.opposite(), Quadrant::Center);

        assert_eq!(Quadrant::Left.mirror(FlipAxis::Horizontal), Quadrant::Right);
        assert_eq!(Quadrant::Left.mirror(FlipAxis::Vertical), Quadrant::Left);
        assert_eq!(Quadrant::TopLeft.mirror(FlipAxis::Vertical), Quadrant::BottomLeft);
    }

    #[test]
    fn quadrant_axes() {
        assert_eq!(Quadrant::Top.moves_axes(), (false, true));
        assert_eq!(Quadrant::Right.moves_axes(), (true, false));
        assert!(Quadrant::BottomRight.is_corner());
        assert_eq!(Quadrant::TopLeft.corner_index(), Some(3));
        assert_eq!(Quadrant::Top.corner_index(), None);
    }
}
