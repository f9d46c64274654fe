//! Geometry utility functions
//!
//! Shared geometry functions: segment distance, angles and axis locking.

use kurbo::{Line, Point};

/// Lock a position to horizontal or vertical axis relative to another point
/// (used when shift is held to constrain movement)
pub fn axis_lock_position(pos: Point, relative_to: Point) -> Point {
    let dxy = pos - relative_to;
    if dxy.x.abs() > dxy.y.abs() {
        Point::new(pos.x, relative_to.y)
    } else {
        Point::new(relative_to.x, pos.y)
    }
}

/// Angle of the vector from `origin` to `target`, in radians
pub fn angle_between(origin: Point, target: Point) -> f64 {
    (target - origin).atan2()
}

/// Round an angle to the nearest multiple of `step` (both radians)
pub fn snap_angle(angle: f64, step: f64) -> f64 {
    if step <= 0.0 {
        return angle;
    }
    (angle / step).round() * step
}

/// Calculate distance from a point to a line segment
pub fn distance_to_line_segment(point: Point, line: Line) -> f64 {
    let v = line.p1 - line.p0;
    let w = point - line.p0;

    let c1 = w.dot(v);
    if c1 <= 0.0 {
        return point.distance(line.p0);
    }

    let c2 = v.dot(v);
    if c1 >= c2 {
        return point.distance(line.p1);
    }

    let b = c1 / c2;
    let pb = line.p0 + v * b;
    point.distance(pb)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axis_lock_horizontal() {
        let pos = Point::new(100.0, 80.0);
        let relative_to = Point::new(50.0, 60.0);
        let result = axis_lock_position(pos, relative_to);
        // X diff is 50, Y diff is 20, so should lock to horizontal (Y)
        assert_eq!(result, Point::new(100.0, 60.0));
    }

    #[test]
    fn test_axis_lock_vertical() {
        let pos = Point::new(60.0, 120.0);
        let relative_to = Point::new(50.0, 60.0);
        let result = axis_lock_position(pos, relative_to);
        // X diff is 10, Y diff is 60, so should lock to vertical (X)
        assert_eq!(result, Point::new(50.0, 120.0));
    }

    #[test]
    fn test_angles() {
        let origin = Point::new(0.0, 0.0);
        let angle = angle_between(origin, Point::new(0.0, 10.0));
        assert!((angle - std::f64::consts::FRAC_PI_2).abs() < 1e-12);

        let step = 15f64.to_radians();
        let snapped = snap_angle(22f64.to_radians(), step);
        assert!((snapped - 15f64.to_radians()).abs() < 1e-12);
    }

    #[test]
    fn test_segment_distance() {
        let line = Line::new((0.0, 0.0), (10.0, 0.0));
        assert_eq!(distance_to_line_segment(Point::new(5.0, 3.0), line), 3.0);
        assert_eq!(distance_to_line_segment(Point::new(-4.0, 3.0), line), 5.0);
    }
}
