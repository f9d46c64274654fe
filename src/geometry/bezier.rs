//! Bezier segment helpers: degree elevation, splitting, projection

use kurbo::{CubicBez, ParamCurve, ParamCurveNearest, Point, QuadBez};

/// Accuracy used when projecting a pointer onto a curve
const NEAREST_ACCURACY: f64 = 1e-6;

/// Elevate a quadratic `p0, c, e` to cubic control points.
///
/// Exact 2/3 rule: the first control point sits 2/3 of the way from the
/// start to the quad control, the second 2/3 of the way from the end.
pub fn quadratic_to_cubic(p0: Point, c: Point, e: Point) -> (Point, Point, Point) {
    let cubic = QuadBez::new(p0, c, e).raise();
    (cubic.p1, cubic.p2, cubic.p3)
}

/// Split a cubic at `t`, clamped to [0, 1]. The left half ends and the
/// right half starts at the same point.
pub fn split_cubic(cubic: CubicBez, t: f64) -> (CubicBez, CubicBez) {
    let t = t.clamp(0.0, 1.0);
    let left = cubic.subsegment(0.0..t);
    let mut right = cubic.subsegment(t..1.0);
    right.p0 = left.p3;
    (left, right)
}

/// Curve parameter of the point on `cubic` closest to `point`
pub fn nearest_t(cubic: CubicBez, point: Point) -> f64 {
    cubic.nearest(point, NEAREST_ACCURACY).t
}

/// Distance from `point` to the curve
pub fn distance_to_cubic(cubic: CubicBez, point: Point) -> f64 {
    let t = nearest_t(cubic, point);
    cubic.eval(t).distance(point)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: Point, b: Point) -> bool {
        (a.x - b.x).abs() < 1e-6 && (a.y - b.y).abs() < 1e-6
    }

    #[test]
    fn test_midpoint_quadratic_elevates_onto_line() {
        let p0 = Point::new(0.0, 0.0);
        let e = Point::new(30.0, 60.0);
        let c = p0.midpoint(e);
        let (cp1, cp2, end) = quadratic_to_cubic(p0, c, e);
        assert_eq!(end, e);
        // collinear: cross product of (cp - p0) and (e - p0) vanishes
        for cp in [cp1, cp2] {
            let cross = (cp - p0).cross(e - p0);
            assert!(cross.abs() < 1e-9, "{cp:?} should lie on the chord");
        }
        assert!(approx_eq(cp1, Point::new(10.0, 20.0)));
        assert!(approx_eq(cp2, Point::new(20.0, 40.0)));
    }

    #[test]
    fn test_elevation_formula_exact() {
        let (cp1, cp2, _) =
            quadratic_to_cubic(Point::new(1.0, 2.0), Point::new(7.0, 11.0), Point::new(3.0, -5.0));
        assert!(approx_eq(cp1, Point::new(1.0 + 2.0 / 3.0 * 6.0, 2.0 + 2.0 / 3.0 * 9.0)));
        assert!(approx_eq(cp2, Point::new(3.0 + 2.0 / 3.0 * 4.0, -5.0 + 2.0 / 3.0 * 16.0)));
    }

    #[test]
    fn test_split_continuity() {
        let cubic = CubicBez::new((0.0, 0.0), (10.0, 40.0), (50.0, 40.0), (60.0, 0.0));
        let (left, right) = split_cubic(cubic, 0.5);
        assert_eq!(left.p3, right.p0);

        for i in 0..=20 {
            let s = i as f64 / 20.0;
            // left covers [0, 0.5], right covers [0.5, 1]
            assert!(approx_eq(left.eval(s), cubic.eval(s * 0.5)));
            assert!(approx_eq(right.eval(s), cubic.eval(0.5 + s * 0.5)));
        }
    }

    #[test]
    fn test_split_at_arbitrary_t() {
        let cubic = CubicBez::new((0.0, 0.0), (0.0, 100.0), (100.0, 100.0), (100.0, 0.0));
        let t = 0.3;
        let (left, right) = split_cubic(cubic, t);
        assert!(approx_eq(left.p3, cubic.eval(t)));
        assert!(approx_eq(right.eval(0.5), cubic.eval(t + 0.5 * (1.0 - t))));
    }

    #[test]
    fn test_split_at_ends_keeps_whole_curve() {
        let cubic = CubicBez::new((0.0, 0.0), (10.0, 40.0), (50.0, 40.0), (60.0, 0.0));
        let (left, right) = split_cubic(cubic, 1.5);
        assert!(approx_eq(left.p3, cubic.p3));
        assert!(approx_eq(right.p0, right.p3));
    }

    #[test]
    fn test_nearest_t_on_symmetric_curve() {
        let cubic = CubicBez::new((0.0, 0.0), (0.0, 100.0), (100.0, 100.0), (100.0, 0.0));
        let t = nearest_t(cubic, Point::new(50.0, 200.0));
        assert!((t - 0.5).abs() < 1e-3);
        assert!(distance_to_cubic(cubic, cubic.eval(0.2)) < 1e-6);
    }
}
