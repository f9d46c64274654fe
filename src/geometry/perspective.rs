//! Projective (perspective) transforms
//!
//! A 3x3 homogeneous matrix, row-major:
//!
//! ```text
//! | a b c |   | x |
//! | d e f | * | y |
//! | g h i |   | 1 |
//! ```
//!
//! The warp tool solves one of these from four corner correspondences.

use kurbo::{Affine, Point};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Perspective {
    pub m: [f64; 9],
}

impl Default for Perspective {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Perspective {
    pub const IDENTITY: Perspective = Perspective {
        m: [1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0],
    };

    /// Lift an affine map into homogeneous form
    pub fn from_affine(affine: Affine) -> Self {
        let [a, b, c, d, e, f] = affine.as_coeffs();
        // kurbo: x' = a*x + c*y + e, y' = b*x + d*y + f
        Self {
            m: [a, c, e, b, d, f, 0.0, 0.0, 1.0],
        }
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    /// Map a point. Points sent to infinity come back unchanged.
    pub fn apply(&self, p: Point) -> Point {
        let m = &self.m;
        let w = m[6] * p.x + m[7] * p.y + m[8];
        if w.abs() < f64::EPSILON {
            return p;
        }
        Point::new(
            (m[0] * p.x + m[1] * p.y + m[2]) / w,
            (m[3] * p.x + m[4] * p.y + m[5]) / w,
        )
    }

    /// `self ∘ other`: apply `other` first, then `self`
    pub fn compose(&self, other: &Perspective) -> Perspective {
        let a = &self.m;
        let b = &other.m;
        let mut m = [0.0; 9];
        for row in 0..3 {
            for col in 0..3 {
                m[row * 3 + col] = (0..3).map(|k| a[row * 3 + k] * b[k * 3 + col]).sum();
            }
        }
        Perspective { m }.normalized()
    }

    fn normalized(mut self) -> Self {
        let i = self.m[8];
        if i.abs() > f64::EPSILON && i != 1.0 {
            for v in &mut self.m {
                *v /= i;
            }
        }
        self
    }

    /// Solve the homography taking each `src[k]` to `dst[k]`.
    ///
    /// Returns `None` when three of the points are collinear.
    pub fn from_quad(src: [Point; 4], dst: [Point; 4]) -> Option<Perspective> {
        // Eight unknowns (i fixed at 1), two equations per correspondence
        let mut rows = [[0.0f64; 9]; 8];
        for k in 0..4 {
            let (x, y) = (src[k].x, src[k].y);
            let (u, v) = (dst[k].x, dst[k].y);
            rows[2 * k] = [x, y, 1.0, 0.0, 0.0, 0.0, -u * x, -u * y, u];
            rows[2 * k + 1] = [0.0, 0.0, 0.0, x, y, 1.0, -v * x, -v * y, v];
        }
        let h = solve_linear_8(rows)?;
        Some(Perspective {
            m: [h[0], h[1], h[2], h[3], h[4], h[5], h[6], h[7], 1.0],
        })
    }
}

/// Gaussian elimination with partial pivoting on an 8x8 augmented system
fn solve_linear_8(mut rows: [[f64; 9]; 8]) -> Option<[f64; 8]> {
    const N: usize = 8;
    for col in 0..N {
        let pivot = (col..N).max_by(|&a, &b| rows[a][col].abs().total_cmp(&rows[b][col].abs()))?;
        if rows[pivot][col].abs() < 1e-12 {
            return None;
        }
        rows.swap(col, pivot);

        for row in 0..N {
            if row == col {
                continue;
            }
            let factor = rows[row][col] / rows[col][col];
            if factor == 0.0 {
                continue;
            }
            for k in col..=N {
                rows[row][k] -= factor * rows[col][k];
            }
        }
    }

    let mut out = [0.0; N];
    for (i, value) in out.iter_mut().enumerate() {
        *value = rows[i][N] / rows[i][i];
    }
    Some(out)
}
