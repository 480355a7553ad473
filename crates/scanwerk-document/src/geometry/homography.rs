// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Projective transforms between planar quadrilaterals.

use scanwerk_core::types::{CornerSet, Point};

use crate::geometry::linear;

/// A planar projective transform (homography).
///
/// Stores the nine coefficients of the 3×3 matrix in row-major order with the
/// bottom-right entry fixed at 1. Built once per rectification and never
/// cached across calls.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectiveTransform {
    coeffs: [f64; 9],
}

impl ProjectiveTransform {
    /// Solve for the transform that maps each `src` corner onto the matching
    /// `dst` corner.
    ///
    /// Each of the four correspondences contributes two rows of an 8×8 linear
    /// system, derived from the projective identities
    ///
    /// ```text
    /// dst.x · (g·src.x + h·src.y + 1) = a·src.x + b·src.y + c
    /// dst.y · (g·src.x + h·src.y + 1) = d·src.x + e·src.y + f
    /// ```
    ///
    /// Collinear or coincident source corners make the system singular; the
    /// coefficients then carry NaN/infinite entries and every point mapped
    /// through them degrades the same way. No error is raised here.
    pub fn from_correspondences(src: &CornerSet, dst: &CornerSet) -> Self {
        let mut a = Vec::with_capacity(8);
        let mut b = Vec::with_capacity(8);

        for (s, d) in src.points().iter().zip(dst.points().iter()) {
            a.push(vec![s.x, s.y, 1.0, 0.0, 0.0, 0.0, -s.x * d.x, -s.y * d.x]);
            b.push(d.x);

            a.push(vec![0.0, 0.0, 0.0, s.x, s.y, 1.0, -s.x * d.y, -s.y * d.y]);
            b.push(d.y);
        }

        let h = linear::solve(a, b);
        Self {
            coeffs: [h[0], h[1], h[2], h[3], h[4], h[5], h[6], h[7], 1.0],
        }
    }

    /// Map a point through the transform.
    ///
    /// Evaluates `((a·x + b·y + c)/w, (d·x + e·y + f)/w)` with
    /// `w = g·x + h·y + 1`. A numerically zero `w` yields non-finite
    /// coordinates; the caller treats such a point as unmappable.
    pub fn apply(&self, x: f64, y: f64) -> Point {
        let c = &self.coeffs;
        let w = c[6] * x + c[7] * y + c[8];
        Point::new(
            (c[0] * x + c[1] * y + c[2]) / w,
            (c[3] * x + c[4] * y + c[5]) / w,
        )
    }

    /// The nine matrix coefficients in row-major order.
    pub fn coefficients(&self) -> &[f64; 9] {
        &self.coeffs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn skewed_quad() -> CornerSet {
        CornerSet::new([
            Point::new(10.0, 20.0),
            Point::new(90.0, 15.0),
            Point::new(95.0, 85.0),
            Point::new(5.0, 90.0),
        ])
    }

    #[test]
    fn identity_for_matching_rectangles() {
        let rect = CornerSet::axis_aligned(100.0, 50.0);
        let t = ProjectiveTransform::from_correspondences(&rect, &rect);

        for (x, y) in [(0.0, 0.0), (50.0, 25.0), (99.0, 49.0), (13.7, 41.2)] {
            let p = t.apply(x, y);
            assert!((p.x - x).abs() < 1e-9, "x: expected {x}, got {}", p.x);
            assert!((p.y - y).abs() < 1e-9, "y: expected {y}, got {}", p.y);
        }
    }

    #[test]
    fn pure_translation() {
        let src = CornerSet::axis_aligned(80.0, 60.0);
        let dst = CornerSet::new([
            Point::new(30.0, 40.0),
            Point::new(110.0, 40.0),
            Point::new(110.0, 100.0),
            Point::new(30.0, 100.0),
        ]);
        let t = ProjectiveTransform::from_correspondences(&src, &dst);

        let p = t.apply(10.0, 20.0);
        assert!((p.x - 40.0).abs() < 1e-9);
        assert!((p.y - 60.0).abs() < 1e-9);
    }

    #[test]
    fn corners_map_onto_their_correspondences() {
        let src = CornerSet::axis_aligned(100.0, 100.0);
        let dst = skewed_quad();
        let t = ProjectiveTransform::from_correspondences(&src, &dst);

        for (s, d) in src.points().iter().zip(dst.points().iter()) {
            let p = t.apply(s.x, s.y);
            assert!(
                (p.x - d.x).abs() < 1e-6 && (p.y - d.y).abs() < 1e-6,
                "expected ({}, {}), got ({}, {})",
                d.x,
                d.y,
                p.x,
                p.y
            );
        }
    }

    #[test]
    fn ninth_coefficient_is_fixed_at_one() {
        let t = ProjectiveTransform::from_correspondences(
            &CornerSet::axis_aligned(10.0, 10.0),
            &skewed_quad(),
        );
        assert_eq!(t.coefficients()[8], 1.0);
    }

    #[test]
    fn coincident_corners_degrade_to_non_finite() {
        let p = Point::new(5.0, 5.0);
        let degenerate = CornerSet::new([p, p, p, p]);
        let t = ProjectiveTransform::from_correspondences(
            &degenerate,
            &CornerSet::axis_aligned(100.0, 100.0),
        );

        // Singular system: the solve does not fail, the numbers do.
        assert!(t.coefficients().iter().any(|c| !c.is_finite()));
    }
}
