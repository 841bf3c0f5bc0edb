//! Position from distance estimates to known points.
//!
//! Subtracting circle equations pairwise removes the quadratic terms and
//! leaves a linear system in `(x, y)`:
//!
//! ```text
//! (x - xi)² + (y - yi)² = di²
//! 2(xj - xi)·x + 2(yj - yi)·y = di² - dj² - xi² + xj² - yi² + yj²
//! ```
//!
//! Units are whatever the anchors use; the session feeds centimeters.

use log::warn;
use serde::{Deserialize, Serialize};

use crate::core::WorldPoint;

/// Determinants below this are treated as collinear anchors.
const DEGENERATE_EPS: f64 = 1e-4;

/// A point with a measured distance to the unknown position.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Anchor {
    pub x: f64,
    pub y: f64,
    pub distance: f64,
}

impl Anchor {
    pub fn new(x: f64, y: f64, distance: f64) -> Self {
        Self { x, y, distance }
    }

    /// Anchor at a world point
    pub fn at(point: WorldPoint, distance: f64) -> Self {
        Self::new(point.x, point.y, distance)
    }

    pub fn position(&self) -> WorldPoint {
        WorldPoint::new(self.x, self.y)
    }

    fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.distance.is_finite()
    }
}

#[inline]
fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Solve from the first three anchors; extra anchors are ignored.
///
/// Returns `None` with fewer than three anchors, non-finite input, or
/// (near-)collinear anchors. The result is rounded to two decimals.
pub fn trilaterate(anchors: &[Anchor]) -> Option<WorldPoint> {
    let [b1, b2, b3] = anchors.get(..3)? else {
        return None;
    };
    if !(b1.is_finite() && b2.is_finite() && b3.is_finite()) {
        return None;
    }

    let a = 2.0 * (b2.x - b1.x);
    let b = 2.0 * (b2.y - b1.y);
    let c = b1.distance.powi(2) - b2.distance.powi(2) - b1.x.powi(2) + b2.x.powi(2)
        - b1.y.powi(2)
        + b2.y.powi(2);

    let d = 2.0 * (b3.x - b2.x);
    let e = 2.0 * (b3.y - b2.y);
    let f = b2.distance.powi(2) - b3.distance.powi(2) - b2.x.powi(2) + b3.x.powi(2)
        - b2.y.powi(2)
        + b3.y.powi(2);

    let denominator = a * e - b * d;
    if denominator.abs() < DEGENERATE_EPS {
        warn!("Trilateration anchors are collinear (det {:.2e})", denominator);
        return None;
    }

    let x = (c * e - b * f) / denominator;
    let y = (a * f - c * d) / denominator;
    Some(WorldPoint::new(round2(x), round2(y)))
}

/// Least-squares solution over every anchor.
///
/// Each anchor after the first contributes one linearized equation relative
/// to the first; the over-determined system is solved through its normal
/// equations. With exactly three anchors this agrees with [`trilaterate`]
/// up to rounding.
pub fn trilaterate_least_squares(anchors: &[Anchor]) -> Option<WorldPoint> {
    if anchors.len() < 3 || anchors.iter().any(|a| !a.is_finite()) {
        return None;
    }

    let r = &anchors[0];
    let r_sq = r.x * r.x + r.y * r.y - r.distance * r.distance;

    // Accumulate AᵀA and Aᵀb
    let (mut s_xx, mut s_xy, mut s_yy, mut s_xb, mut s_yb) = (0.0, 0.0, 0.0, 0.0, 0.0);
    for anchor in &anchors[1..] {
        let ax = 2.0 * (anchor.x - r.x);
        let ay = 2.0 * (anchor.y - r.y);
        let rhs = anchor.x * anchor.x + anchor.y * anchor.y - anchor.distance * anchor.distance - r_sq;
        s_xx += ax * ax;
        s_xy += ax * ay;
        s_yy += ay * ay;
        s_xb += ax * rhs;
        s_yb += ay * rhs;
    }

    let det = s_xx * s_yy - s_xy * s_xy;
    let scale = (s_xx * s_yy).abs().max(f64::MIN_POSITIVE);
    if det.abs() <= 1e-10 * scale || det.abs() < DEGENERATE_EPS {
        warn!("Least-squares trilateration is singular (det {:.2e})", det);
        return None;
    }

    let x = (s_yy * s_xb - s_xy * s_yb) / det;
    let y = (s_xx * s_yb - s_xy * s_xb) / det;
    if !(x.is_finite() && y.is_finite()) {
        return None;
    }
    Some(WorldPoint::new(round2(x), round2(y)))
}

/// Root-mean-square of `|p - anchor| - distance` over all anchors.
pub fn residual_rms(anchors: &[Anchor], point: WorldPoint) -> Option<f64> {
    if anchors.is_empty() {
        return None;
    }
    let sum: f64 = anchors
        .iter()
        .map(|a| {
            let err = point.distance(&a.position()) - a.distance;
            err * err
        })
        .sum();
    Some((sum / anchors.len() as f64).sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference_anchors() -> Vec<Anchor> {
        vec![
            Anchor::new(0.0, 0.0, 7.071),
            Anchor::new(10.0, 0.0, 7.071),
            Anchor::new(5.0, 10.0, 5.0),
        ]
    }

    #[test]
    fn test_three_anchor_solution() {
        let p = trilaterate(&reference_anchors()).unwrap();
        assert!((p.x - 5.0).abs() < 0.1);
        assert!((p.y - 5.0).abs() < 0.1);
    }

    #[test]
    fn test_too_few_anchors() {
        let anchors = reference_anchors();
        assert!(trilaterate(&anchors[..2]).is_none());
        assert!(trilaterate(&[]).is_none());
        assert!(trilaterate_least_squares(&anchors[..2]).is_none());
    }

    #[test]
    fn test_collinear_anchors() {
        let anchors = [
            Anchor::new(0.0, 0.0, 5.0),
            Anchor::new(5.0, 0.0, 3.0),
            Anchor::new(10.0, 0.0, 4.0),
        ];
        assert!(trilaterate(&anchors).is_none());
        assert!(trilaterate_least_squares(&anchors).is_none());
    }

    #[test]
    fn test_extra_anchors_ignored() {
        let mut anchors = reference_anchors();
        let base = trilaterate(&anchors).unwrap();
        anchors.push(Anchor::new(100.0, 100.0, 1.0));
        assert_eq!(trilaterate(&anchors), Some(base));
    }

    #[test]
    fn test_non_finite_input() {
        let mut anchors = reference_anchors();
        anchors[1].distance = f64::NAN;
        assert!(trilaterate(&anchors).is_none());
        assert!(trilaterate_least_squares(&anchors).is_none());
    }

    #[test]
    fn test_least_squares_exact() {
        let target = WorldPoint::new(320.0, -140.0);
        let anchors: Vec<Anchor> = [
            WorldPoint::new(0.0, 0.0),
            WorldPoint::new(200.0, 0.0),
            WorldPoint::new(0.0, 300.0),
            WorldPoint::new(-150.0, -250.0),
            WorldPoint::new(400.0, 400.0),
        ]
        .into_iter()
        .map(|p| Anchor::at(p, p.distance(&target)))
        .collect();

        let p = trilaterate_least_squares(&anchors).unwrap();
        assert!((p.x - target.x).abs() < 0.05);
        assert!((p.y - target.y).abs() < 0.05);
        assert!(residual_rms(&anchors, p).unwrap() < 0.05);
    }

    #[test]
    fn test_least_squares_uses_all_anchors() {
        // every anchor contributes; one bad range only shifts the estimate
        let target = WorldPoint::new(5.0, 5.0);
        let mut anchors = vec![
            Anchor::new(0.0, 0.0, 7.07),
            Anchor::new(10.0, 0.0, 7.07),
            Anchor::new(5.0, 10.0, 5.0),
            Anchor::new(0.0, 10.0, 7.07),
            Anchor::new(10.0, 10.0, 7.07),
        ];
        let p = trilaterate_least_squares(&anchors).unwrap();
        assert!(p.distance(&target) < 0.1);

        anchors[4].distance = 9.0;
        let skewed = trilaterate_least_squares(&anchors).unwrap();
        assert!(skewed.distance(&target) < 1.5);
    }
}
