//! Planar points consumed by the triangulation engine.
//!
//! A [`Point2`] is a plain coordinate pair. Identity comes from the
//! zero-based index of the record it was projected from, never from the
//! coordinates themselves; the engine and the mesh only ever exchange
//! indices and look coordinates up on demand.

use serde::{Deserialize, Serialize};

/// A point in the (x, y) plane.
///
/// # Examples
///
/// ```rust
/// use pointpipe::geometry::point::Point2;
///
/// let p = Point2::new(1.0, 2.0);
/// assert_eq!(p.x, 1.0);
/// assert_eq!(p.y, 2.0);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point2 {
    /// Coordinate along the x axis.
    pub x: f64,
    /// Coordinate along the y axis.
    pub y: f64,
}

impl Point2 {
    /// Creates a new point from its coordinates.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Returns `true` when both coordinates are finite (neither NaN nor
    /// infinite).
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Hash key for coordinate deduplication.
    ///
    /// Two finite points map to the same key exactly when their coordinates
    /// compare numerically equal; adding `0.0` collapses `-0.0` onto `0.0`
    /// so signed zeros never masquerade as two distinct sites.
    pub(crate) fn bits(&self) -> (u64, u64) {
        ((self.x + 0.0).to_bits(), (self.y + 0.0).to_bits())
    }
}

impl From<[f64; 2]> for Point2 {
    fn from(coords: [f64; 2]) -> Self {
        Self::new(coords[0], coords[1])
    }
}

impl From<(f64, f64)> for Point2 {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

impl std::fmt::Display for Point2 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finite_checks() {
        assert!(Point2::new(0.0, -3.5).is_finite());
        assert!(!Point2::new(f64::NAN, 0.0).is_finite());
        assert!(!Point2::new(0.0, f64::INFINITY).is_finite());
        assert!(!Point2::new(f64::NEG_INFINITY, f64::NAN).is_finite());
    }

    #[test]
    fn bits_collapse_signed_zero() {
        assert_eq!(Point2::new(0.0, 0.0).bits(), Point2::new(-0.0, 0.0).bits());
        assert_eq!(Point2::new(0.0, -0.0).bits(), Point2::new(-0.0, -0.0).bits());
        assert_eq!(Point2::new(1.5, 2.5).bits(), Point2::new(1.5, 2.5).bits());
        assert_ne!(Point2::new(1.5, 2.5).bits(), Point2::new(2.5, 1.5).bits());
    }

    #[test]
    fn conversions() {
        let a: Point2 = [1.0, 2.0].into();
        let b: Point2 = (1.0, 2.0).into();
        assert_eq!(a, b);
    }
}
