//! Planar geometric predicates with adaptive error bounds.
//!
//! This module contains the two predicates the triangulation engine is built
//! on: the orientation test [`orient2d`] and the circumcircle containment
//! test [`in_circle`]. Both are evaluated in floating point with a relative
//! error bound derived from the magnitudes of the determinant terms, so a
//! result is only reported as strictly positive or negative when the computed
//! determinant provably has that sign. Configurations inside the bound are
//! classified as [`Orientation::DEGENERATE`] / [`InSphere::BOUNDARY`], and
//! callers apply one fixed tie-break rule to them, which keeps the decisions
//! consistent across runs on identical input.
//!
//! The bound coefficients are the static filter constants from Shewchuk's
//! adaptive predicates (`ccwerrboundA` and `iccerrboundA` for `f64`).

use crate::geometry::point::Point2;

/// Represents the position of a point relative to a triangle's circumcircle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InSphere {
    /// The point is outside the circumcircle
    OUTSIDE,
    /// The point is on the circumcircle (within the numerical error bound)
    BOUNDARY,
    /// The point is inside the circumcircle
    INSIDE,
}

impl std::fmt::Display for InSphere {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OUTSIDE => write!(f, "OUTSIDE"),
            Self::BOUNDARY => write!(f, "BOUNDARY"),
            Self::INSIDE => write!(f, "INSIDE"),
        }
    }
}

/// Represents the orientation of an ordered point triple.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Orientation {
    /// The triple winds clockwise (negative signed area)
    NEGATIVE,
    /// The triple is collinear (within the numerical error bound)
    DEGENERATE,
    /// The triple winds counter-clockwise (positive signed area)
    POSITIVE,
}

impl std::fmt::Display for Orientation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NEGATIVE => write!(f, "NEGATIVE"),
            Self::DEGENERATE => write!(f, "DEGENERATE"),
            Self::POSITIVE => write!(f, "POSITIVE"),
        }
    }
}

/// Static filter coefficient for [`orient2d`]: `(3 + 16u)u` with `u = 2^-53`.
const ORIENT2D_RELATIVE_BOUND: f64 = 3.330_669_073_875_472e-16;

/// Static filter coefficient for [`in_circle`]: `(10 + 96u)u` with `u = 2^-53`.
const IN_CIRCLE_RELATIVE_BOUND: f64 = 1.110_223_024_625_158e-15;

/// Determine the orientation of the ordered triple `a → b → c`.
///
/// The orientation is the sign of the determinant
///
/// ```text
/// | b.x - a.x   b.y - a.y |
/// | c.x - a.x   c.y - a.y |
/// ```
///
/// which is twice the signed area of the triangle `(a, b, c)`. A positive
/// determinant means the triple winds counter-clockwise.
///
/// # Examples
///
/// ```rust
/// use pointpipe::geometry::point::Point2;
/// use pointpipe::geometry::predicates::{Orientation, orient2d};
///
/// let a = Point2::new(0.0, 0.0);
/// let b = Point2::new(1.0, 0.0);
/// let c = Point2::new(0.0, 1.0);
/// assert_eq!(orient2d(a, b, c), Orientation::POSITIVE);
/// assert_eq!(orient2d(a, c, b), Orientation::NEGATIVE);
/// assert_eq!(
///     orient2d(a, b, Point2::new(2.0, 0.0)),
///     Orientation::DEGENERATE
/// );
/// ```
#[must_use]
pub fn orient2d(a: Point2, b: Point2, c: Point2) -> Orientation {
    let det_left = (b.x - a.x) * (c.y - a.y);
    let det_right = (b.y - a.y) * (c.x - a.x);
    let det = det_left - det_right;

    let bound = ORIENT2D_RELATIVE_BOUND * (det_left.abs() + det_right.abs());
    if det > bound {
        Orientation::POSITIVE
    } else if det < -bound {
        Orientation::NEGATIVE
    } else {
        Orientation::DEGENERATE
    }
}

/// Twice the signed area of the triangle `(a, b, c)`.
///
/// Positive for counter-clockwise triples. This is the raw determinant
/// underlying [`orient2d`]; use the predicate when a classified answer is
/// needed.
#[must_use]
pub fn signed_area2(a: Point2, b: Point2, c: Point2) -> f64 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

/// Test whether `d` lies inside the circumcircle of the triangle `(a, b, c)`.
///
/// The triangle must be counter-clockwise; with a clockwise triangle the
/// INSIDE/OUTSIDE answers are swapped. The test is the sign of the standard
/// lifted 3×3 determinant
///
/// ```text
/// | a.x - d.x   a.y - d.y   (a.x - d.x)² + (a.y - d.y)² |
/// | b.x - d.x   b.y - d.y   (b.x - d.x)² + (b.y - d.y)² |
/// | c.x - d.x   c.y - d.y   (c.x - d.x)² + (c.y - d.y)² |
/// ```
///
/// # Examples
///
/// ```rust
/// use pointpipe::geometry::point::Point2;
/// use pointpipe::geometry::predicates::{InSphere, in_circle};
///
/// let a = Point2::new(0.0, 0.0);
/// let b = Point2::new(2.0, 0.0);
/// let c = Point2::new(0.0, 2.0);
/// assert_eq!(in_circle(a, b, c, Point2::new(0.5, 0.5)), InSphere::INSIDE);
/// assert_eq!(in_circle(a, b, c, Point2::new(5.0, 5.0)), InSphere::OUTSIDE);
/// // (2, 2) is cocircular with the right triangle's circumcircle.
/// assert_eq!(in_circle(a, b, c, Point2::new(2.0, 2.0)), InSphere::BOUNDARY);
/// ```
#[must_use]
pub fn in_circle(a: Point2, b: Point2, c: Point2, d: Point2) -> InSphere {
    let adx = a.x - d.x;
    let ady = a.y - d.y;
    let bdx = b.x - d.x;
    let bdy = b.y - d.y;
    let cdx = c.x - d.x;
    let cdy = c.y - d.y;

    let bdx_cdy = bdx * cdy;
    let cdx_bdy = cdx * bdy;
    let a_lift = adx * adx + ady * ady;

    let cdx_ady = cdx * ady;
    let adx_cdy = adx * cdy;
    let b_lift = bdx * bdx + bdy * bdy;

    let adx_bdy = adx * bdy;
    let bdx_ady = bdx * ady;
    let c_lift = cdx * cdx + cdy * cdy;

    let det = a_lift * (bdx_cdy - cdx_bdy)
        + b_lift * (cdx_ady - adx_cdy)
        + c_lift * (adx_bdy - bdx_ady);

    // The lift terms are non-negative, so the permanent needs absolute
    // values only on the cross products.
    let permanent = a_lift * (bdx_cdy.abs() + cdx_bdy.abs())
        + b_lift * (cdx_ady.abs() + adx_cdy.abs())
        + c_lift * (adx_bdy.abs() + bdx_ady.abs());

    let bound = IN_CIRCLE_RELATIVE_BOUND * permanent;
    if det > bound {
        InSphere::INSIDE
    } else if det < -bound {
        InSphere::OUTSIDE
    } else {
        InSphere::BOUNDARY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn orientation_basic() {
        let a = Point2::new(0.0, 0.0);
        let b = Point2::new(4.0, 0.0);
        let c = Point2::new(2.0, 3.0);
        assert_eq!(orient2d(a, b, c), Orientation::POSITIVE);
        assert_eq!(orient2d(b, a, c), Orientation::NEGATIVE);
        assert_eq!(orient2d(a, b, Point2::new(8.0, 0.0)), Orientation::DEGENERATE);
    }

    #[test]
    fn orientation_is_antisymmetric_under_swap() {
        let a = Point2::new(-3.25, 1.5);
        let b = Point2::new(0.75, -2.0);
        let c = Point2::new(4.5, 3.125);
        assert_eq!(orient2d(a, b, c), Orientation::POSITIVE);
        assert_eq!(orient2d(a, c, b), Orientation::NEGATIVE);
    }

    #[test]
    fn orientation_near_collinear_large_coordinates() {
        // A perturbation far below the representable resolution at this
        // magnitude must classify as degenerate, not flip the sign.
        let a = Point2::new(1e8, 1e8);
        let b = Point2::new(2e8, 2e8);
        let c = Point2::new(3e8, 3e8 + 1e-9);
        assert_eq!(orient2d(a, b, c), Orientation::DEGENERATE);
    }

    #[test]
    fn signed_area_matches_orientation() {
        let a = Point2::new(0.0, 0.0);
        let b = Point2::new(1.0, 0.0);
        let c = Point2::new(0.0, 1.0);
        assert!(signed_area2(a, b, c) > 0.0);
        assert!(signed_area2(a, c, b) < 0.0);
        assert_eq!(signed_area2(a, b, c), 1.0);
    }

    #[test]
    fn in_circle_basic() {
        let a = Point2::new(0.0, 0.0);
        let b = Point2::new(1.0, 0.0);
        let c = Point2::new(0.0, 1.0);
        assert_eq!(in_circle(a, b, c, Point2::new(0.4, 0.4)), InSphere::INSIDE);
        assert_eq!(in_circle(a, b, c, Point2::new(2.0, 2.0)), InSphere::OUTSIDE);
    }

    #[test]
    fn in_circle_cocircular_square() {
        // All four corners of the unit square lie on one circle.
        let a = Point2::new(0.0, 0.0);
        let b = Point2::new(1.0, 0.0);
        let c = Point2::new(1.0, 1.0);
        let d = Point2::new(0.0, 1.0);
        assert_eq!(in_circle(a, b, c, d), InSphere::BOUNDARY);
    }

    #[test]
    fn in_circle_translation_invariance() {
        let shift = 1000.0;
        let a = Point2::new(0.0 + shift, 0.0 + shift);
        let b = Point2::new(1.0 + shift, 0.0 + shift);
        let c = Point2::new(0.0 + shift, 1.0 + shift);
        assert_eq!(in_circle(a, b, c, Point2::new(0.4 + shift, 0.4 + shift)), InSphere::INSIDE);
        assert_eq!(in_circle(a, b, c, Point2::new(2.0 + shift, 2.0 + shift)), InSphere::OUTSIDE);
    }
}
