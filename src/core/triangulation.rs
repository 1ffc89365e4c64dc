//! Bowyer–Watson construction of 2D Delaunay triangulations.
//!
//! [`DelaunayEngine::triangulate`] converts an unordered planar point set
//! into a [`TriangularMesh`] covering the convex hull of the input, with
//! every triangle wound counter-clockwise and the empty-circumcircle
//! property holding up to the documented tie-break.
//!
//! # Numerical policy
//!
//! All geometric decisions go through the filtered predicates in
//! [`crate::geometry::predicates`]. Near-degenerate configurations classify
//! as [`Orientation::DEGENERATE`] / [`InSphere::BOUNDARY`], and the engine
//! applies one fixed rule to each:
//!
//! - `BOUNDARY` counts as *outside* the circumcircle during cavity search,
//!   so exactly-cocircular quadruples never re-open a cavity. One of the two
//!   valid diagonals is chosen deterministically by insertion order.
//! - An input whose distinct points are all `DEGENERATE` against its first
//!   edge is collinear and yields an empty mesh.
//!
//! Together with the fixed insertion order (input order, exact duplicates
//! skipped), identical input always produces the identical triangle set.

use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use thiserror::Error;
use tracing::{debug, trace};

use crate::core::mesh::{Triangle, TriangularMesh};
use crate::geometry::point::Point2;
use crate::geometry::predicates::{InSphere, Orientation, in_circle, orient2d};

/// Sizing factor for the enclosing super-triangle, relative to the larger
/// bounding-box extent of the input. Large enough that the super vertices
/// stay outside the circumcircle of every hull triangle whose thinnest
/// altitude exceeds about a millionth of the input extent.
const SUPER_TRIANGLE_SCALE: f64 = 1.0e6;

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors reported by [`DelaunayEngine::triangulate`].
///
/// Degenerate geometry (fewer than three usable points, collinear input) is
/// *not* an error; those inputs produce an empty mesh.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum TriangulationError {
    /// An input point carries a NaN or infinite coordinate.
    #[error("point {index} has a non-finite coordinate")]
    NonFiniteCoordinate {
        /// Index of the offending point in the input sequence.
        index: usize,
    },
}

// =============================================================================
// ENGINE
// =============================================================================

/// Stateless 2D Delaunay triangulation engine.
///
/// [`triangulate`](Self::triangulate) is pure over its input: no internal
/// state survives a call, the input slice is never mutated, and concurrent
/// calls on disjoint inputs need no synchronization.
///
/// # Examples
///
/// ```rust
/// use pointpipe::core::triangulation::DelaunayEngine;
/// use pointpipe::geometry::point::Point2;
///
/// let points = vec![
///     Point2::new(0.0, 0.0),
///     Point2::new(4.0, 0.0),
///     Point2::new(2.0, 3.0),
/// ];
/// let mesh = DelaunayEngine::new().triangulate(&points).unwrap();
/// assert_eq!(mesh.len(), 1);
/// assert_eq!(mesh[0].vertices(), [0, 1, 2]);
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct DelaunayEngine;

impl DelaunayEngine {
    /// Creates a new engine.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Computes the Delaunay triangulation of `points`.
    ///
    /// Triangle vertices are indices into `points`. Numerically equal
    /// coordinate pairs (including `0.0` versus `-0.0`) are triangulated
    /// once; the indices of later duplicates never appear in the mesh.
    /// Inputs with fewer than three distinct points, or with all distinct
    /// points collinear, yield an empty mesh.
    ///
    /// # Errors
    ///
    /// Returns [`TriangulationError::NonFiniteCoordinate`] if any input
    /// coordinate is NaN or infinite.
    pub fn triangulate(&self, points: &[Point2]) -> Result<TriangularMesh, TriangulationError> {
        for (index, point) in points.iter().enumerate() {
            if !point.is_finite() {
                return Err(TriangulationError::NonFiniteCoordinate { index });
            }
        }

        // First occurrence of each coordinate pair, in input order.
        let mut seen: FxHashMap<(u64, u64), usize> = FxHashMap::default();
        let mut distinct: Vec<usize> = Vec::with_capacity(points.len());
        for (index, point) in points.iter().enumerate() {
            seen.entry(point.bits()).or_insert_with(|| {
                distinct.push(index);
                index
            });
        }
        if distinct.len() < points.len() {
            debug!(
                skipped = points.len() - distinct.len(),
                "skipping exactly duplicated points"
            );
        }

        if distinct.len() < 3 {
            debug!(count = distinct.len(), "fewer than 3 distinct points, empty mesh");
            return Ok(TriangularMesh::new());
        }
        if all_collinear(points, &distinct) {
            debug!(count = distinct.len(), "all distinct points collinear, empty mesh");
            return Ok(TriangularMesh::new());
        }

        let mesh = bowyer_watson(points, &distinct);
        debug!(
            points = distinct.len(),
            triangles = mesh.len(),
            "triangulation complete"
        );

        #[cfg(debug_assertions)]
        if let Err(violation) = mesh.validate(points) {
            debug_assert!(false, "triangulation violated mesh invariants: {violation}");
        }

        Ok(mesh)
    }
}

/// Whether every distinct point is collinear with the first two.
fn all_collinear(points: &[Point2], distinct: &[usize]) -> bool {
    let a = points[distinct[0]];
    let b = points[distinct[1]];
    distinct[2..]
        .iter()
        .all(|&i| orient2d(a, b, points[i]) == Orientation::DEGENERATE)
}

/// Incremental Bowyer–Watson over an enclosing super-triangle.
///
/// Working triangles reference the input indices directly; the three
/// super-triangle vertices use indices `points.len()..points.len() + 3` and
/// every triangle incident to them is dropped before emission.
fn bowyer_watson(points: &[Point2], distinct: &[usize]) -> TriangularMesh {
    let super_base = points.len();
    let super_vertices = super_triangle(points, distinct);
    let coord = |i: usize| {
        if i < super_base {
            points[i]
        } else {
            super_vertices[i - super_base]
        }
    };

    // Triangle soup; all live triangles are CCW.
    let mut triangles: Vec<Triangle> =
        vec![Triangle::new(super_base, super_base + 1, super_base + 2)];

    for &index in distinct {
        let p = points[index];

        // Cavity: triangles whose circumcircle strictly contains p.
        let mut cavity: SmallVec<[usize; 16]> = SmallVec::new();
        for (t, triangle) in triangles.iter().enumerate() {
            let inside = in_circle(
                coord(triangle.a),
                coord(triangle.b),
                coord(triangle.c),
                p,
            );
            if inside == InSphere::INSIDE {
                cavity.push(t);
            }
        }
        if cavity.is_empty() {
            // Unreachable for a point inside the super-triangle; skipping
            // keeps the soup consistent if it ever happens.
            trace!(index, "point produced an empty cavity, skipped");
            continue;
        }

        // Cavity boundary: directed edges whose undirected form occurs in
        // exactly one cavity triangle. Directions stay CCW, so the re-fanned
        // triangles below come out CCW as well.
        let mut edges: FxHashMap<(usize, usize), ((usize, usize), usize)> = FxHashMap::default();
        for &t in &cavity {
            for (from, to) in triangles[t].directed_edges() {
                let key = if from < to { (from, to) } else { (to, from) };
                edges
                    .entry(key)
                    .and_modify(|(_, count)| *count += 1)
                    .or_insert(((from, to), 1));
            }
        }

        let mut rebuilt: Vec<Triangle> = Vec::with_capacity(triangles.len() + 2);
        for (t, triangle) in triangles.iter().enumerate() {
            if !cavity.contains(&t) {
                rebuilt.push(*triangle);
            }
        }
        for &((from, to), count) in edges.values() {
            if count == 1 {
                rebuilt.push(Triangle::new(from, to, index));
            }
        }
        triangles = rebuilt;
        trace!(index, cavity = cavity.len(), live = triangles.len(), "inserted point");
    }

    let mut mesh = TriangularMesh::new();
    for triangle in triangles {
        if triangle.a >= super_base || triangle.b >= super_base || triangle.c >= super_base {
            continue;
        }
        match orient2d(coord(triangle.a), coord(triangle.b), coord(triangle.c)) {
            Orientation::POSITIVE => mesh.push(triangle.canonical()),
            Orientation::NEGATIVE => {
                mesh.push(Triangle::new(triangle.a, triangle.c, triangle.b).canonical());
            }
            Orientation::DEGENERATE => {
                // Zero-area sliver from a tolerance-level tie; it covers
                // nothing, so dropping it keeps the tiling exact.
                trace!(%triangle, "dropping degenerate sliver");
            }
        }
    }
    mesh
}

/// A CCW triangle strictly enclosing the bounding box of the distinct
/// points, far enough out that its vertices stay clear of the interior
/// circumcircles that decide the final mesh.
fn super_triangle(points: &[Point2], distinct: &[usize]) -> [Point2; 3] {
    let mut min = points[distinct[0]];
    let mut max = min;
    for &i in distinct {
        let p = points[i];
        min.x = min.x.min(p.x);
        min.y = min.y.min(p.y);
        max.x = max.x.max(p.x);
        max.y = max.y.max(p.y);
    }
    let center = Point2::new((min.x + max.x) / 2.0, (min.y + max.y) / 2.0);
    // Distinct non-collinear points guarantee a strictly positive extent.
    let extent = (max.x - min.x).max(max.y - min.y);
    let reach = SUPER_TRIANGLE_SCALE * extent;
    [
        Point2::new(center.x - reach, center.y - reach),
        Point2::new(center.x + reach, center.y - reach),
        Point2::new(center.x, center.y + reach),
    ]
}
