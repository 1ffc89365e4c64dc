//! Triangular mesh output of the triangulation engine.
//!
//! A [`TriangularMesh`] is an ordered sequence of [`Triangle`]s whose
//! vertices are indices into the point collection the mesh was computed
//! from. The mesh never stores coordinates; the backing collection must
//! outlive any consumer that dereferences the indices.
//!
//! Emission order of the triangles is deterministic for identical input but
//! is not part of the contract — consumers must match triangles as a set,
//! up to rotation of each index triple.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geometry::point::Point2;
use crate::geometry::predicates::{Orientation, orient2d};

// =============================================================================
// TRIANGLE
// =============================================================================

/// A triangle referencing three points by index.
///
/// The vertex order `a → b → c` is counter-clockwise in the (x, y) plane;
/// the engine guarantees this as a postcondition, and
/// [`TriangularMesh::validate`] checks it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Triangle {
    /// Index of the first vertex.
    pub a: usize,
    /// Index of the second vertex.
    pub b: usize,
    /// Index of the third vertex.
    pub c: usize,
}

impl Triangle {
    /// Creates a triangle from three point indices.
    #[must_use]
    pub const fn new(a: usize, b: usize, c: usize) -> Self {
        Self { a, b, c }
    }

    /// The vertex indices in order.
    #[must_use]
    pub const fn vertices(self) -> [usize; 3] {
        [self.a, self.b, self.c]
    }

    /// Returns `true` when `v` is one of the triangle's vertices.
    #[must_use]
    pub fn contains_vertex(self, v: usize) -> bool {
        self.a == v || self.b == v || self.c == v
    }

    /// The three directed edges of the triangle, in winding order.
    #[must_use]
    pub const fn directed_edges(self) -> [(usize, usize); 3] {
        [(self.a, self.b), (self.b, self.c), (self.c, self.a)]
    }

    /// Rotates the triple so the smallest index comes first.
    ///
    /// Rotation preserves winding, so two triangles over the same vertex
    /// cycle compare equal after canonicalization while a reflected
    /// (re-wound) triangle does not.
    #[must_use]
    pub fn canonical(self) -> Self {
        if self.a <= self.b && self.a <= self.c {
            self
        } else if self.b <= self.c {
            Self::new(self.b, self.c, self.a)
        } else {
            Self::new(self.c, self.a, self.b)
        }
    }
}

impl std::fmt::Display for Triangle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {}, {})", self.a, self.b, self.c)
    }
}

// =============================================================================
// MESH
// =============================================================================

/// An ordered sequence of triangles over a shared point collection.
///
/// # Examples
///
/// ```rust
/// use pointpipe::core::mesh::{Triangle, TriangularMesh};
///
/// let mesh = TriangularMesh::from_triangles(vec![Triangle::new(0, 1, 2)]);
/// assert_eq!(mesh.len(), 1);
/// assert_eq!(mesh[0].vertices(), [0, 1, 2]);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriangularMesh {
    triangles: Vec<Triangle>,
}

impl TriangularMesh {
    /// Creates an empty mesh.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            triangles: Vec::new(),
        }
    }

    /// Creates a mesh from an existing triangle sequence.
    #[must_use]
    pub fn from_triangles(triangles: Vec<Triangle>) -> Self {
        Self { triangles }
    }

    /// Number of triangles in the mesh.
    #[must_use]
    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    /// Returns `true` when the mesh contains no triangles.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Returns the triangle at `index`, or `None` past the end.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<Triangle> {
        self.triangles.get(index).copied()
    }

    /// Iterates over the triangles in emission order.
    pub fn iter(&self) -> impl Iterator<Item = Triangle> + '_ {
        self.triangles.iter().copied()
    }

    pub(crate) fn push(&mut self, triangle: Triangle) {
        self.triangles.push(triangle);
    }

    /// Checks the structural mesh invariants against the point collection
    /// the mesh was computed from.
    ///
    /// Verified per triangle: all indices in bounds, pairwise distinct, and
    /// counter-clockwise winding. Verified across the mesh: no directed edge
    /// is traversed twice (adjacent triangles reference a shared edge in
    /// opposite order) and no undirected edge is used by more than two
    /// triangles.
    ///
    /// # Errors
    ///
    /// Returns the first violation found as a [`MeshValidationError`].
    pub fn validate(&self, points: &[Point2]) -> Result<(), MeshValidationError> {
        let mut directed_edges: FxHashMap<(usize, usize), usize> = FxHashMap::default();

        for (index, triangle) in self.iter().enumerate() {
            for v in triangle.vertices() {
                if v >= points.len() {
                    return Err(MeshValidationError::IndexOutOfBounds {
                        index,
                        vertex: v,
                        point_count: points.len(),
                    });
                }
            }
            if triangle.a == triangle.b || triangle.b == triangle.c || triangle.a == triangle.c {
                return Err(MeshValidationError::RepeatedVertex { index, triangle });
            }
            if orient2d(points[triangle.a], points[triangle.b], points[triangle.c])
                != Orientation::POSITIVE
            {
                return Err(MeshValidationError::NotCounterClockwise { index, triangle });
            }

            for edge in triangle.directed_edges() {
                if directed_edges.insert(edge, index).is_some() {
                    return Err(MeshValidationError::IncoherentEdge {
                        from: edge.0,
                        to: edge.1,
                    });
                }
            }
        }

        // Directed edges are unique past this point, so an undirected edge
        // is used at most twice, once per direction.
        Ok(())
    }
}

impl std::ops::Index<usize> for TriangularMesh {
    type Output = Triangle;

    fn index(&self, index: usize) -> &Self::Output {
        &self.triangles[index]
    }
}

impl<'a> IntoIterator for &'a TriangularMesh {
    type Item = &'a Triangle;
    type IntoIter = std::slice::Iter<'a, Triangle>;

    fn into_iter(self) -> Self::IntoIter {
        self.triangles.iter()
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Violations of the mesh invariants detected by [`TriangularMesh::validate`].
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum MeshValidationError {
    /// A triangle references an index outside the point collection.
    #[error(
        "triangle {index} references point {vertex}, but the collection holds {point_count} points"
    )]
    IndexOutOfBounds {
        /// Position of the offending triangle in the mesh.
        index: usize,
        /// The out-of-bounds vertex index.
        vertex: usize,
        /// Size of the point collection.
        point_count: usize,
    },
    /// A triangle references the same point more than once.
    #[error("triangle {index} {triangle} has repeated vertices")]
    RepeatedVertex {
        /// Position of the offending triangle in the mesh.
        index: usize,
        /// The offending triangle.
        triangle: Triangle,
    },
    /// A triangle's vertex order is not counter-clockwise.
    #[error("triangle {index} {triangle} is not counter-clockwise")]
    NotCounterClockwise {
        /// Position of the offending triangle in the mesh.
        index: usize,
        /// The offending triangle.
        triangle: Triangle,
    },
    /// A directed edge is traversed twice in the same direction, meaning two
    /// triangles overlap or one is re-wound.
    #[error("directed edge ({from}, {to}) is traversed by more than one triangle")]
    IncoherentEdge {
        /// Edge origin vertex.
        from: usize,
        /// Edge destination vertex.
        to: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_square() -> Vec<Point2> {
        vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(0.0, 1.0),
        ]
    }

    #[test]
    fn canonical_rotation_preserves_winding() {
        let t = Triangle::new(5, 2, 0);
        assert_eq!(t.canonical(), Triangle::new(0, 5, 2));
        assert_eq!(Triangle::new(2, 5, 0).canonical(), Triangle::new(0, 2, 5));
        // Same cycle, different starting vertex: equal after canonicalization.
        assert_eq!(
            Triangle::new(2, 0, 5).canonical(),
            Triangle::new(0, 5, 2).canonical()
        );
        // Reflection is a different cycle and stays different.
        assert_ne!(
            Triangle::new(0, 2, 5).canonical(),
            Triangle::new(0, 5, 2).canonical()
        );
    }

    #[test]
    fn validate_accepts_coherent_mesh() {
        let points = unit_square();
        let mesh = TriangularMesh::from_triangles(vec![
            Triangle::new(0, 1, 2),
            Triangle::new(0, 2, 3),
        ]);
        assert!(mesh.validate(&points).is_ok());
    }

    #[test]
    fn validate_rejects_clockwise_triangle() {
        let points = unit_square();
        let mesh = TriangularMesh::from_triangles(vec![Triangle::new(0, 2, 1)]);
        assert!(matches!(
            mesh.validate(&points),
            Err(MeshValidationError::NotCounterClockwise { index: 0, .. })
        ));
    }

    #[test]
    fn validate_rejects_out_of_bounds_index() {
        let points = unit_square();
        let mesh = TriangularMesh::from_triangles(vec![Triangle::new(0, 1, 9)]);
        assert!(matches!(
            mesh.validate(&points),
            Err(MeshValidationError::IndexOutOfBounds { vertex: 9, .. })
        ));
    }

    #[test]
    fn validate_rejects_repeated_vertex() {
        let points = unit_square();
        let mesh = TriangularMesh::from_triangles(vec![Triangle::new(0, 1, 1)]);
        assert!(matches!(
            mesh.validate(&points),
            Err(MeshValidationError::RepeatedVertex { index: 0, .. })
        ));
    }

    #[test]
    fn validate_rejects_same_direction_edge_reuse() {
        let points = unit_square();
        // Both triangles traverse the edge 0 → 2 in the same direction.
        let mesh = TriangularMesh::from_triangles(vec![
            Triangle::new(0, 2, 3),
            Triangle::new(0, 2, 3),
        ]);
        assert!(matches!(
            mesh.validate(&points),
            Err(MeshValidationError::IncoherentEdge { .. })
        ));
    }

    #[test]
    fn indexed_access_and_iteration() {
        let mesh = TriangularMesh::from_triangles(vec![
            Triangle::new(0, 1, 2),
            Triangle::new(0, 2, 3),
        ]);
        assert_eq!(mesh.len(), 2);
        assert_eq!(mesh[1], Triangle::new(0, 2, 3));
        assert_eq!(mesh.get(2), None);
        assert_eq!(mesh.iter().count(), 2);
    }
}
