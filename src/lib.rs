//! # pointpipe
//!
//! A staged point-cloud processing pipeline with a 2D Delaunay meshing
//! filter.
//!
//! The crate has two halves:
//!
//! - a **pipeline layer**: stages with a two-phase `prepare`/`execute`
//!   lifecycle, chained linearly from one source stage through filters,
//!   passing ordered point collections ([`pipeline::view::PointView`])
//!   downstream;
//! - a **triangulation core**: a pure engine
//!   ([`core::triangulation::DelaunayEngine`]) converting an unordered 2D
//!   point set into a [`core::mesh::TriangularMesh`] of counter-clockwise
//!   triangles tiling the convex hull, with the Delaunay empty-circumcircle
//!   property.
//!
//! # Basic Usage
//!
//! ```rust
//! use pointpipe::prelude::*;
//!
//! // Source stage over in-memory (x, y, z) records.
//! let reader = BufferReader::new(vec![
//!     [0.0, 0.0, 0.0],
//!     [4.0, 0.0, 0.0],
//!     [4.0, 4.0, 0.0],
//!     [0.0, 4.0, 0.0],
//!     [2.0, 1.0, 0.0],
//! ]);
//!
//! let mut pipeline = Pipeline::new(reader).then(DelaunayFilter::new());
//! pipeline.prepare().unwrap();
//!
//! let views = pipeline.execute().unwrap();
//! assert_eq!(views.len(), 1);
//!
//! // The input points pass through unchanged; the mesh rides along under
//! // its configured name.
//! let view = &views[0];
//! assert_eq!(view.len(), 5);
//! let mesh = view.mesh("delaunay2d").unwrap();
//! assert_eq!(mesh.len(), 4);
//!
//! // Every triangle is counter-clockwise and references points by index.
//! for i in 0..mesh.len() {
//!     let [a, b, c] = mesh[i].vertices();
//!     assert!(a < view.len() && b < view.len() && c < view.len());
//! }
//! ```
//!
//! # Invariants
//!
//! Meshes produced by the engine satisfy, and
//! [`TriangularMesh::validate`](core::mesh::TriangularMesh::validate)
//! checks:
//!
//! - **Index validity** – every triangle vertex is a valid index into the
//!   source point collection.
//! - **CCW winding** – every triangle's vertex triple has positive signed
//!   area. This is a guaranteed postcondition, not an artifact of input
//!   order.
//! - **Coherent edges** – each undirected edge is used by at most two
//!   triangles, and a shared edge is traversed in opposite directions by
//!   its two triangles.
//! - **Hull tiling** – the triangles cover the convex hull of the distinct
//!   input points with no overlaps and no gaps.
//! - **Delaunay property** – no input point lies strictly inside the
//!   circumcircle of any triangle, up to the tie-break documented in
//!   [`core::triangulation`].
//!
//! Degenerate inputs (fewer than three distinct points, or all points
//! collinear) are well-defined outcomes that produce an empty mesh, never
//! errors. Emission order of the triangles is unspecified; consumers must
//! match triangles as a set, up to rotation of each index triple.

#![forbid(unsafe_code)]

/// Primary data structures and algorithms: the triangular mesh and the
/// Delaunay triangulation engine.
pub mod core {
    pub mod mesh;
    pub mod triangulation;
    pub use mesh::*;
    pub use triangulation::*;
}

/// Geometric types and predicates: planar points, orientation, and
/// circumcircle containment.
pub mod geometry {
    pub mod point;
    pub mod predicates;
    pub use point::*;
    pub use predicates::*;
}

/// Pipeline plumbing: schemas, point views, the stage contract, source
/// stages, and the Delaunay filter stage.
pub mod pipeline {
    pub mod delaunay_filter;
    pub mod reader;
    pub mod schema;
    pub mod stage;
    pub mod view;
    pub use delaunay_filter::*;
    pub use reader::*;
    pub use schema::*;
    pub use stage::*;
    pub use view::*;
}

/// Re-exports of the commonly used types.
pub mod prelude {
    pub use crate::core::mesh::{MeshValidationError, Triangle, TriangularMesh};
    pub use crate::core::triangulation::{DelaunayEngine, TriangulationError};
    pub use crate::geometry::point::Point2;
    pub use crate::geometry::predicates::{
        InSphere, Orientation, in_circle, orient2d, signed_area2,
    };
    pub use crate::pipeline::delaunay_filter::{DEFAULT_MESH_NAME, DelaunayFilter};
    pub use crate::pipeline::reader::{BufferReader, TextReader};
    pub use crate::pipeline::schema::{DIM_X, DIM_Y, DIM_Z, Schema};
    pub use crate::pipeline::stage::{Pipeline, Stage, StageError, StagePhase};
    pub use crate::pipeline::view::{PointView, ViewError};
}
