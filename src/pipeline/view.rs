//! Point collections flowing between pipeline stages.
//!
//! A [`PointView`] is an ordered collection of point records with stable
//! zero-based indices, one `f64` column per schema dimension, and a set of
//! named [`TriangularMesh`] slots. Filters that compute a mesh attach it to
//! the view they pass through; consumers retrieve it by name.

use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::core::mesh::TriangularMesh;
use crate::geometry::point::Point2;
use crate::pipeline::schema::{DIM_X, DIM_Y, DIM_Z, Schema};

/// An ordered point collection with named mesh slots.
///
/// Record indices are stable for the lifetime of the view; meshes attached
/// to the view reference records by those indices.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PointView {
    schema: Schema,
    columns: Vec<Vec<f64>>,
    meshes: FxHashMap<String, TriangularMesh>,
}

impl PointView {
    /// Creates an empty view with one column per schema dimension.
    #[must_use]
    pub fn new(schema: Schema) -> Self {
        let columns = vec![Vec::new(); schema.len()];
        Self {
            schema,
            columns,
            meshes: FxHashMap::default(),
        }
    }

    /// The view's schema.
    #[must_use]
    pub const fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Number of point records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.first().map_or(0, Vec::len)
    }

    /// Returns `true` when the view holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Appends a record and returns its index.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError::RecordWidth`] when the value count does not
    /// match the schema.
    pub fn push_record(&mut self, values: &[f64]) -> Result<usize, ViewError> {
        if values.len() != self.schema.len() {
            return Err(ViewError::RecordWidth {
                got: values.len(),
                expected: self.schema.len(),
            });
        }
        for (column, &value) in self.columns.iter_mut().zip(values) {
            column.push(value);
        }
        Ok(self.len() - 1)
    }

    /// The value of dimension `dimension` for record `index`.
    #[must_use]
    pub fn value(&self, dimension: usize, index: usize) -> Option<f64> {
        self.columns.get(dimension)?.get(index).copied()
    }

    /// The full column for dimension `dimension`.
    #[must_use]
    pub fn column(&self, dimension: usize) -> Option<&[f64]> {
        self.columns.get(dimension).map(Vec::as_slice)
    }

    /// X coordinate of record `index`, if an `X` dimension is declared.
    #[must_use]
    pub fn x(&self, index: usize) -> Option<f64> {
        self.value(self.schema.index_of(DIM_X)?, index)
    }

    /// Y coordinate of record `index`, if a `Y` dimension is declared.
    #[must_use]
    pub fn y(&self, index: usize) -> Option<f64> {
        self.value(self.schema.index_of(DIM_Y)?, index)
    }

    /// Z coordinate of record `index`, if a `Z` dimension is declared.
    #[must_use]
    pub fn z(&self, index: usize) -> Option<f64> {
        self.value(self.schema.index_of(DIM_Z)?, index)
    }

    /// Projects the records onto the (x, y) plane, in record order.
    ///
    /// Returns `None` when the schema lacks either planar dimension.
    #[must_use]
    pub fn projected_xy(&self) -> Option<Vec<Point2>> {
        let xs = self.column(self.schema.index_of(DIM_X)?)?;
        let ys = self.column(self.schema.index_of(DIM_Y)?)?;
        Some(
            xs.iter()
                .zip(ys)
                .map(|(&x, &y)| Point2::new(x, y))
                .collect(),
        )
    }

    /// Attaches `mesh` under `name`, replacing any mesh already there.
    pub fn attach_mesh(&mut self, name: impl Into<String>, mesh: TriangularMesh) {
        self.meshes.insert(name.into(), mesh);
    }

    /// The mesh attached under `name`, if any.
    #[must_use]
    pub fn mesh(&self, name: &str) -> Option<&TriangularMesh> {
        self.meshes.get(name)
    }

    /// Names of all attached meshes, in no particular order.
    pub fn mesh_names(&self) -> impl Iterator<Item = &str> {
        self.meshes.keys().map(String::as_str)
    }
}

/// Errors raised when mutating a [`PointView`].
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ViewError {
    /// A record's value count does not match the schema.
    #[error("record carries {got} values but the schema declares {expected} dimensions")]
    RecordWidth {
        /// Values supplied.
        got: usize,
        /// Dimensions declared by the schema.
        expected: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::mesh::{Triangle, TriangularMesh};

    fn xyz_view() -> PointView {
        let mut view = PointView::new(Schema::with_dimensions([DIM_X, DIM_Y, DIM_Z]));
        view.push_record(&[1.0, 2.0, 3.0]).unwrap();
        view.push_record(&[4.0, 5.0, 6.0]).unwrap();
        view
    }

    #[test]
    fn records_are_indexed_in_order() {
        let view = xyz_view();
        assert_eq!(view.len(), 2);
        assert_eq!(view.x(0), Some(1.0));
        assert_eq!(view.y(1), Some(5.0));
        assert_eq!(view.z(1), Some(6.0));
        assert_eq!(view.x(2), None);
    }

    #[test]
    fn record_width_is_enforced() {
        let mut view = PointView::new(Schema::with_dimensions([DIM_X, DIM_Y]));
        assert_eq!(
            view.push_record(&[1.0]),
            Err(ViewError::RecordWidth { got: 1, expected: 2 })
        );
        assert!(view.is_empty());
    }

    #[test]
    fn projection_follows_record_order() {
        let view = xyz_view();
        let points = view.projected_xy().unwrap();
        assert_eq!(points, vec![Point2::new(1.0, 2.0), Point2::new(4.0, 5.0)]);
    }

    #[test]
    fn projection_requires_both_axes() {
        let view = PointView::new(Schema::with_dimensions([DIM_X, DIM_Z]));
        assert!(view.projected_xy().is_none());
    }

    #[test]
    fn mesh_slots_replace_by_name() {
        let mut view = xyz_view();
        assert!(view.mesh("delaunay2d").is_none());
        view.attach_mesh("delaunay2d", TriangularMesh::new());
        view.attach_mesh(
            "delaunay2d",
            TriangularMesh::from_triangles(vec![Triangle::new(0, 1, 2)]),
        );
        assert_eq!(view.mesh("delaunay2d").unwrap().len(), 1);
        assert_eq!(view.mesh_names().count(), 1);
    }
}
