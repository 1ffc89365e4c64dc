//! Delaunay mesh filter stage.
//!
//! [`DelaunayFilter`] wraps the [`DelaunayEngine`]: it consumes one input
//! view, triangulates the records' (x, y) projection, and passes the view
//! through unmodified with the resulting mesh attached under a configured
//! name. A degenerate input (too few points, collinear points) is a
//! successful run that attaches an empty mesh.

use tracing::debug;

use crate::core::triangulation::DelaunayEngine;
use crate::pipeline::schema::{DIM_X, DIM_Y, Schema};
use crate::pipeline::stage::{Stage, StageError, StagePhase};
use crate::pipeline::view::PointView;

/// Mesh slot name used when none is configured.
pub const DEFAULT_MESH_NAME: &str = "delaunay2d";

/// Filter stage attaching a 2D Delaunay mesh to the view it passes through.
///
/// All configuration is explicit at construction time; the stage holds no
/// ambient state, so independent pipelines can run filters concurrently.
///
/// # Examples
///
/// ```rust
/// use pointpipe::pipeline::delaunay_filter::DelaunayFilter;
///
/// let filter = DelaunayFilter::new().with_mesh_name("ground-mesh");
/// assert_eq!(filter.mesh_name(), "ground-mesh");
/// ```
#[derive(Clone, Debug)]
pub struct DelaunayFilter {
    mesh_name: String,
    engine: DelaunayEngine,
    planar_dimensions: Option<(usize, usize)>,
}

impl DelaunayFilter {
    /// Creates a filter writing to the [`DEFAULT_MESH_NAME`] slot.
    #[must_use]
    pub fn new() -> Self {
        Self {
            mesh_name: DEFAULT_MESH_NAME.to_string(),
            engine: DelaunayEngine::new(),
            planar_dimensions: None,
        }
    }

    /// Overrides the mesh slot name.
    #[must_use]
    pub fn with_mesh_name(mut self, name: impl Into<String>) -> Self {
        self.mesh_name = name.into();
        self
    }

    /// The configured mesh slot name.
    #[must_use]
    pub fn mesh_name(&self) -> &str {
        &self.mesh_name
    }
}

impl Default for DelaunayFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl Stage for DelaunayFilter {
    fn name(&self) -> &str {
        "filters.delaunay"
    }

    fn prepare(&mut self, schema: &mut Schema) -> Result<(), StageError> {
        let x = schema.index_of(DIM_X);
        let y = schema.index_of(DIM_Y);
        match (x, y) {
            (Some(x), Some(y)) => {
                self.planar_dimensions = Some((x, y));
                Ok(())
            }
            _ => Err(StageError::Configuration {
                stage: self.name().to_string(),
                message: format!(
                    "upstream schema does not declare both planar dimensions `{DIM_X}` and `{DIM_Y}`"
                ),
            }),
        }
    }

    fn execute(&mut self, mut inputs: Vec<PointView>) -> Result<Vec<PointView>, StageError> {
        let Some((x, y)) = self.planar_dimensions else {
            return Err(StageError::Phase {
                stage: self.name().to_string(),
                phase: StagePhase::Unprepared,
                operation: "execute",
            });
        };
        if inputs.len() != 1 {
            return Err(StageError::InputArity {
                stage: self.name().to_string(),
                expected: 1,
                got: inputs.len(),
            });
        }
        let mut view = inputs.pop().unwrap_or_default();

        let xs = view.column(x).unwrap_or(&[]);
        let ys = view.column(y).unwrap_or(&[]);
        let points: Vec<_> = xs
            .iter()
            .zip(ys)
            .map(|(&x, &y)| crate::geometry::point::Point2::new(x, y))
            .collect();

        let mesh = self
            .engine
            .triangulate(&points)
            .map_err(|source| StageError::Triangulation {
                stage: self.name().to_string(),
                source,
            })?;
        debug!(
            points = view.len(),
            triangles = mesh.len(),
            slot = %self.mesh_name,
            "attached delaunay mesh"
        );
        view.attach_mesh(self.mesh_name.clone(), mesh);
        Ok(vec![view])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::reader::BufferReader;
    use crate::pipeline::stage::Pipeline;

    #[test]
    fn passes_points_through_unchanged() {
        let records = vec![[0.0, 0.0, 1.0], [4.0, 0.0, 2.0], [2.0, 3.0, 3.0], [2.0, 1.0, 4.0]];
        let mut pipeline =
            Pipeline::new(BufferReader::new(records.clone())).then(DelaunayFilter::new());
        pipeline.prepare().unwrap();
        let views = pipeline.execute().unwrap();

        assert_eq!(views.len(), 1);
        let view = &views[0];
        assert_eq!(view.len(), records.len());
        for (i, record) in records.iter().enumerate() {
            assert_eq!(view.x(i), Some(record[0]));
            assert_eq!(view.y(i), Some(record[1]));
            assert_eq!(view.z(i), Some(record[2]));
        }
        assert_eq!(view.mesh(DEFAULT_MESH_NAME).unwrap().len(), 3);
    }

    #[test]
    fn degenerate_input_attaches_empty_mesh() {
        let reader = BufferReader::from_xy([(0.0, 0.0), (1.0, 1.0), (2.0, 2.0)]);
        let mut pipeline = Pipeline::new(reader).then(DelaunayFilter::new());
        pipeline.prepare().unwrap();
        let views = pipeline.execute().unwrap();
        let mesh = views[0].mesh(DEFAULT_MESH_NAME).unwrap();
        assert!(mesh.is_empty());
    }

    #[test]
    fn custom_mesh_name_is_used() {
        let reader = BufferReader::from_xy([(0.0, 0.0), (1.0, 0.0), (0.0, 1.0)]);
        let mut pipeline =
            Pipeline::new(reader).then(DelaunayFilter::new().with_mesh_name("tin"));
        pipeline.prepare().unwrap();
        let views = pipeline.execute().unwrap();
        assert!(views[0].mesh("tin").is_some());
        assert!(views[0].mesh(DEFAULT_MESH_NAME).is_none());
    }

    #[test]
    fn missing_planar_dimensions_fail_at_prepare() {
        let mut filter = DelaunayFilter::new();
        let mut schema = Schema::with_dimensions(["Intensity"]);
        let err = filter.prepare(&mut schema).unwrap_err();
        assert!(matches!(err, StageError::Configuration { .. }));
    }

    #[test]
    fn unprepared_execute_is_a_phase_error() {
        let mut filter = DelaunayFilter::new();
        let err = filter.execute(vec![PointView::default()]).unwrap_err();
        assert!(matches!(err, StageError::Phase { .. }));
    }
}
