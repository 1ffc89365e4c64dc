//! Source stages feeding point records into a pipeline.
//!
//! Two heads are provided: [`BufferReader`] over caller-supplied records for
//! in-process use, and [`TextReader`] over delimited text files with a
//! header line naming the dimensions. Anything richer than that belongs to
//! external ingestion tooling, not this crate.

use std::fs::File;
use std::io::{BufRead, BufReader as IoBufReader};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::pipeline::schema::{DIM_X, DIM_Y, DIM_Z, Schema};
use crate::pipeline::stage::{Stage, StageError};
use crate::pipeline::view::PointView;

// =============================================================================
// BUFFER READER
// =============================================================================

/// In-memory source over `(x, y, z)` records.
///
/// Declares the `X`, `Y`, `Z` dimensions and emits one view holding the
/// records in the order supplied.
#[derive(Clone, Debug, Default)]
pub struct BufferReader {
    records: Vec<[f64; 3]>,
}

impl BufferReader {
    /// Creates a reader over the given records.
    #[must_use]
    pub fn new(records: Vec<[f64; 3]>) -> Self {
        Self { records }
    }

    /// Creates a reader over planar records, with z fixed at 0.
    #[must_use]
    pub fn from_xy(records: impl IntoIterator<Item = (f64, f64)>) -> Self {
        Self::new(
            records
                .into_iter()
                .map(|(x, y)| [x, y, 0.0])
                .collect(),
        )
    }
}

impl Stage for BufferReader {
    fn name(&self) -> &str {
        "readers.buffer"
    }

    fn prepare(&mut self, schema: &mut Schema) -> Result<(), StageError> {
        schema.add(DIM_X);
        schema.add(DIM_Y);
        schema.add(DIM_Z);
        Ok(())
    }

    fn execute(&mut self, inputs: Vec<PointView>) -> Result<Vec<PointView>, StageError> {
        if !inputs.is_empty() {
            return Err(StageError::InputArity {
                stage: self.name().to_string(),
                expected: 0,
                got: inputs.len(),
            });
        }
        let mut view = PointView::new(Schema::with_dimensions([DIM_X, DIM_Y, DIM_Z]));
        for record in &self.records {
            view.push_record(record).map_err(|source| StageError::Record {
                stage: self.name().to_string(),
                source,
            })?;
        }
        debug!(points = view.len(), "buffer reader produced view");
        Ok(vec![view])
    }
}

// =============================================================================
// TEXT READER
// =============================================================================

/// Source over a delimited text file of point records.
///
/// The first line is a header naming the dimensions (`X,Y,Z`); subsequent
/// lines carry one record each. Fields are separated by commas when the
/// header contains one, otherwise by whitespace. Blank lines are skipped.
///
/// The header is read during `prepare` so downstream stages can validate
/// against the declared dimensions before any point flows.
#[derive(Debug)]
pub struct TextReader {
    path: PathBuf,
    dimensions: Vec<String>,
    comma_separated: bool,
}

impl TextReader {
    /// Creates a reader over the file at `path`.
    #[must_use]
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            dimensions: Vec::new(),
            comma_separated: false,
        }
    }

    fn io_error(&self, source: std::io::Error) -> StageError {
        StageError::Io {
            stage: self.name().to_string(),
            path: self.path.display().to_string(),
            source,
        }
    }

    fn split_fields(&self, line: &str) -> Vec<String> {
        if self.comma_separated {
            line.split(',').map(|field| field.trim().to_string()).collect()
        } else {
            line.split_whitespace().map(str::to_string).collect()
        }
    }
}

impl Stage for TextReader {
    fn name(&self) -> &str {
        "readers.text"
    }

    fn prepare(&mut self, schema: &mut Schema) -> Result<(), StageError> {
        let file = File::open(&self.path).map_err(|e| self.io_error(e))?;
        let mut header = String::new();
        IoBufReader::new(file)
            .read_line(&mut header)
            .map_err(|e| self.io_error(e))?;

        self.comma_separated = header.contains(',');
        self.dimensions = self.split_fields(header.trim_end());
        if self.dimensions.is_empty() {
            return Err(StageError::Parse {
                stage: self.name().to_string(),
                line: 1,
                message: format!("`{}` has no header line", self.path.display()),
            });
        }
        for dimension in &self.dimensions {
            schema.add(dimension);
        }
        debug!(
            path = %self.path.display(),
            dimensions = self.dimensions.len(),
            "text reader declared dimensions"
        );
        Ok(())
    }

    fn execute(&mut self, inputs: Vec<PointView>) -> Result<Vec<PointView>, StageError> {
        if !inputs.is_empty() {
            return Err(StageError::InputArity {
                stage: self.name().to_string(),
                expected: 0,
                got: inputs.len(),
            });
        }
        let file = File::open(&self.path).map_err(|e| self.io_error(e))?;
        let mut view = PointView::new(Schema::with_dimensions(self.dimensions.clone()));

        for (number, line) in IoBufReader::new(file).lines().enumerate() {
            let line = line.map_err(|e| self.io_error(e))?;
            // Line numbers are one-based; line 1 is the header.
            if number == 0 || line.trim().is_empty() {
                continue;
            }
            let fields = self.split_fields(&line);
            let mut values = Vec::with_capacity(fields.len());
            for field in &fields {
                let value: f64 = field.parse().map_err(|_| StageError::Parse {
                    stage: self.name().to_string(),
                    line: number + 1,
                    message: format!("`{field}` is not a number"),
                })?;
                values.push(value);
            }
            view.push_record(&values).map_err(|source| StageError::Record {
                stage: self.name().to_string(),
                source,
            })?;
        }
        debug!(path = %self.path.display(), points = view.len(), "text reader produced view");
        Ok(vec![view])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::stage::Pipeline;

    #[test]
    fn buffer_reader_declares_xyz_and_emits_one_view() {
        let reader = BufferReader::new(vec![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]);
        let mut pipeline = Pipeline::new(reader);
        pipeline.prepare().unwrap();
        assert!(pipeline.schema().has_xy());

        let views = pipeline.execute().unwrap();
        assert_eq!(views.len(), 1);
        assert_eq!(views[0].len(), 2);
        assert_eq!(views[0].y(1), Some(5.0));
    }

    #[test]
    fn buffer_reader_from_xy_zeroes_z() {
        let reader = BufferReader::from_xy([(1.0, 2.0)]);
        let mut pipeline = Pipeline::new(reader);
        pipeline.prepare().unwrap();
        let views = pipeline.execute().unwrap();
        assert_eq!(views[0].z(0), Some(0.0));
    }

    #[test]
    fn buffer_reader_rejects_upstream_views() {
        let mut reader = BufferReader::default();
        let mut schema = Schema::new();
        reader.prepare(&mut schema).unwrap();
        let err = reader.execute(vec![PointView::default()]).unwrap_err();
        assert!(matches!(err, StageError::InputArity { expected: 0, got: 1, .. }));
    }

    #[test]
    fn text_reader_missing_file_is_an_io_error() {
        let mut reader = TextReader::new("/nonexistent/points.txt");
        let mut schema = Schema::new();
        let err = reader.prepare(&mut schema).unwrap_err();
        assert!(matches!(err, StageError::Io { .. }));
    }
}
