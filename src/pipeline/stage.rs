//! Two-phase pipeline stages and the linear pipeline driver.
//!
//! A [`Stage`] is prepared once against the pipeline schema and then
//! executed once. The [`Pipeline`] driver owns a linear chain of stages
//! (one source, any number of filters), enforces the
//! `Unprepared → Prepared → Executed` state machine for each of them, and
//! threads point views from one stage to the next. A failure in any stage
//! aborts the run; downstream stages are never invoked.
//!
//! Execution is single-threaded and synchronous: `prepare` and `execute`
//! are plain blocking calls with no suspension points.

use thiserror::Error;
use tracing::debug;

use crate::core::triangulation::TriangulationError;
use crate::pipeline::schema::Schema;
use crate::pipeline::view::{PointView, ViewError};

// =============================================================================
// STAGE CONTRACT
// =============================================================================

/// A unit of pipeline execution with a two-phase lifecycle.
///
/// `prepare` validates inputs and declares outputs against the shared
/// schema; `execute` produces point views. Implementations do not need to
/// track their own phase — the [`Pipeline`] driver guarantees `prepare` runs
/// exactly once before the single `execute` call.
pub trait Stage {
    /// Stable stage name used in logs and error messages, e.g.
    /// `"filters.delaunay"`.
    fn name(&self) -> &str;

    /// Validates the incoming schema and declares this stage's dimensions.
    ///
    /// Source stages add the dimensions they will produce; filters verify
    /// the dimensions they require are present.
    ///
    /// # Errors
    ///
    /// Any error is a configuration failure and aborts the pipeline before
    /// any `execute` call.
    fn prepare(&mut self, schema: &mut Schema) -> Result<(), StageError>;

    /// Consumes the upstream views and produces this stage's output views.
    ///
    /// Source stages receive an empty input vector.
    ///
    /// # Errors
    ///
    /// Any error aborts the pipeline run; downstream stages are not invoked.
    fn execute(&mut self, inputs: Vec<PointView>) -> Result<Vec<PointView>, StageError>;
}

/// Lifecycle phase of a stage within a pipeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StagePhase {
    /// The stage has not been prepared.
    Unprepared,
    /// `prepare` succeeded; the stage may execute once.
    Prepared,
    /// The stage has executed.
    Executed,
}

impl std::fmt::Display for StagePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unprepared => write!(f, "unprepared"),
            Self::Prepared => write!(f, "prepared"),
            Self::Executed => write!(f, "executed"),
        }
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors raised by stages and the pipeline driver.
#[derive(Debug, Error)]
pub enum StageError {
    /// The stage is misconfigured (missing dimensions, bad options).
    #[error("configuration error in stage `{stage}`: {message}")]
    Configuration {
        /// Name of the failing stage.
        stage: String,
        /// What was wrong.
        message: String,
    },
    /// A lifecycle call arrived out of phase order.
    #[error("stage `{stage}` is {phase} and cannot {operation}")]
    Phase {
        /// Name of the failing stage.
        stage: String,
        /// The stage's current phase.
        phase: StagePhase,
        /// The operation that was attempted.
        operation: &'static str,
    },
    /// A stage received the wrong number of input views.
    #[error("stage `{stage}` expected {expected} input view(s), got {got}")]
    InputArity {
        /// Name of the failing stage.
        stage: String,
        /// Views the stage requires.
        expected: usize,
        /// Views it received.
        got: usize,
    },
    /// An I/O failure in a source stage.
    #[error("I/O error in stage `{stage}` reading `{path}`")]
    Io {
        /// Name of the failing stage.
        stage: String,
        /// Path being read.
        path: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// A malformed record in a source stage's input.
    #[error("parse error in stage `{stage}` at line {line}: {message}")]
    Parse {
        /// Name of the failing stage.
        stage: String,
        /// One-based line number.
        line: usize,
        /// What failed to parse.
        message: String,
    },
    /// A record did not match the view's schema.
    #[error("record error in stage `{stage}`")]
    Record {
        /// Name of the failing stage.
        stage: String,
        /// The underlying view error.
        #[source]
        source: ViewError,
    },
    /// The triangulation engine rejected the stage's input.
    #[error("triangulation failed in stage `{stage}`")]
    Triangulation {
        /// Name of the failing stage.
        stage: String,
        /// The underlying engine error.
        #[source]
        source: TriangulationError,
    },
}

// =============================================================================
// PIPELINE DRIVER
// =============================================================================

/// A linear chain of stages: one source followed by zero or more filters.
///
/// # Examples
///
/// ```rust
/// use pointpipe::pipeline::delaunay_filter::DelaunayFilter;
/// use pointpipe::pipeline::reader::BufferReader;
/// use pointpipe::pipeline::stage::Pipeline;
///
/// let reader = BufferReader::new(vec![
///     [0.0, 0.0, 0.0],
///     [4.0, 0.0, 0.0],
///     [2.0, 3.0, 0.0],
/// ]);
/// let mut pipeline = Pipeline::new(reader).then(DelaunayFilter::new());
/// pipeline.prepare().unwrap();
/// let views = pipeline.execute().unwrap();
/// assert_eq!(views.len(), 1);
/// assert_eq!(views[0].mesh("delaunay2d").unwrap().len(), 1);
/// ```
pub struct Pipeline {
    stages: Vec<(Box<dyn Stage>, StagePhase)>,
    schema: Schema,
}

impl Pipeline {
    /// Creates a pipeline rooted at a source stage.
    #[must_use]
    pub fn new<S: Stage + 'static>(source: S) -> Self {
        Self {
            stages: vec![(Box::new(source), StagePhase::Unprepared)],
            schema: Schema::new(),
        }
    }

    /// Appends a stage downstream of the current tail.
    #[must_use]
    pub fn then<S: Stage + 'static>(mut self, stage: S) -> Self {
        self.stages.push((Box::new(stage), StagePhase::Unprepared));
        self
    }

    /// The schema assembled by the prepared stages.
    #[must_use]
    pub const fn schema(&self) -> &Schema {
        &self.schema
    }

    /// The lifecycle phase of the stage at `index` in chain order.
    #[must_use]
    pub fn phase(&self, index: usize) -> Option<StagePhase> {
        self.stages.get(index).map(|(_, phase)| *phase)
    }

    /// Prepares every stage in chain order.
    ///
    /// # Errors
    ///
    /// Fails if any stage is already prepared or reports a configuration
    /// error. Preparation stops at the first failure.
    pub fn prepare(&mut self) -> Result<(), StageError> {
        for (stage, phase) in &mut self.stages {
            if *phase != StagePhase::Unprepared {
                return Err(StageError::Phase {
                    stage: stage.name().to_string(),
                    phase: *phase,
                    operation: "prepare",
                });
            }
            stage.prepare(&mut self.schema)?;
            *phase = StagePhase::Prepared;
            debug!(stage = stage.name(), "stage prepared");
        }
        Ok(())
    }

    /// Executes every stage in chain order, threading views downstream.
    ///
    /// Returns the output views of the final stage.
    ///
    /// # Errors
    ///
    /// Fails if any stage is not in the `Prepared` phase or if a stage
    /// reports an execution error; downstream stages are then not invoked.
    pub fn execute(&mut self) -> Result<Vec<PointView>, StageError> {
        let mut views = Vec::new();
        for (stage, phase) in &mut self.stages {
            if *phase != StagePhase::Prepared {
                return Err(StageError::Phase {
                    stage: stage.name().to_string(),
                    phase: *phase,
                    operation: "execute",
                });
            }
            views = stage.execute(views)?;
            *phase = StagePhase::Executed;
            debug!(stage = stage.name(), views = views.len(), "stage executed");
        }
        Ok(views)
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut chain = f.debug_list();
        for (stage, phase) in &self.stages {
            chain.entry(&format_args!("{} ({phase})", stage.name()));
        }
        chain.finish()
    }
}
