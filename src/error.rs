//! Error types shared by the matrix model, the cost model and all solvers.

use thiserror::Error;

/// Errors reported synchronously by this crate.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error("malformed matrix: {0}")]
    MalformedMatrix(#[from] MatrixDefect),

    #[error("dimension mismatch ({tasks} tasks x {resources} resources): {reason}")]
    DimensionMismatch {
        tasks: usize,
        resources: usize,
        reason: &'static str,
    },

    #[error("task {task} assigned to resource {resource} of {num_resources}")]
    IndexOutOfRange {
        task: usize,
        resource: usize,
        num_resources: usize,
    },

    #[error("unknown algorithm: {0}")]
    UnknownAlgorithm(String),

    #[error("invalid reduction strategy: {0}")]
    InvalidStrategy(String),

    #[error("unknown heterogeneity level: {0}")]
    UnknownHeterogeneity(String),

    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

/// Structural defects detected while building an [`EtcMatrix`](crate::EtcMatrix).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatrixDefect {
    #[error("matrix has no tasks")]
    NoTasks,

    #[error("matrix has no resources")]
    NoResources,

    #[error("row {row} has {found} entries, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("entry ({row}, {col}) is negative or not a number")]
    InvalidEntry { row: usize, col: usize },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl Error {
    pub(crate) fn invalid_parameter(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}
