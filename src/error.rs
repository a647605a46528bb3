//! Error types for QUBO construction, conversion and annealing.

use thiserror::Error;

/// Errors raised while building, converting or solving a QUBO problem.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum QuboError {
    /// A supplied matrix or vector disagrees with the declared size.
    #[error("dimension mismatch: expected {expected}, actual {actual}")]
    DimensionMismatch {
        /// Declared size.
        expected: usize,
        /// Size actually supplied.
        actual: usize,
    },

    /// Every bias and coupler is zero, so no finite beta schedule exists.
    #[error("degenerate problem: all linear biases and couplers are zero")]
    DegenerateProblem,

    /// The sweep kernel completed none of the requested samples.
    #[error("annealing produced no samples out of {requested} requested")]
    TotalAnnealingFailure {
        /// Number of samples asked of the kernel.
        requested: usize,
    },

    /// An alternative solver backend returned an empty result.
    #[error("solver backend '{backend}' returned no solution")]
    BackendFailure {
        /// Backend name.
        backend: String,
    },

    /// A composite index falls outside the matrix.
    #[error("index ({row}, {col}) out of bounds for {size}x{size} matrix")]
    IndexOutOfBounds {
        /// Flattened row index.
        row: usize,
        /// Flattened column index.
        col: usize,
        /// Matrix dimension.
        size: usize,
    },

    /// Writes are only allowed on the upper triangle (`row <= col`).
    #[error("entry ({row}, {col}) lies in the lower triangle")]
    LowerTriangle {
        /// Flattened row index.
        row: usize,
        /// Flattened column index.
        col: usize,
    },

    /// A configuration value is out of range.
    #[error("invalid parameter: {message}")]
    InvalidParameter {
        /// What is wrong with the parameter.
        message: String,
    },
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, QuboError>;

impl QuboError {
    /// Create a DimensionMismatch error.
    pub fn dimension_mismatch(expected: usize, actual: usize) -> Self {
        Self::DimensionMismatch { expected, actual }
    }

    /// Create an InvalidParameter error.
    pub fn invalid_parameter(message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            message: message.into(),
        }
    }

    /// Create a BackendFailure error.
    pub fn backend_failure(backend: impl Into<String>) -> Self {
        Self::BackendFailure {
            backend: backend.into(),
        }
    }
}
