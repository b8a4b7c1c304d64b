//! Error types for the solver.
//!
//! Every fallible library function returns [`TspResult`]. Reaching the
//! time limit is not an error: algorithms return their best tour instead.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for solver operations.
pub type TspResult<T> = Result<T, TspError>;

/// Unified error type for loading, configuring and running the solver.
#[derive(Debug, Error)]
pub enum TspError {
    /// The instance file is missing or unreadable.
    #[error("cannot read {}: {source}", path.display())]
    Io {
        /// Path that failed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The instance file is malformed.
    #[error("parse error at line {line}: {message}")]
    Parse {
        /// 1-based line number (0 when the error is not tied to a line).
        line: usize,
        /// What went wrong.
        message: String,
    },

    /// Invalid run configuration (unknown algorithm, bad time limit, bad `k`...).
    #[error("configuration error: {0}")]
    Config(String),

    /// A node index outside `0..n` reached the distance model.
    #[error("node index out of range: ({i}, {j}) with n = {n}")]
    Index {
        /// First index.
        i: usize,
        /// Second index.
        j: usize,
        /// Number of nodes.
        n: usize,
    },

    /// A node sequence that is not a permutation of `0..n`.
    #[error("invalid tour: {0}")]
    InvalidTour(String),
}

impl TspError {
    pub(crate) fn parse(line: usize, message: impl Into<String>) -> Self {
        TspError::Parse {
            line,
            message: message.into(),
        }
    }

    pub(crate) fn config(message: impl Into<String>) -> Self {
        TspError::Config(message.into())
    }
}
