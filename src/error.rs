//! Error and result types.

use std::io;

use ndarray::ShapeError;
use thiserror::Error;

/// `Result` type alias for operations that can fail.
pub type Result<T> = ::std::result::Result<T, Error>;

/// Errors in reading, projecting, or writing embeddings.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The input ended before a field could be read completely.
    #[error("Truncated input: {0}")]
    Truncated(String),

    /// Invalid file format.
    #[error("Invalid file format: {0}")]
    Format(String),

    /// Error reading input.
    #[error("{desc}: {error}")]
    Read {
        desc: String,
        #[source]
        error: io::Error,
    },

    /// Error writing output.
    #[error("{desc}: {error}")]
    Write {
        desc: String,
        #[source]
        error: io::Error,
    },

    /// `ndarray` shape error.
    #[error(transparent)]
    Shape(#[from] ShapeError),

    /// Tokens and matrix rows do not line up.
    #[error("Number of tokens ({tokens}) does not match number of rows ({rows})")]
    RowMismatch { tokens: usize, rows: usize },

    /// Invalid configuration or parameter.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl Error {
    pub fn read_error(desc: impl Into<String>, error: io::Error) -> Self {
        Error::Read {
            desc: desc.into(),
            error,
        }
    }

    pub fn write_error(desc: impl Into<String>, error: io::Error) -> Self {
        Error::Write {
            desc: desc.into(),
            error,
        }
    }

    /// Returns `true` if the error was caused by premature end of input.
    pub fn is_truncated(&self) -> bool {
        matches!(self, Error::Truncated(_))
    }
}
