use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GoldenError {
    /// Rejected before any sampling begins.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Vectors handed to a computation or sink do not have the expected shape.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A malformed artifact. `line` is 1-based.
    #[error("{path}:{line}: {message}")]
    Parse {
        path: String,
        line: usize,
        message: String,
    },
}
