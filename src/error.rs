//! Error taxonomy shared by all pipeline stages.
//!
//! Every component validates its own preconditions and fails fast with a
//! specific kind instead of letting NaN/Inf propagate through the numeric
//! code. Failures are never caught and masked by another stage; the caller
//! decides whether to abort or substitute a documented fallback.

use thiserror::Error;

/// Failure kinds surfaced by the tamper-analysis pipeline.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TamperError {
    /// Channel layout outside the supported {1, 3, 4} set.
    #[error("unsupported channel layout: {channels} channels")]
    UnsupportedFormat { channels: usize },

    /// Matrix or grid input whose shape violates an operation's contract.
    #[error("invalid dimensions: {0}")]
    InvalidDimensions(String),

    /// Original/tampered grids of different size; grids are never resized.
    #[error("grid dimensions {actual:?} do not match {expected:?} (w, h, channels)")]
    DimensionMismatch {
        expected: (usize, usize, usize),
        actual: (usize, usize, usize),
    },

    /// Gauss-Jordan pivot below tolerance at the given pivot column.
    #[error("singular system: pivot column {pivot} has no usable pivot")]
    SingularSystem { pivot: usize },

    /// Jacobi sweeps exhausted before the off-diagonal norm fell below
    /// tolerance.
    #[error("SVD did not converge within {sweeps} Jacobi sweeps")]
    ConvergenceFailure { sweeps: usize },
}

pub type Result<T> = std::result::Result<T, TamperError>;
