//! Benchmark setup error type.
//!
//! Lets setup functions propagate failures with `?` instead of using
//! `.expect()`.

use agglo_core::{AggloError, MatrixError};

use crate::source::SyntheticError;

/// Errors that may occur during benchmark setup.
#[derive(Debug, thiserror::Error)]
pub enum BenchSetupError {
    /// Synthetic configuration was rejected.
    #[error("synthetic matrix generation failed: {0}")]
    Synthetic(#[from] SyntheticError),
    /// The generated rows did not form a valid distance matrix.
    #[error("generated matrix is invalid: {0}")]
    Matrix(#[from] MatrixError),
    /// Builder validation or a clustering run failed.
    #[error("clustering failed: {0}")]
    Core(#[from] AggloError),
}
