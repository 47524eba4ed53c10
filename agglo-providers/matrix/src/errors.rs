use agglo_core::AggloError;
use thiserror::Error;

/// Failures while loading a distance matrix.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum MatrixProviderError {
    #[error("failed to read distance matrix: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid row labels: {0}")]
    Labels(#[from] AggloError),
}

impl MatrixProviderError {
    /// Returns a stable code for structured logging.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Io(_) => "MATRIX_PROVIDER_IO",
            Self::Labels(err) => err.code().as_str(),
        }
    }
}
