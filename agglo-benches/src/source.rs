//! Synthetic distance matrices for benchmarking.
//!
//! Items are random points in the unit hypercube; the matrix holds their
//! Euclidean distances. Generation is seeded for reproducibility across
//! benchmark runs.

use agglo_core::DistanceMatrix;
use rand::{Rng, SeedableRng, rngs::SmallRng};

use crate::error::BenchSetupError;

/// Errors that may occur during synthetic matrix generation.
#[derive(Clone, Debug, thiserror::Error, PartialEq, Eq)]
pub enum SyntheticError {
    /// The requested dimension count was zero.
    #[error("dimension count must be greater than zero")]
    ZeroDimensions,
}

/// Configuration for synthetic matrix generation.
#[derive(Clone, Debug)]
pub struct SyntheticConfig {
    /// Number of items to generate.
    pub item_count: usize,
    /// Dimensionality of the underlying points.
    pub dimensions: usize,
    /// RNG seed for reproducibility.
    pub seed: u64,
}

/// Generates a Euclidean distance matrix from seeded random points.
///
/// # Errors
///
/// Returns [`BenchSetupError::Synthetic`] if `dimensions` is zero, or
/// [`BenchSetupError::Matrix`] if the generated rows are rejected.
///
/// # Examples
///
/// ```
/// use agglo_benches::source::{SyntheticConfig, synthetic_matrix};
///
/// let config = SyntheticConfig { item_count: 6, dimensions: 3, seed: 7 };
/// let matrix = synthetic_matrix(&config).expect("valid config");
/// assert_eq!(matrix.len(), 6);
/// ```
pub fn synthetic_matrix(config: &SyntheticConfig) -> Result<DistanceMatrix, BenchSetupError> {
    if config.dimensions == 0 {
        return Err(SyntheticError::ZeroDimensions.into());
    }
    let mut rng = SmallRng::seed_from_u64(config.seed);
    let points: Vec<Vec<f64>> = (0..config.item_count)
        .map(|_| {
            (0..config.dimensions)
                .map(|_| rng.gen_range(0.0_f64..1.0_f64))
                .collect()
        })
        .collect();
    let rows: Vec<Vec<f64>> = points
        .iter()
        .map(|left| points.iter().map(|right| euclidean(left, right)).collect())
        .collect();
    Ok(DistanceMatrix::try_from_rows(rows)?)
}

#[expect(
    clippy::float_arithmetic,
    reason = "Euclidean distance requires arithmetic on f64 values"
)]
fn euclidean(left: &[f64], right: &[f64]) -> f64 {
    left.iter()
        .zip(right)
        .fold(0.0_f64, |acc, (a, b)| {
            let diff = a - b;
            acc + diff * diff
        })
        .sqrt()
}
