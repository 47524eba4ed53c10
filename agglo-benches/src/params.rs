//! Benchmark parameter types.

use std::fmt;

use agglo_core::Linkage;

/// Parameters for one clustering benchmark run.
#[derive(Clone, Debug)]
pub struct RunBenchParams {
    /// Number of items in the matrix.
    pub item_count: usize,
    /// Linkage method under test.
    pub linkage: Linkage,
}

impl fmt::Display for RunBenchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n={},linkage={}", self.item_count, self.linkage)
    }
}
