//! Benchmark support crate for agglo.
//!
//! Provides seeded synthetic distance matrices and parameter types used by
//! the Criterion benchmarks of full clustering runs.

pub mod error;
pub mod params;
pub mod source;
