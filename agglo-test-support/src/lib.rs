//! Shared test utilities used across agglo crates.
//!
//! The helpers deliberately avoid depending on `agglo-core` so the core crate
//! can use them from its own unit tests: fixtures are plain lower-triangle
//! rows and the invariant checks work on partitions and matrix rows.

pub mod fixtures;
pub mod invariants;
pub mod tracing;
