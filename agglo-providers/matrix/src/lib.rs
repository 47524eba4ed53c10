//! Lower-triangle text provider producing a [`agglo_core::DistanceMatrix`].
//!
//! Each non-blank line holds one item: a leading label token followed by the
//! item's distances to every earlier item and to itself.

mod errors;
mod parse;
mod provider;

pub use errors::MatrixProviderError;
pub use provider::{MatrixProvider, RowLabels};

#[cfg(test)]
mod tests;
