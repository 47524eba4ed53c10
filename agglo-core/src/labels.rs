//! Display labels for the items of one clustering run.

use std::{collections::HashSet, sync::Arc};

use crate::{Result, error::AggloError};

/// Ordered, distinct display labels; label `i` names item `i`.
///
/// Labels belong to a run's configuration and are passed to the engine
/// explicitly.
///
/// # Examples
/// ```
/// use agglo_core::Labels;
///
/// let labels = Labels::alphabetic(3);
/// assert_eq!(labels.get(2), Some("C"));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Labels {
    names: Vec<Arc<str>>,
}

impl Labels {
    /// Generates `count` labels `A`, `B`, …, `Z`, `AA`, `AB`, ….
    #[must_use]
    pub fn alphabetic(count: usize) -> Self {
        Self {
            names: (0..count).map(|index| Arc::from(column_name(index))).collect(),
        }
    }

    /// Builds labels from caller-supplied names.
    ///
    /// # Errors
    /// Returns [`AggloError::DuplicateLabel`] when a name repeats.
    pub fn try_new<I, S>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<Arc<str>>,
    {
        let names: Vec<Arc<str>> = names.into_iter().map(Into::into).collect();
        let mut seen = HashSet::with_capacity(names.len());
        for name in &names {
            if !seen.insert(Arc::clone(name)) {
                return Err(AggloError::DuplicateLabel {
                    label: Arc::clone(name),
                });
            }
        }
        Ok(Self { names })
    }

    /// Returns the number of labels.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Returns whether there are no labels.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Returns the label of item `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(AsRef::as_ref)
    }

    /// Iterates over the labels in item order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(AsRef::as_ref)
    }
}

// Bijective base-26: 0 -> A, 25 -> Z, 26 -> AA.
fn column_name(index: usize) -> String {
    let mut letters = Vec::new();
    let mut remaining = index + 1;
    while remaining > 0 {
        remaining -= 1;
        letters.push(char::from(b'A' + (remaining % 26) as u8));
        remaining /= 26;
    }
    letters.iter().rev().collect()
}
