//! Clusters of item indices.

use crate::labels::Labels;

/// A non-empty set of items with a node id.
///
/// Singletons take the id of their item; the cluster produced by the `k`-th
/// merge (counting from zero) takes id `n + k` for `n` items. Members are
/// kept in ascending order so label concatenation is deterministic.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Cluster {
    id: usize,
    members: Vec<usize>,
}

impl Cluster {
    /// Creates the singleton cluster for `item`.
    ///
    /// # Examples
    /// ```
    /// use agglo_core::Cluster;
    ///
    /// let cluster = Cluster::singleton(4);
    /// assert_eq!(cluster.id(), 4);
    /// assert_eq!(cluster.members(), &[4]);
    /// ```
    #[must_use]
    pub fn singleton(item: usize) -> Self {
        Self {
            id: item,
            members: vec![item],
        }
    }

    /// Returns a fresh cluster holding the union of `self` and `other`.
    ///
    /// # Examples
    /// ```
    /// use agglo_core::Cluster;
    ///
    /// let merged = Cluster::singleton(2).merge(&Cluster::singleton(0), 3);
    /// assert_eq!(merged.id(), 3);
    /// assert_eq!(merged.members(), &[0, 2]);
    /// ```
    #[must_use]
    pub fn merge(&self, other: &Self, id: usize) -> Self {
        let mut members = [self.members.as_slice(), other.members.as_slice()].concat();
        members.sort_unstable();
        members.dedup();
        Self { id, members }
    }

    #[cfg(test)]
    pub(crate) fn from_parts(id: usize, members: Vec<usize>) -> Self {
        Self { id, members }
    }

    /// Returns the node id.
    #[must_use]
    pub fn id(&self) -> usize {
        self.id
    }

    /// Returns the members in ascending item order.
    #[must_use]
    pub fn members(&self) -> &[usize] {
        &self.members
    }

    /// Returns the number of members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Returns whether the cluster has no members. Always `false` for
    /// clusters produced by the engine.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Returns whether `item` belongs to the cluster.
    #[must_use]
    pub fn contains(&self, item: usize) -> bool {
        self.members.binary_search(&item).is_ok()
    }

    /// Returns whether the two clusters share no item.
    #[must_use]
    pub fn is_disjoint(&self, other: &Self) -> bool {
        self.members.iter().all(|item| !other.contains(*item))
    }

    /// Returns the member labels in ascending item order.
    ///
    /// Items without a label are rendered as `#index`.
    #[must_use]
    pub fn labels(&self, labels: &Labels) -> Vec<String> {
        self.members
            .iter()
            .map(|&item| {
                labels
                    .get(item)
                    .map_or_else(|| format!("#{item}"), ToOwned::to_owned)
            })
            .collect()
    }

    /// Returns the member labels concatenated, e.g. `ABC`.
    #[must_use]
    pub fn name(&self, labels: &Labels) -> String {
        self.labels(labels).concat()
    }
}
