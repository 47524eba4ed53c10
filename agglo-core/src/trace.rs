//! Step-by-step record of a clustering run.

use crate::{cluster::Cluster, linkage::Linkage, matrix::WorkingMatrix};

/// The merge performed to reach a [`TraceRecord`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct MergeEvent {
    /// Concatenated labels of the cluster found first in the scan.
    pub left: String,
    /// Concatenated labels of the other cluster.
    pub right: String,
    /// Node id of the left cluster.
    pub left_id: usize,
    /// Node id of the right cluster.
    pub right_id: usize,
    /// Node id assigned to the merged cluster.
    pub merged_id: usize,
    /// Linkage distance between the two clusters.
    pub distance: f64,
    /// Number of items in the merged cluster.
    pub size: usize,
}

/// Immutable snapshot of the clustering state after one step.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct TraceRecord {
    pub(crate) step: usize,
    pub(crate) clusters: Vec<Cluster>,
    pub(crate) partition: Vec<Vec<String>>,
    pub(crate) matrix: WorkingMatrix,
    pub(crate) merge: Option<MergeEvent>,
    pub(crate) terminal: bool,
}

impl TraceRecord {
    /// Returns the zero-based step index.
    #[must_use]
    pub fn step(&self) -> usize {
        self.step
    }

    /// Returns the clusters of the partition, surviving clusters first and
    /// the most recent merge last.
    #[must_use]
    pub fn clusters(&self) -> &[Cluster] {
        &self.clusters
    }

    /// Returns the partition as member labels per cluster.
    #[must_use]
    pub fn partition(&self) -> &[Vec<String>] {
        &self.partition
    }

    /// Returns the partition as concatenated cluster names, e.g. `["C", "AB"]`.
    #[must_use]
    pub fn cluster_names(&self) -> Vec<String> {
        self.partition.iter().map(|labels| labels.concat()).collect()
    }

    /// Returns the working matrix for this partition.
    #[must_use]
    pub fn matrix(&self) -> &WorkingMatrix {
        &self.matrix
    }

    /// Returns the merge that produced this record; `None` at step 0.
    #[must_use]
    pub fn merge(&self) -> Option<&MergeEvent> {
        self.merge.as_ref()
    }

    /// Returns whether at most one cluster remains.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.terminal
    }
}

/// One row of a linkage matrix: `[left_id, right_id, distance, size]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinkageRow {
    /// Node id of the left cluster.
    pub left: usize,
    /// Node id of the right cluster.
    pub right: usize,
    /// Merge distance.
    pub distance: f64,
    /// Number of items in the merged cluster.
    pub size: usize,
}

/// Complete history of one run.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Trace {
    pub(crate) linkage: Linkage,
    pub(crate) item_count: usize,
    pub(crate) records: Vec<TraceRecord>,
}

impl Trace {
    /// Returns the linkage method used for the run.
    #[must_use]
    pub fn linkage(&self) -> Linkage {
        self.linkage
    }

    /// Returns the number of original items.
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.item_count
    }

    /// Returns every record, starting with the initial state.
    #[must_use]
    pub fn records(&self) -> &[TraceRecord] {
        &self.records
    }

    /// Returns the terminal record.
    #[must_use]
    pub fn final_record(&self) -> Option<&TraceRecord> {
        self.records.last()
    }

    /// Iterates over the merges in the order they happened.
    pub fn merges(&self) -> impl Iterator<Item = &MergeEvent> {
        self.records.iter().filter_map(TraceRecord::merge)
    }

    /// Returns the merge history as linkage-matrix rows.
    ///
    /// # Examples
    /// ```
    /// use agglo_core::{AgglomeratorBuilder, DistanceMatrix, Labels, Linkage};
    ///
    /// let matrix = DistanceMatrix::try_from_rows(vec![
    ///     vec![0.0, 2.0, 5.0],
    ///     vec![2.0, 0.0, 4.0],
    ///     vec![5.0, 4.0, 0.0],
    /// ])?;
    /// let trace = AgglomeratorBuilder::new()
    ///     .with_linkage(Linkage::Single)
    ///     .build()?
    ///     .run(&matrix, &Labels::alphabetic(3))?;
    /// let rows = trace.linkage_rows();
    /// assert_eq!((rows[0].left, rows[0].right, rows[0].size), (0, 1, 2));
    /// assert_eq!((rows[1].left, rows[1].right, rows[1].distance), (2, 3, 4.0));
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    #[must_use]
    pub fn linkage_rows(&self) -> Vec<LinkageRow> {
        self.merges()
            .map(|merge| LinkageRow {
                left: merge.left_id,
                right: merge.right_id,
                distance: merge.distance,
                size: merge.size,
            })
            .collect()
    }

    /// Returns the record whose partition holds exactly `clusters` clusters.
    #[must_use]
    pub fn partition_with(&self, clusters: usize) -> Option<&TraceRecord> {
        self.records
            .iter()
            .find(|record| record.clusters.len() == clusters)
    }
}
