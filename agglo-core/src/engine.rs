//! Greedy nearest-pair merge loop.
//!
//! A run starts with one singleton cluster per item. While more than one
//! cluster remains, every unordered pair of clusters is scanned in ascending
//! index order, the pair with the strictly smallest linkage distance is merged
//! (the first such pair wins ties), and the working matrix is rebuilt from the
//! original item distances for the new partition. Each step yields one
//! [`TraceRecord`].

use tracing::{debug, info, instrument};

use crate::{
    Result,
    builder::AgglomeratorBuilder,
    cluster::Cluster,
    error::AggloError,
    labels::Labels,
    linkage::{FallbackPolicy, Linkage, inter_cluster_distance, try_inter_cluster_distance},
    matrix::{DistanceMatrix, WorkingMatrix},
    trace::{MergeEvent, Trace, TraceRecord},
};

/// Entry point for running agglomerative clustering.
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
/// let agglomerator = AgglomeratorBuilder::new()
///     .with_linkage(Linkage::Single)
///     .build()?;
/// let trace = agglomerator.run(&matrix, &Labels::alphabetic(3))?;
/// assert_eq!(trace.records().len(), 3);
/// assert_eq!(trace.final_record().map(|r| r.cluster_names()), Some(vec!["ABC".to_owned()]));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Agglomerator {
    linkage: Linkage,
    fallback_policy: FallbackPolicy,
}

impl Agglomerator {
    pub(crate) fn new(linkage: Linkage, fallback_policy: FallbackPolicy) -> Self {
        Self {
            linkage,
            fallback_policy,
        }
    }

    /// Returns the linkage method.
    #[must_use]
    pub fn linkage(&self) -> Linkage {
        self.linkage
    }

    /// Returns the fallback policy.
    #[must_use]
    pub fn fallback_policy(&self) -> FallbackPolicy {
        self.fallback_policy
    }

    /// Builds the initial clustering state for `matrix` and `labels`.
    ///
    /// # Errors
    /// Returns [`AggloError::LabelCountMismatch`] when `labels` does not name
    /// every item, and [`AggloError::EmptyMatrix`] for an empty matrix under
    /// [`FallbackPolicy::FailFast`].
    pub fn start<'a>(
        &self,
        matrix: &'a DistanceMatrix,
        labels: &'a Labels,
    ) -> Result<ClusteringState<'a>> {
        if labels.len() != matrix.len() {
            return Err(AggloError::LabelCountMismatch {
                labels: labels.len(),
                items: matrix.len(),
            });
        }
        if matrix.is_empty() && self.fallback_policy == FallbackPolicy::FailFast {
            return Err(AggloError::EmptyMatrix);
        }
        ClusteringState::new(Reducer {
            matrix,
            labels,
            linkage: self.linkage,
            policy: self.fallback_policy,
        })
    }

    /// Runs the merge loop to completion and returns every record.
    ///
    /// The trace holds `n` records for `n >= 1` items (the initial state plus
    /// `n - 1` merges) and a single terminal record when there are no items.
    ///
    /// # Errors
    /// Propagates the errors of [`Self::start`] and, under
    /// [`FallbackPolicy::FailFast`], [`AggloError::EmptyPairSet`].
    #[instrument(
        name = "core.run",
        err,
        skip(self, matrix, labels),
        fields(
            linkage = %self.linkage,
            items = matrix.len(),
            policy = ?self.fallback_policy
        ),
    )]
    pub fn run(&self, matrix: &DistanceMatrix, labels: &Labels) -> Result<Trace> {
        let mut state = self.start(matrix, labels)?;
        let mut records = Vec::with_capacity(matrix.len().max(1));
        records.push(state.snapshot());
        while let Some(record) = state.advance()? {
            records.push(record);
        }
        info!(merges = records.len() - 1, "clustering complete");
        Ok(Trace {
            linkage: self.linkage,
            item_count: matrix.len(),
            records,
        })
    }
}

/// Runs each linkage in `linkages` over the same matrix and labels.
///
/// With the `parallel` feature each method runs as its own rayon task. Traces
/// are returned in the order of `linkages`.
///
/// # Errors
/// Returns the first error produced by any run.
///
/// # Examples
/// ```
/// use agglo_core::{DistanceMatrix, FallbackPolicy, Labels, Linkage, run_linkages};
///
/// let matrix = DistanceMatrix::try_from_rows(vec![
///     vec![0.0, 2.0, 5.0],
///     vec![2.0, 0.0, 4.0],
///     vec![5.0, 4.0, 0.0],
/// ])?;
/// let traces = run_linkages(
///     &Linkage::STANDARD,
///     FallbackPolicy::Legacy,
///     &matrix,
///     &Labels::alphabetic(3),
/// )?;
/// let last: Vec<f64> = traces
///     .iter()
///     .filter_map(|trace| trace.merges().last().map(|merge| merge.distance))
///     .collect();
/// assert_eq!(last, [4.0, 5.0, 4.5]);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn run_linkages(
    linkages: &[Linkage],
    policy: FallbackPolicy,
    matrix: &DistanceMatrix,
    labels: &Labels,
) -> Result<Vec<Trace>> {
    run_each(linkages, |linkage| {
        AgglomeratorBuilder::new()
            .with_linkage(*linkage)
            .with_fallback_policy(policy)
            .build()?
            .run(matrix, labels)
    })
}

#[cfg(feature = "parallel")]
fn run_each<F>(linkages: &[Linkage], run_one: F) -> Result<Vec<Trace>>
where
    F: Fn(&Linkage) -> Result<Trace> + Sync + Send,
{
    use rayon::prelude::*;

    linkages.par_iter().map(run_one).collect()
}

#[cfg(not(feature = "parallel"))]
fn run_each<F>(linkages: &[Linkage], run_one: F) -> Result<Vec<Trace>>
where
    F: Fn(&Linkage) -> Result<Trace>,
{
    linkages.iter().map(run_one).collect()
}

/// Whether the merge loop can continue.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Phase {
    /// At least two clusters remain.
    Active,
    /// At most one cluster remains.
    Done,
}

/// The pair chosen by a nearest-pair scan, as positions in the partition.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NearestPair {
    /// Position of the first cluster; always less than `right`.
    pub left: usize,
    /// Position of the second cluster.
    pub right: usize,
    /// Linkage distance between the two clusters.
    pub distance: f64,
}

#[derive(Clone, Copy)]
struct Reducer<'a> {
    matrix: &'a DistanceMatrix,
    labels: &'a Labels,
    linkage: Linkage,
    policy: FallbackPolicy,
}

impl Reducer<'_> {
    fn distance(&self, left: &Cluster, right: &Cluster) -> Result<f64> {
        match self.policy {
            FallbackPolicy::Legacy => Ok(inter_cluster_distance(
                left,
                right,
                self.matrix,
                self.linkage,
            )),
            FallbackPolicy::FailFast => {
                try_inter_cluster_distance(left, right, self.matrix, self.linkage, self.labels)
            }
        }
    }

    fn working_matrix(&self, clusters: &[Cluster]) -> Result<WorkingMatrix> {
        WorkingMatrix::build(clusters.len(), |i, j| {
            self.distance(&clusters[j], &clusters[i])
        })
    }
}

/// Mutable state of one run: the current partition and its working matrix.
///
/// The original matrix and the labels are borrowed for the whole run and
/// never modified.
pub struct ClusteringState<'a> {
    reducer: Reducer<'a>,
    clusters: Vec<Cluster>,
    working: WorkingMatrix,
    step: usize,
    next_id: usize,
}

impl<'a> ClusteringState<'a> {
    fn new(reducer: Reducer<'a>) -> Result<Self> {
        let items = reducer.matrix.len();
        let clusters: Vec<Cluster> = (0..items).map(Cluster::singleton).collect();
        let working = reducer.working_matrix(&clusters)?;
        Ok(Self {
            reducer,
            clusters,
            working,
            step: 0,
            next_id: items,
        })
    }

    /// Returns [`Phase::Done`] once at most one cluster remains.
    #[must_use]
    pub fn phase(&self) -> Phase {
        if self.clusters.len() > 1 {
            Phase::Active
        } else {
            Phase::Done
        }
    }

    /// Returns the index of the current step.
    #[must_use]
    pub fn step(&self) -> usize {
        self.step
    }

    /// Returns the current partition.
    #[must_use]
    pub fn clusters(&self) -> &[Cluster] {
        &self.clusters
    }

    /// Returns the working matrix of the current partition.
    #[must_use]
    pub fn working_matrix(&self) -> &WorkingMatrix {
        &self.working
    }

    /// Captures the current state without merge information.
    ///
    /// Used for the step-0 record; records returned by [`Self::advance`]
    /// carry the merge that produced them.
    #[must_use]
    pub fn snapshot(&self) -> TraceRecord {
        self.record(None)
    }

    /// Finds the closest pair of clusters, or `None` when fewer than two
    /// clusters remain.
    ///
    /// Distances are computed from the original matrix. Pairs are scanned
    /// in ascending `(left, right)` order and only a strictly smaller
    /// distance replaces the current best.
    ///
    /// # Errors
    /// Returns [`AggloError::EmptyPairSet`] under
    /// [`FallbackPolicy::FailFast`] when a pair has no item distances.
    pub fn nearest_pair(&self) -> Result<Option<NearestPair>> {
        let mut best: Option<NearestPair> = None;
        for (left, first) in self.clusters.iter().enumerate() {
            for (offset, second) in self.clusters.iter().skip(left + 1).enumerate() {
                let distance = self.reducer.distance(first, second)?;
                if best.is_none_or(|current| distance < current.distance) {
                    best = Some(NearestPair {
                        left,
                        right: left + 1 + offset,
                        distance,
                    });
                }
            }
        }
        Ok(best)
    }

    /// Performs one merge and returns its record, or `None` once the run is
    /// done.
    ///
    /// The merged cluster is appended after the surviving clusters, which
    /// keep their relative order. On error the state is left unchanged.
    ///
    /// # Errors
    /// Returns [`AggloError::EmptyPairSet`] under
    /// [`FallbackPolicy::FailFast`] when a pair has no item distances.
    pub fn advance(&mut self) -> Result<Option<TraceRecord>> {
        if self.phase() == Phase::Done {
            return Ok(None);
        }
        let Some(pair) = self.nearest_pair()? else {
            return Ok(None);
        };

        let left = &self.clusters[pair.left];
        let right = &self.clusters[pair.right];
        let merged = left.merge(right, self.next_id);
        let event = MergeEvent {
            left: left.name(self.reducer.labels),
            right: right.name(self.reducer.labels),
            left_id: left.id(),
            right_id: right.id(),
            merged_id: merged.id(),
            distance: pair.distance,
            size: merged.len(),
        };

        let mut clusters: Vec<Cluster> = self
            .clusters
            .iter()
            .enumerate()
            .filter(|&(index, _)| index != pair.left && index != pair.right)
            .map(|(_, cluster)| cluster.clone())
            .collect();
        clusters.push(merged);
        let working = self.reducer.working_matrix(&clusters)?;

        self.clusters = clusters;
        self.working = working;
        self.step += 1;
        self.next_id += 1;

        debug!(
            step = self.step,
            left = %event.left,
            right = %event.right,
            distance = event.distance,
            "merged clusters"
        );
        Ok(Some(self.record(Some(event))))
    }

    fn record(&self, merge: Option<MergeEvent>) -> TraceRecord {
        TraceRecord {
            step: self.step,
            clusters: self.clusters.clone(),
            partition: self
                .clusters
                .iter()
                .map(|cluster| cluster.labels(self.reducer.labels))
                .collect(),
            matrix: self.working.clone(),
            merge,
            terminal: self.phase() == Phase::Done,
        }
    }
}
