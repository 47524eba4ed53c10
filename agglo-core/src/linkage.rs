//! Linkage methods and the inter-cluster distance they induce.
//!
//! Every inter-cluster distance is computed from the original item-level
//! matrix: collect `D[i][j]` for each `i` in the first cluster and `j` in the
//! second, then reduce the collection with the linkage rule.

use std::{fmt, str::FromStr, sync::Arc};

use tracing::warn;

use crate::{
    Result, cluster::Cluster, error::AggloError, labels::Labels, matrix::DistanceMatrix,
};

/// Rule reducing a set of item distances to one inter-cluster distance.
///
/// # Examples
/// ```
/// use agglo_core::Linkage;
///
/// let linkage: Linkage = "complete".parse()?;
/// assert_eq!(linkage, Linkage::Complete);
/// assert!("ward".parse::<Linkage>().is_err());
/// # Ok::<(), agglo_core::AggloError>(())
/// ```
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Linkage {
    /// Minimum item distance.
    Single,
    /// Maximum item distance.
    Complete,
    /// Arithmetic mean of the item distances.
    Average,
    /// Stand-in for an unrecognised tag under [`FallbackPolicy::Legacy`];
    /// every distance reduces to `0.0`.
    Degenerate,
}

impl Linkage {
    /// The three recognised methods, in the order the CLI runs them.
    pub const STANDARD: [Self; 3] = [Self::Single, Self::Complete, Self::Average];

    /// Returns the tag naming this method.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Single => "single",
            Self::Complete => "complete",
            Self::Average => "average",
            Self::Degenerate => "degenerate",
        }
    }

    /// Resolves `tag` under `policy`.
    ///
    /// Unknown tags become [`Linkage::Degenerate`] under
    /// [`FallbackPolicy::Legacy`] and an error under
    /// [`FallbackPolicy::FailFast`].
    ///
    /// # Errors
    /// Returns [`AggloError::UnknownLinkage`] for unknown tags when failing
    /// fast.
    ///
    /// # Examples
    /// ```
    /// use agglo_core::{FallbackPolicy, Linkage};
    ///
    /// assert_eq!(Linkage::resolve("ward", FallbackPolicy::Legacy)?, Linkage::Degenerate);
    /// assert!(Linkage::resolve("ward", FallbackPolicy::FailFast).is_err());
    /// # Ok::<(), agglo_core::AggloError>(())
    /// ```
    pub fn resolve(tag: &str, policy: FallbackPolicy) -> Result<Self> {
        match (tag.parse(), policy) {
            (Ok(linkage), _) => Ok(linkage),
            (Err(_), FallbackPolicy::Legacy) => {
                warn!(tag, "unknown linkage method; every distance will be zero");
                Ok(Self::Degenerate)
            }
            (Err(err), FallbackPolicy::FailFast) => Err(err),
        }
    }

    fn reduce(self, distances: impl Iterator<Item = f64>) -> Option<f64> {
        match self {
            Self::Single => distances.reduce(f64::min),
            Self::Complete => distances.reduce(f64::max),
            Self::Average => {
                let (sum, count) = distances.fold((0.0, 0_usize), |(sum, count), value| {
                    (sum + value, count + 1)
                });
                (count > 0).then(|| sum / count as f64)
            }
            Self::Degenerate => Some(0.0),
        }
    }
}

impl fmt::Display for Linkage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Linkage {
    type Err = AggloError;

    fn from_str(tag: &str) -> Result<Self> {
        match tag {
            "single" => Ok(Self::Single),
            "complete" => Ok(Self::Complete),
            "average" => Ok(Self::Average),
            other => Err(AggloError::UnknownLinkage {
                tag: Arc::from(other),
            }),
        }
    }
}

/// How the engine treats inputs that have no meaningful answer.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum FallbackPolicy {
    /// Substitute a safe default and continue: unknown linkage tags reduce
    /// to zero, empty pair sets yield `0.0` and empty matrices produce a
    /// single terminal record.
    #[default]
    Legacy,
    /// Report those situations as errors.
    FailFast,
}

/// Computes the distance between two clusters under `linkage`.
///
/// Pairs with `i == j` are skipped. When no pair remains, which only happens
/// if a cluster is empty, the result is `0.0`.
///
/// # Examples
/// ```
/// use agglo_core::{Cluster, DistanceMatrix, Linkage, inter_cluster_distance};
///
/// let matrix = DistanceMatrix::try_from_rows(vec![
///     vec![0.0, 2.0, 5.0],
///     vec![2.0, 0.0, 4.0],
///     vec![5.0, 4.0, 0.0],
/// ])?;
/// let ab = Cluster::singleton(0).merge(&Cluster::singleton(1), 3);
/// let c = Cluster::singleton(2);
/// assert_eq!(inter_cluster_distance(&c, &ab, &matrix, Linkage::Single), 4.0);
/// assert_eq!(inter_cluster_distance(&c, &ab, &matrix, Linkage::Complete), 5.0);
/// assert_eq!(inter_cluster_distance(&c, &ab, &matrix, Linkage::Average), 4.5);
/// # Ok::<(), agglo_core::MatrixError>(())
/// ```
#[must_use]
pub fn inter_cluster_distance(
    left: &Cluster,
    right: &Cluster,
    matrix: &DistanceMatrix,
    linkage: Linkage,
) -> f64 {
    linkage.reduce(pair_distances(left, right, matrix)).unwrap_or(0.0)
}

/// Computes the distance between two clusters, reporting an empty pair set
/// instead of falling back to `0.0`.
///
/// # Errors
/// Returns [`AggloError::EmptyPairSet`] when no distinct item pair exists.
pub fn try_inter_cluster_distance(
    left: &Cluster,
    right: &Cluster,
    matrix: &DistanceMatrix,
    linkage: Linkage,
    labels: &Labels,
) -> Result<f64> {
    let mut distances = pair_distances(left, right, matrix).peekable();
    if distances.peek().is_none() {
        return Err(AggloError::EmptyPairSet {
            left: Arc::from(left.name(labels)),
            right: Arc::from(right.name(labels)),
        });
    }
    Ok(linkage.reduce(distances).unwrap_or(0.0))
}

fn pair_distances<'a>(
    left: &'a Cluster,
    right: &'a Cluster,
    matrix: &'a DistanceMatrix,
) -> impl Iterator<Item = f64> + 'a {
    debug_assert!(left.is_disjoint(right), "clusters must be disjoint");
    left.members().iter().flat_map(move |&i| {
        right
            .members()
            .iter()
            .filter(move |&&j| i != j)
            .map(move |&j| matrix.at(i, j))
    })
}
