//! Checks for the structural invariants every trace record must satisfy.

use thiserror::Error;

/// A violated trace invariant.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum InvariantViolation {
    /// A cluster had no members.
    #[error("cluster {cluster} is empty")]
    EmptyCluster {
        /// Position of the empty cluster.
        cluster: usize,
    },
    /// An item appeared in more than one cluster.
    #[error("item {item} appears in more than one cluster")]
    Duplicated {
        /// The repeated item.
        item: usize,
    },
    /// An item index was outside `0..items`.
    #[error("item {item} is out of range for {items} items")]
    OutOfRange {
        /// The offending item.
        item: usize,
        /// Number of items in the run.
        items: usize,
    },
    /// An item was not covered by any cluster.
    #[error("item {item} is not covered by the partition")]
    Missing {
        /// The uncovered item.
        item: usize,
    },
    /// The matrix was not square.
    #[error("matrix row {row} has {len} entries, expected {expected}")]
    NotSquare {
        /// Offending row.
        row: usize,
        /// Entries in the row.
        len: usize,
        /// Expected entries.
        expected: usize,
    },
    /// A diagonal entry carried a value.
    #[error("diagonal entry {index} must be not applicable")]
    DiagonalValue {
        /// Offending diagonal index.
        index: usize,
    },
    /// An off-diagonal entry was missing or disagreed with its mirror.
    #[error("entries ({row}, {col}) and ({col}, {row}) differ")]
    Asymmetric {
        /// Row of the entry.
        row: usize,
        /// Column of the entry.
        col: usize,
    },
}

/// Checks that `partition` covers `0..items` exactly once with non-empty
/// clusters.
///
/// # Errors
/// Returns the first [`InvariantViolation`] found.
///
/// # Examples
/// ```
/// use agglo_test_support::invariants::check_partition;
///
/// assert!(check_partition(&[vec![2], vec![0, 1]], 3).is_ok());
/// assert!(check_partition(&[vec![0], vec![0, 1]], 2).is_err());
/// ```
pub fn check_partition(partition: &[Vec<usize>], items: usize) -> Result<(), InvariantViolation> {
    let mut seen = vec![false; items];
    for (cluster, members) in partition.iter().enumerate() {
        if members.is_empty() {
            return Err(InvariantViolation::EmptyCluster { cluster });
        }
        for &item in members {
            let slot = seen
                .get_mut(item)
                .ok_or(InvariantViolation::OutOfRange { item, items })?;
            if *slot {
                return Err(InvariantViolation::Duplicated { item });
            }
            *slot = true;
        }
    }
    match seen.iter().position(|covered| !covered) {
        Some(item) => Err(InvariantViolation::Missing { item }),
        None => Ok(()),
    }
}

/// Checks that `rows` form a square symmetric matrix whose diagonal is not
/// applicable (`None`) and whose other entries are present.
///
/// # Errors
/// Returns the first [`InvariantViolation`] found.
pub fn check_working_rows(rows: &[Vec<Option<f64>>]) -> Result<(), InvariantViolation> {
    let size = rows.len();
    for (row, cells) in rows.iter().enumerate() {
        if cells.len() != size {
            return Err(InvariantViolation::NotSquare {
                row,
                len: cells.len(),
                expected: size,
            });
        }
    }
    for row in 0..size {
        if rows[row][row].is_some() {
            return Err(InvariantViolation::DiagonalValue { index: row });
        }
        for col in 0..row {
            let forward = rows[row][col];
            if forward.is_none() || forward != rows[col][row] {
                return Err(InvariantViolation::Asymmetric { row, col });
            }
        }
    }
    Ok(())
}
