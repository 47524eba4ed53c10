//! Distance tables used by the clustering engine.
//!
//! [`DistanceMatrix`] holds the ground-truth item distances and is never
//! written to once constructed. [`WorkingMatrix`] is the per-step table of
//! inter-cluster distances; it is rebuilt from the original matrix after every
//! merge and carries `+∞` on its diagonal to mark self-distances as not
//! applicable.

use tracing::warn;

use crate::error::MatrixError;

/// Immutable symmetric table of pairwise item distances with a zero diagonal.
///
/// # Examples
/// ```
/// use agglo_core::DistanceMatrix;
///
/// let matrix = DistanceMatrix::try_from_rows(vec![
///     vec![0.0, 2.0, 5.0],
///     vec![2.0, 0.0, 4.0],
///     vec![5.0, 4.0, 0.0],
/// ])?;
/// assert_eq!(matrix.len(), 3);
/// assert_eq!(matrix.get(2, 1), Some(4.0));
/// # Ok::<(), agglo_core::MatrixError>(())
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct DistanceMatrix {
    size: usize,
    values: Vec<f64>,
}

impl DistanceMatrix {
    /// Returns a matrix with no items.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            size: 0,
            values: Vec::new(),
        }
    }

    /// Builds a matrix from full rows, validating every invariant.
    ///
    /// # Errors
    /// Returns [`MatrixError::NotSquare`] when a row length differs from the
    /// row count, [`MatrixError::NonFinite`] or [`MatrixError::Negative`] for
    /// invalid cells, [`MatrixError::NonZeroDiagonal`] when a self-distance is
    /// not zero and [`MatrixError::Asymmetric`] when `D[i][j] != D[j][i]`.
    pub fn try_from_rows(rows: Vec<Vec<f64>>) -> Result<Self, MatrixError> {
        let size = rows.len();
        let mut values = Vec::with_capacity(size * size);
        for (row, cells) in rows.into_iter().enumerate() {
            if cells.len() != size {
                return Err(MatrixError::NotSquare {
                    row,
                    len: cells.len(),
                    expected: size,
                });
            }
            for (col, value) in cells.into_iter().enumerate() {
                if !value.is_finite() {
                    return Err(MatrixError::NonFinite { row, col, value });
                }
                if value < 0.0 {
                    return Err(MatrixError::Negative { row, col, value });
                }
                if row == col && value != 0.0 {
                    return Err(MatrixError::NonZeroDiagonal { index: row, value });
                }
                values.push(value);
            }
        }

        let matrix = Self { size, values };
        matrix.check_symmetry()?;
        Ok(matrix)
    }

    /// Builds a matrix by mirroring a lower triangle, substituting `0.0` for
    /// anything unusable.
    ///
    /// Row `i` contributes its first `i` entries as `D[i][0..i]`. Missing
    /// entries become `0.0`, entries past the diagonal are ignored and the
    /// diagonal is always zero. Negative or non-finite cells are replaced by
    /// `0.0`. The second element of the returned tuple counts the
    /// replacements.
    ///
    /// # Examples
    /// ```
    /// use agglo_core::DistanceMatrix;
    ///
    /// let (matrix, substituted) = DistanceMatrix::from_lower_triangle(&[
    ///     vec![0.0],
    ///     vec![2.0, 0.0],
    ///     vec![5.0, -4.0],
    /// ]);
    /// assert_eq!(matrix.get(0, 1), Some(2.0));
    /// assert_eq!(matrix.get(1, 2), Some(0.0));
    /// assert_eq!(substituted, 1);
    /// ```
    #[must_use]
    pub fn from_lower_triangle(rows: &[Vec<f64>]) -> (Self, usize) {
        let size = rows.len();
        let mut values = vec![0.0; size * size];
        let mut substituted = 0;
        for (row, cells) in rows.iter().enumerate() {
            for col in 0..row {
                let raw = cells.get(col).copied().unwrap_or(0.0);
                let value = if raw.is_finite() && raw >= 0.0 {
                    raw
                } else {
                    warn!(row, col, value = raw, "substituting 0.0 for invalid distance");
                    substituted += 1;
                    0.0
                };
                values[row * size + col] = value;
                values[col * size + row] = value;
            }
        }
        (Self { size, values }, substituted)
    }

    /// Returns the number of items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.size
    }

    /// Returns whether the matrix has no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Returns the distance between items `i` and `j`, or `None` when either
    /// index is out of range.
    #[must_use]
    pub fn get(&self, i: usize, j: usize) -> Option<f64> {
        if i >= self.size || j >= self.size {
            return None;
        }
        self.values.get(i * self.size + j).copied()
    }

    /// Returns row `i` as a slice.
    #[must_use]
    pub fn row(&self, i: usize) -> Option<&[f64]> {
        let start = i.checked_mul(self.size)?;
        self.values.get(start..start + self.size)
    }

    pub(crate) fn at(&self, i: usize, j: usize) -> f64 {
        self.values[i * self.size + j]
    }

    fn check_symmetry(&self) -> Result<(), MatrixError> {
        for row in 0..self.size {
            for col in (row + 1)..self.size {
                let forward = self.at(row, col);
                let backward = self.at(col, row);
                if forward != backward {
                    return Err(MatrixError::Asymmetric {
                        row,
                        col,
                        forward,
                        backward,
                    });
                }
            }
        }
        Ok(())
    }
}

/// Inter-cluster distances for one partition.
///
/// Off-diagonal entries are linkage distances between the clusters at the
/// corresponding positions of the partition; diagonal entries are `+∞` and
/// read back as `None`.
#[derive(Clone, Debug, PartialEq)]
pub struct WorkingMatrix {
    size: usize,
    values: Vec<f64>,
}

impl WorkingMatrix {
    /// Builds a `size`×`size` matrix whose off-diagonal entries are produced
    /// by `distance(i, j)` for `i > j` and mirrored.
    pub(crate) fn build<E>(
        size: usize,
        mut distance: impl FnMut(usize, usize) -> Result<f64, E>,
    ) -> Result<Self, E> {
        let mut values = vec![f64::INFINITY; size * size];
        for i in 0..size {
            for j in 0..i {
                let value = distance(i, j)?;
                values[i * size + j] = value;
                values[j * size + i] = value;
            }
        }
        Ok(Self { size, values })
    }

    /// Returns the number of clusters the matrix describes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.size
    }

    /// Returns whether the matrix describes no clusters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Returns the distance between clusters `i` and `j`.
    ///
    /// `None` is returned on the diagonal and for out-of-range indices.
    #[must_use]
    pub fn get(&self, i: usize, j: usize) -> Option<f64> {
        if i == j || i >= self.size || j >= self.size {
            return None;
        }
        self.values.get(i * self.size + j).copied()
    }

    /// Returns the raw entry at `(i, j)`, with `+∞` on the diagonal.
    #[must_use]
    pub fn raw(&self, i: usize, j: usize) -> Option<f64> {
        if i >= self.size || j >= self.size {
            return None;
        }
        self.values.get(i * self.size + j).copied()
    }

    /// Iterates over the rows, mapping the diagonal to `None`.
    pub fn rows(&self) -> impl Iterator<Item = Vec<Option<f64>>> + '_ {
        (0..self.size).map(move |i| (0..self.size).map(|j| self.get(i, j)).collect())
    }

    /// Returns whether the matrix is symmetric with an infinite diagonal.
    #[must_use]
    pub fn is_symmetric(&self) -> bool {
        (0..self.size).all(|i| {
            self.values[i * self.size + i] == f64::INFINITY
                && (0..i).all(|j| self.values[i * self.size + j] == self.values[j * self.size + i])
        })
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for WorkingMatrix {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeSeq;

        let mut seq = serializer.serialize_seq(Some(self.size))?;
        for row in self.rows() {
            seq.serialize_element(&row)?;
        }
        seq.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    fn scenario_rows() -> Vec<Vec<f64>> {
        vec![
            vec![0.0, 2.0, 5.0],
            vec![2.0, 0.0, 4.0],
            vec![5.0, 4.0, 0.0],
        ]
    }

    #[test]
    fn accepts_valid_rows() {
        let matrix = DistanceMatrix::try_from_rows(scenario_rows()).expect("matrix is valid");
        assert_eq!(matrix.len(), 3);
        assert_eq!(matrix.get(0, 2), Some(5.0));
        assert_eq!(matrix.get(3, 0), None);
        assert_eq!(matrix.row(1), Some(&[2.0, 0.0, 4.0][..]));
    }

    #[rstest]
    #[case::ragged(vec![vec![0.0, 1.0], vec![1.0]], "MATRIX_NOT_SQUARE")]
    #[case::asymmetric(vec![vec![0.0, 1.0], vec![2.0, 0.0]], "MATRIX_ASYMMETRIC")]
    #[case::diagonal(vec![vec![1.0, 1.0], vec![1.0, 0.0]], "MATRIX_NON_ZERO_DIAGONAL")]
    #[case::negative(vec![vec![0.0, -1.0], vec![-1.0, 0.0]], "MATRIX_NEGATIVE")]
    #[case::nan(vec![vec![0.0, f64::NAN], vec![f64::NAN, 0.0]], "MATRIX_NON_FINITE")]
    fn rejects_invalid_rows(#[case] rows: Vec<Vec<f64>>, #[case] expected: &str) {
        let err = DistanceMatrix::try_from_rows(rows).expect_err("rows must be rejected");
        assert_eq!(err.code().as_str(), expected);
    }

    #[test]
    fn lower_triangle_pads_and_mirrors() {
        let (matrix, substituted) =
            DistanceMatrix::from_lower_triangle(&[vec![], vec![2.0], vec![5.0, 4.0, 9.0, 9.0]]);
        assert_eq!(substituted, 0);
        assert_eq!(
            matrix,
            DistanceMatrix::try_from_rows(scenario_rows()).expect("matrix is valid")
        );

        let (padded, _) = DistanceMatrix::from_lower_triangle(&[vec![0.0], vec![], vec![1.0]]);
        assert_eq!(padded.get(1, 0), Some(0.0));
        assert_eq!(padded.get(2, 1), Some(0.0));
        assert_eq!(padded.get(0, 2), Some(1.0));
    }

    #[test]
    fn lower_triangle_substitutes_invalid_cells() {
        let (matrix, substituted) = DistanceMatrix::from_lower_triangle(&[
            vec![0.0],
            vec![f64::NAN],
            vec![f64::INFINITY, -3.0],
        ]);
        assert_eq!(substituted, 3);
        assert!((0..3).all(|i| (0..3).all(|j| matrix.get(i, j) == Some(0.0))));
    }

    #[test]
    fn working_matrix_marks_diagonal_not_applicable() {
        let working = WorkingMatrix::build(3, |i, j| Ok::<_, ()>((i + j) as f64))
            .expect("builder is infallible");
        assert!(working.is_symmetric());
        assert_eq!(working.get(1, 1), None);
        assert_eq!(working.raw(1, 1), Some(f64::INFINITY));
        assert_eq!(working.get(2, 0), Some(2.0));
        assert_eq!(working.get(0, 2), Some(2.0));
        let rows: Vec<_> = working.rows().collect();
        assert_eq!(rows[0], vec![None, Some(1.0), Some(2.0)]);
    }

    #[test]
    fn working_matrix_propagates_errors() {
        let err = WorkingMatrix::build(2, |_, _| Err::<f64, _>("boom")).expect_err("must fail");
        assert_eq!(err, "boom");
    }
}
