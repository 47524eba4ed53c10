//! Distance matrix provider loaded from lower-triangle text.
use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

use agglo_core::{DistanceMatrix, Labels};
use tracing::{info, instrument};

use crate::{errors::MatrixProviderError, parse::read_rows};

const SAMPLE: [&[f64]; 7] = [
    &[0.0],
    &[2.15, 0.0],
    &[0.7, 1.53, 0.0],
    &[1.07, 1.14, 0.43, 0.0],
    &[0.85, 1.38, 0.21, 0.29, 0.0],
    &[1.16, 1.01, 0.55, 0.22, 0.41, 0.0],
    &[1.56, 2.83, 1.86, 2.04, 2.02, 2.05, 0.0],
];

/// Where item labels come from.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum RowLabels {
    /// `A`, `B`, … in row order; the leading token of each row is ignored.
    #[default]
    Generated,
    /// The leading token of each row; tokens must be distinct.
    Leading,
}

/// Immutable distance matrix with its item labels.
#[derive(Debug, Clone)]
pub struct MatrixProvider {
    name: String,
    matrix: DistanceMatrix,
    labels: Labels,
    substitutions: usize,
}

impl MatrixProvider {
    /// Loads a lower-triangle matrix from `reader`.
    ///
    /// Blank lines are skipped. Unparseable, negative or non-finite cells
    /// become `0.0`, short rows are padded with `0.0` and tokens past the
    /// diagonal are ignored. An empty input yields an empty provider.
    ///
    /// # Errors
    /// Returns [`MatrixProviderError::Io`] when reading fails and
    /// [`MatrixProviderError::Labels`] when leading labels repeat.
    ///
    /// # Examples
    /// ```
    /// use std::io::Cursor;
    /// use agglo_providers_matrix::{MatrixProvider, RowLabels};
    ///
    /// let text = "x 0\ny 2.5 0\n";
    /// let provider =
    ///     MatrixProvider::try_from_reader("demo", Cursor::new(text), RowLabels::Leading)?;
    /// assert_eq!(provider.len(), 2);
    /// assert_eq!(provider.matrix().get(0, 1), Some(2.5));
    /// assert_eq!(provider.labels().get(1), Some("y"));
    /// # Ok::<(), agglo_providers_matrix::MatrixProviderError>(())
    /// ```
    #[instrument(name = "provider.load", skip(name, reader), err)]
    pub fn try_from_reader<R: BufRead>(
        name: impl Into<String>,
        reader: R,
        row_labels: RowLabels,
    ) -> Result<Self, MatrixProviderError> {
        let parsed = read_rows(reader)?;
        let labels = match row_labels {
            RowLabels::Generated => Labels::alphabetic(parsed.rows.len()),
            RowLabels::Leading => Labels::try_new(parsed.rows.iter().map(|row| row.label.as_str()))?,
        };
        let cells: Vec<Vec<f64>> = parsed.rows.into_iter().map(|row| row.cells).collect();
        let (matrix, invalid) = DistanceMatrix::from_lower_triangle(&cells);
        let provider = Self {
            name: name.into(),
            matrix,
            labels,
            substitutions: parsed.unparseable + invalid,
        };
        info!(
            name = %provider.name,
            items = provider.len(),
            substitutions = provider.substitutions,
            "loaded distance matrix"
        );
        Ok(provider)
    }

    /// Loads a lower-triangle matrix from the file at `path`.
    ///
    /// # Errors
    /// See [`Self::try_from_reader`]; opening the file may also fail with
    /// [`MatrixProviderError::Io`].
    pub fn try_from_path(
        name: impl Into<String>,
        path: impl AsRef<Path>,
        row_labels: RowLabels,
    ) -> Result<Self, MatrixProviderError> {
        let file = File::open(path)?;
        Self::try_from_reader(name, BufReader::new(file), row_labels)
    }

    /// The built-in seven-item matrix labelled `A` to `G`.
    ///
    /// # Examples
    /// ```
    /// use agglo_providers_matrix::MatrixProvider;
    ///
    /// let sample = MatrixProvider::sample();
    /// assert_eq!(sample.len(), 7);
    /// assert_eq!(sample.matrix().get(2, 4), Some(0.21));
    /// ```
    #[must_use]
    pub fn sample() -> Self {
        let rows: Vec<Vec<f64>> = SAMPLE.iter().map(|row| row.to_vec()).collect();
        let (matrix, substitutions) = DistanceMatrix::from_lower_triangle(&rows);
        Self {
            name: "sample".to_owned(),
            matrix,
            labels: Labels::alphabetic(SAMPLE.len()),
            substitutions,
        }
    }

    /// Returns the provider name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the distance matrix.
    #[must_use]
    pub fn matrix(&self) -> &DistanceMatrix {
        &self.matrix
    }

    /// Returns the item labels.
    #[must_use]
    pub fn labels(&self) -> &Labels {
        &self.labels
    }

    /// Returns how many cells were replaced by `0.0` while loading.
    #[must_use]
    pub fn substitutions(&self) -> usize {
        self.substitutions
    }

    /// Returns the number of items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.matrix.len()
    }

    /// Returns whether the provider holds no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.matrix.is_empty()
    }

    /// Splits the provider into its matrix and labels.
    #[must_use]
    pub fn into_parts(self) -> (DistanceMatrix, Labels) {
        (self.matrix, self.labels)
    }
}
