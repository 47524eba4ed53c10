//! Error types for the agglo core library.
//!
//! Defines error enums exposed by the public API and a convenient result alias.

use std::{fmt, sync::Arc};

use thiserror::Error;

macro_rules! define_error_codes {
    (
        $(#[$enum_meta:meta])*
        enum $CodeTy:ident for $ErrTy:ident {
            $(
                $(#[$variant_meta:meta])*
                $CodeVariant:ident => $ErrVariant:ident $( { $($pattern:tt)* } )? => $code:expr
            ),+ $(,)?
        }
    ) => {
        $(#[$enum_meta])*
        #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
        #[non_exhaustive]
        pub enum $CodeTy {
            $(
                $(#[$variant_meta])*
                $CodeVariant,
            )+
        }

        impl $CodeTy {
            /// Return the stable machine-readable representation of this error code.
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$CodeVariant => $code,)+
                }
            }
        }

        impl fmt::Display for $CodeTy {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl $ErrTy {
            #[doc = concat!(
                "Retrieve the stable [`",
                stringify!($CodeTy),
                "`] for this error."
            )]
            pub const fn code(&self) -> $CodeTy {
                match self {
                    $(Self::$ErrVariant $( { $($pattern)* } )? => $CodeTy::$CodeVariant,)+
                }
            }
        }
    };
}

/// An error produced while validating an original distance matrix.
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum MatrixError {
    /// A row did not have one entry per item.
    #[error("row {row} has {len} entries but the matrix has {expected} rows")]
    NotSquare {
        /// Offending row index.
        row: usize,
        /// Number of entries found in the row.
        len: usize,
        /// Number of entries every row must carry.
        expected: usize,
    },
    /// `D[i][j]` and `D[j][i]` disagree.
    #[error("matrix is not symmetric at ({row}, {col}): {forward} != {backward}")]
    Asymmetric {
        /// Row of the upper-triangle entry.
        row: usize,
        /// Column of the upper-triangle entry.
        col: usize,
        /// Value stored at `(row, col)`.
        forward: f64,
        /// Value stored at `(col, row)`.
        backward: f64,
    },
    /// A diagonal entry was not zero.
    #[error("diagonal entry {index} must be zero (got {value})")]
    NonZeroDiagonal {
        /// Item whose self-distance is non-zero.
        index: usize,
        /// Value found on the diagonal.
        value: f64,
    },
    /// A distance was negative.
    #[error("distance at ({row}, {col}) must be non-negative (got {value})")]
    Negative {
        /// Row of the offending cell.
        row: usize,
        /// Column of the offending cell.
        col: usize,
        /// Negative value found in the cell.
        value: f64,
    },
    /// A distance was NaN or infinite.
    #[error("distance at ({row}, {col}) must be finite (got {value})")]
    NonFinite {
        /// Row of the offending cell.
        row: usize,
        /// Column of the offending cell.
        col: usize,
        /// Non-finite value found in the cell.
        value: f64,
    },
}

define_error_codes! {
    /// Stable codes describing [`MatrixError`] variants.
    enum MatrixErrorCode for MatrixError {
        /// A row did not have one entry per item.
        NotSquare => NotSquare { .. } => "MATRIX_NOT_SQUARE",
        /// `D[i][j]` and `D[j][i]` disagree.
        Asymmetric => Asymmetric { .. } => "MATRIX_ASYMMETRIC",
        /// A diagonal entry was not zero.
        NonZeroDiagonal => NonZeroDiagonal { .. } => "MATRIX_NON_ZERO_DIAGONAL",
        /// A distance was negative.
        Negative => Negative { .. } => "MATRIX_NEGATIVE",
        /// A distance was NaN or infinite.
        NonFinite => NonFinite { .. } => "MATRIX_NON_FINITE",
    }
}

/// Error type produced when configuring or running an
/// [`crate::Agglomerator`].
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum AggloError {
    /// The linkage tag is not one of `single`, `complete` or `average`.
    #[error("unknown linkage method `{tag}`; expected `single`, `complete` or `average`")]
    UnknownLinkage {
        /// Tag supplied by the caller.
        tag: Arc<str>,
    },
    /// Fail-fast runs refuse a matrix without items.
    #[error("distance matrix contains no items")]
    EmptyMatrix,
    /// The number of labels does not match the number of items.
    #[error("{labels} labels were supplied for {items} items")]
    LabelCountMismatch {
        /// Number of labels supplied.
        labels: usize,
        /// Number of items in the distance matrix.
        items: usize,
    },
    /// Two items share the same display label.
    #[error("label `{label}` is used by more than one item")]
    DuplicateLabel {
        /// The repeated label.
        label: Arc<str>,
    },
    /// Fail-fast runs refuse to reduce an empty set of item distances.
    #[error("clusters `{left}` and `{right}` share no distinct item pairs")]
    EmptyPairSet {
        /// Concatenated labels of the first cluster.
        left: Arc<str>,
        /// Concatenated labels of the second cluster.
        right: Arc<str>,
    },
    /// The original distance matrix failed validation.
    #[error("invalid distance matrix: {error}")]
    Matrix {
        #[source]
        /// Underlying validation failure.
        error: MatrixError,
    },
}

define_error_codes! {
    /// Stable codes describing [`AggloError`] variants.
    enum AggloErrorCode for AggloError {
        /// The linkage tag is not recognised.
        UnknownLinkage => UnknownLinkage { .. } => "AGGLO_UNKNOWN_LINKAGE",
        /// Fail-fast runs refuse a matrix without items.
        EmptyMatrix => EmptyMatrix => "AGGLO_EMPTY_MATRIX",
        /// The number of labels does not match the number of items.
        LabelCountMismatch => LabelCountMismatch { .. } => "AGGLO_LABEL_COUNT_MISMATCH",
        /// Two items share the same display label.
        DuplicateLabel => DuplicateLabel { .. } => "AGGLO_DUPLICATE_LABEL",
        /// Fail-fast runs refuse to reduce an empty set of item distances.
        EmptyPairSet => EmptyPairSet { .. } => "AGGLO_EMPTY_PAIR_SET",
        /// The original distance matrix failed validation.
        MatrixInvalid => Matrix { .. } => "AGGLO_MATRIX_INVALID",
    }
}

impl AggloError {
    /// Retrieve the inner [`MatrixErrorCode`] when the error originated in
    /// matrix validation.
    pub const fn matrix_code(&self) -> Option<MatrixErrorCode> {
        match self {
            Self::Matrix { error } => Some(error.code()),
            _ => None,
        }
    }
}

impl From<MatrixError> for AggloError {
    fn from(error: MatrixError) -> Self {
        Self::Matrix { error }
    }
}

/// Convenient alias for results returned by the core API.
pub type Result<T> = core::result::Result<T, AggloError>;

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    #[rstest]
    #[case(AggloError::EmptyMatrix, "AGGLO_EMPTY_MATRIX")]
    #[case(
        AggloError::UnknownLinkage { tag: Arc::from("ward") },
        "AGGLO_UNKNOWN_LINKAGE"
    )]
    #[case(
        AggloError::LabelCountMismatch { labels: 2, items: 3 },
        "AGGLO_LABEL_COUNT_MISMATCH"
    )]
    fn codes_are_stable(#[case] error: AggloError, #[case] expected: &str) {
        assert_eq!(error.code().as_str(), expected);
        assert_eq!(error.code().to_string(), expected);
        assert_eq!(error.matrix_code(), None);
    }

    #[test]
    fn matrix_errors_expose_inner_code() {
        let error = AggloError::from(MatrixError::NonZeroDiagonal {
            index: 1,
            value: 0.5,
        });
        assert_eq!(error.code(), AggloErrorCode::MatrixInvalid);
        assert_eq!(error.matrix_code(), Some(MatrixErrorCode::NonZeroDiagonal));
        assert_eq!(
            error.to_string(),
            "invalid distance matrix: diagonal entry 1 must be zero (got 0.5)"
        );
    }
}
