use std::io::{Cursor, Write};

use agglo_test_support::fixtures::{seven_items, to_text};
use rstest::rstest;

use crate::{MatrixProvider, MatrixProviderError, RowLabels};

#[rstest]
fn generated_labels_ignore_leading_tokens() {
    let provider = MatrixProvider::try_from_reader(
        "demo",
        Cursor::new("x 0\ny 2 0\nz 5 4 0\n"),
        RowLabels::Generated,
    )
    .expect("valid matrix");
    assert_eq!(provider.name(), "demo");
    assert_eq!(provider.labels().iter().collect::<Vec<_>>(), ["A", "B", "C"]);
    assert_eq!(provider.matrix().get(2, 1), Some(4.0));
    assert_eq!(provider.matrix().get(1, 2), Some(4.0));
    assert_eq!(provider.substitutions(), 0);
}

#[rstest]
fn leading_labels_must_be_distinct() {
    let err = MatrixProvider::try_from_reader(
        "demo",
        Cursor::new("x 0\nx 1 0\n"),
        RowLabels::Leading,
    )
    .expect_err("duplicate labels");
    assert!(matches!(err, MatrixProviderError::Labels(_)));
    assert_eq!(err.code(), "AGGLO_DUPLICATE_LABEL");
}

#[rstest]
#[case::unparseable("A 0\nB oops 0\n", 1)]
#[case::negative("A 0\nB -3 0\n", 1)]
#[case::not_a_number("A 0\nB NaN 0\nC inf 1 0\n", 2)]
fn invalid_cells_become_zero(#[case] text: &str, #[case] substitutions: usize) {
    let provider = MatrixProvider::try_from_reader("demo", Cursor::new(text), RowLabels::Generated)
        .expect("invalid cells are tolerated");
    assert_eq!(provider.matrix().get(1, 0), Some(0.0));
    assert_eq!(provider.substitutions(), substitutions);
}

#[rstest]
fn invalid_utf8_cell_becomes_zero() {
    let provider = MatrixProvider::try_from_reader(
        "bytes",
        Cursor::new(&b"A 0\nB \xff 0\nC 5 4 0\n"[..]),
        RowLabels::Generated,
    )
    .expect("invalid bytes are tolerated");
    assert_eq!(provider.len(), 3);
    assert_eq!(provider.substitutions(), 1);
    assert_eq!(provider.matrix().get(1, 0), Some(0.0));
    assert_eq!(provider.matrix().get(2, 1), Some(4.0));
}

#[rstest]
fn short_rows_are_padded() {
    let provider = MatrixProvider::try_from_reader(
        "demo",
        Cursor::new("A 0\nB\nC 7\n"),
        RowLabels::Generated,
    )
    .expect("short rows are tolerated");
    assert_eq!(provider.len(), 3);
    assert_eq!(provider.matrix().get(0, 1), Some(0.0));
    assert_eq!(provider.matrix().get(0, 2), Some(7.0));
    assert_eq!(provider.matrix().get(1, 2), Some(0.0));
}

#[rstest]
fn empty_input_yields_empty_provider() {
    let provider = MatrixProvider::try_from_reader("empty", Cursor::new("\n\n"), RowLabels::Leading)
        .expect("empty input is accepted");
    assert!(provider.is_empty());
    assert!(provider.labels().is_empty());
}

#[rstest]
fn sample_matches_reference_rows() {
    let text = to_text(&["A", "B", "C", "D", "E", "F", "G"], &seven_items());
    let parsed = MatrixProvider::try_from_reader("file", Cursor::new(text), RowLabels::Leading)
        .expect("reference rows parse");
    let sample = MatrixProvider::sample();
    assert_eq!(sample.name(), "sample");
    assert_eq!(sample.matrix(), parsed.matrix());
    assert_eq!(sample.labels(), parsed.labels());
    assert_eq!(sample.substitutions(), 0);
}

#[rstest]
fn loads_from_path() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    writeln!(file, "A 0").expect("write row");
    writeln!(file, "B 1.25 0").expect("write row");
    let provider = MatrixProvider::try_from_path("disk", file.path(), RowLabels::Generated)
        .expect("file loads");
    let (matrix, labels) = provider.into_parts();
    assert_eq!(matrix.get(0, 1), Some(1.25));
    assert_eq!(labels.len(), 2);
}

#[rstest]
fn missing_path_is_an_io_error() {
    let dir = tempfile::tempdir().expect("temp dir");
    let err = MatrixProvider::try_from_path(
        "missing",
        dir.path().join("absent.txt"),
        RowLabels::Generated,
    )
    .expect_err("file does not exist");
    assert!(matches!(err, MatrixProviderError::Io(_)));
    assert_eq!(err.code(), "MATRIX_PROVIDER_IO");
}
