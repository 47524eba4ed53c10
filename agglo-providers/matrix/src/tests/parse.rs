use std::io::Cursor;

use rstest::rstest;

use crate::parse::{RawRow, read_rows};

#[rstest]
fn skips_blank_lines() {
    let parsed = read_rows(Cursor::new("A 0\n\n   \nB 1 0\n")).expect("read succeeds");
    assert_eq!(
        parsed.rows,
        vec![
            RawRow {
                label: "A".to_owned(),
                cells: vec![0.0]
            },
            RawRow {
                label: "B".to_owned(),
                cells: vec![1.0, 0.0]
            },
        ]
    );
    assert_eq!(parsed.unparseable, 0);
}

#[rstest]
#[case::word("A 0\nB abc 0\n", vec![0.0, 0.0], 1)]
#[case::comma("A 0\nB 1,5 0\n", vec![0.0, 0.0], 1)]
#[case::extra_tokens("A 0\nB 3 0 9 9\n", vec![3.0, 0.0], 0)]
#[case::short_row("A 0\nB\n", vec![], 0)]
fn second_row_cells(
    #[case] text: &str,
    #[case] expected: Vec<f64>,
    #[case] unparseable: usize,
) {
    let parsed = read_rows(Cursor::new(text)).expect("read succeeds");
    assert_eq!(parsed.rows[1].cells, expected);
    assert_eq!(parsed.unparseable, unparseable);
}

#[rstest]
fn empty_input_has_no_rows() {
    let parsed = read_rows(Cursor::new("")).expect("read succeeds");
    assert!(parsed.rows.is_empty());
}
