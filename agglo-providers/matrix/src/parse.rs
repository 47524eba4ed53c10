//! Tokenising of lower-triangle rows.
use std::io::BufRead;

use tracing::warn;

/// One non-blank input line.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RawRow {
    pub(crate) label: String,
    pub(crate) cells: Vec<f64>,
}

/// Rows read from a reader plus the number of unparseable tokens replaced by
/// `0.0`.
#[derive(Debug, Default)]
pub(crate) struct ParsedRows {
    pub(crate) rows: Vec<RawRow>,
    pub(crate) unparseable: usize,
}

pub(crate) fn read_rows<R: BufRead>(reader: R) -> std::io::Result<ParsedRows> {
    let mut parsed = ParsedRows::default();
    for (line_index, bytes) in reader.split(b'\n').enumerate() {
        // Invalid UTF-8 decodes to U+FFFD, which then fails to parse as a cell.
        let bytes = bytes?;
        let line = String::from_utf8_lossy(&bytes);
        let mut tokens = line.split_whitespace();
        let Some(label) = tokens.next() else {
            continue;
        };
        // Only the lower triangle (diagonal included) is meaningful.
        let width = parsed.rows.len() + 1;
        let cells = tokens
            .take(width)
            .map(|token| {
                token.parse::<f64>().unwrap_or_else(|_| {
                    warn!(line = line_index + 1, token, "substituting 0.0 for unparseable distance");
                    parsed.unparseable += 1;
                    0.0
                })
            })
            .collect();
        parsed.rows.push(RawRow {
            label: label.to_owned(),
            cells,
        });
    }
    Ok(parsed)
}
