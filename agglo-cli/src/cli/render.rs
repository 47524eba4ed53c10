use std::io::{self, Write};

use agglo_core::{Trace, TraceRecord};

use super::commands::{ExecutionSummary, OutputFormat};

/// Renders `summary` to `writer` in the requested [`OutputFormat`].
///
/// Text output prints, per linkage, a header followed by one block per step:
/// the clusters, the working matrix (`∞` on the diagonal) and the merge that
/// produced the step. JSON output is an array with one object per linkage.
/// Linkage output lists the leaf labels in node-id order followed by one
/// `left right distance size` row per merge, the input a dendrogram plot needs.
///
/// # Errors
/// Returns [`io::Error`] if writing or serialisation fails.
///
/// # Examples
/// ```
/// # use agglo_cli::cli::{Cli, Command, LinkageArg, OutputFormat, RunCommand, RunSource};
/// # use agglo_cli::cli::{render_summary, run_cli};
/// let summary = run_cli(Cli {
///     command: Command::Run(RunCommand {
///         linkages: vec![LinkageArg::Single],
///         format: OutputFormat::Text,
///         strict: false,
///         output: None,
///         source: RunSource::Sample,
///     }),
/// })?;
/// let mut buffer = Vec::new();
/// render_summary(&summary, &mut buffer)?;
/// let text = String::from_utf8(buffer)?;
/// assert!(text.starts_with("=== LINKAGE: SINGLE ===\nStep 0\n"));
/// assert!(text.contains("Merged: C and E at distance 0.21000\n"));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn render_summary(summary: &ExecutionSummary, mut writer: impl Write) -> io::Result<()> {
    match summary.format {
        OutputFormat::Text => {
            for trace in &summary.traces {
                write_trace(trace, &mut writer)?;
            }
        }
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut writer, &summary.traces)?;
            writeln!(writer)?;
        }
        OutputFormat::Linkage => {
            for trace in &summary.traces {
                write_linkage_rows(trace, &mut writer)?;
            }
        }
    }
    Ok(())
}

fn write_header(trace: &Trace, writer: &mut impl Write) -> io::Result<()> {
    writeln!(
        writer,
        "=== LINKAGE: {} ===",
        trace.linkage().as_str().to_ascii_uppercase()
    )
}

fn write_trace(trace: &Trace, writer: &mut impl Write) -> io::Result<()> {
    write_header(trace, writer)?;
    for record in trace.records() {
        write_record(record, writer)?;
    }
    Ok(())
}

fn write_linkage_rows(trace: &Trace, writer: &mut impl Write) -> io::Result<()> {
    write_header(trace, writer)?;
    // Step 0 lists every singleton, so its names are the leaf labels by id.
    let leaves = trace
        .records()
        .first()
        .map(TraceRecord::cluster_names)
        .unwrap_or_default();
    writeln!(writer, "Leaves: {}", leaves.join(" "))?;
    for row in trace.linkage_rows() {
        writeln!(
            writer,
            "{} {} {:.5} {}",
            row.left, row.right, row.distance, row.size
        )?;
    }
    Ok(())
}

fn write_record(record: &TraceRecord, writer: &mut impl Write) -> io::Result<()> {
    writeln!(writer, "Step {}", record.step())?;
    writeln!(writer, "Clusters:")?;
    writeln!(writer, "{}", record.cluster_names().join(" "))?;
    writeln!(writer, "Matrix:")?;
    for row in record.matrix().rows() {
        let cells: Vec<String> = row.iter().map(|cell| format_cell(*cell)).collect();
        writeln!(writer, "{}", cells.join(" "))?;
    }
    if let Some(merge) = record.merge() {
        writeln!(
            writer,
            "Merged: {} and {} at distance {:.5}",
            merge.left, merge.right, merge.distance
        )?;
    }
    writeln!(writer, "-----")
}

pub(super) fn format_cell(cell: Option<f64>) -> String {
    cell.map_or_else(|| "∞".to_owned(), |value| format!("{value:.5}"))
}
