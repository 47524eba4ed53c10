use super::commands::{derive_data_source_name, selected_linkages};
use super::render::format_cell;
use super::*;

use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use agglo_core::{AggloError, Linkage};
use agglo_providers_matrix::MatrixProviderError;
use agglo_test_support::fixtures::{three_items, to_text};
use clap::Parser;
use rstest::{fixture, rstest};
use tempfile::TempDir;

type TestResult = Result<(), Box<dyn std::error::Error>>;

const THREE_ITEM_TRACE: &str = "\
=== LINKAGE: SINGLE ===
Step 0
Clusters:
A B C
Matrix:
∞ 2.00000 5.00000
2.00000 ∞ 4.00000
5.00000 4.00000 ∞
-----
Step 1
Clusters:
C AB
Matrix:
∞ 4.00000
4.00000 ∞
Merged: A and B at distance 2.00000
-----
Step 2
Clusters:
ABC
Matrix:
∞
Merged: C and AB at distance 4.00000
-----
";

const THREE_ITEM_LINKAGE: &str = "\
=== LINKAGE: SINGLE ===
Leaves: A B C
0 1 2.00000 2
2 3 4.00000 3
=== LINKAGE: COMPLETE ===
Leaves: A B C
0 1 2.00000 2
2 3 5.00000 3
";

#[fixture]
fn temp_dir() -> TempDir {
    match TempDir::new() {
        Ok(dir) => dir,
        Err(err) => panic!("failed to create temp dir: {err}"),
    }
}

fn create_file(dir: &TempDir, name: &str, contents: &str) -> io::Result<PathBuf> {
    let path = dir.path().join(name);
    let mut file = File::create(&path)?;
    file.write_all(contents.as_bytes())?;
    Ok(path)
}

fn file_command(path: PathBuf, linkages: Vec<LinkageArg>, strict: bool) -> Cli {
    Cli {
        command: Command::Run(RunCommand {
            linkages,
            format: OutputFormat::Text,
            strict,
            output: None,
            source: RunSource::File(FileArgs {
                path,
                row_labels: false,
                name: None,
            }),
        }),
    }
}

fn run_cli_expecting_error(cli: Cli, panic_msg: &str) -> CliError {
    match run_cli(cli) {
        Ok(_) => panic!("{}", panic_msg),
        Err(err) => err,
    }
}

#[rstest]
#[case::override_name("/tmp/distances.txt", Some("override"), "override")]
#[case::stem_with_extension("/tmp/distances.txt", None, "distances")]
#[case::stem_without_extension("/tmp/distances", None, "distances")]
#[case::missing_stem("", None, "matrix")]
fn derive_data_source_name_selects_expected_name(
    #[case] raw_path: &str,
    #[case] override_name: Option<&'static str>,
    #[case] expected: &str,
) {
    assert_eq!(derive_data_source_name(Path::new(raw_path), override_name), expected);
}

#[rstest]
#[case::defaults(vec![], vec![Linkage::Single, Linkage::Complete, Linkage::Average])]
#[case::explicit(
    vec![LinkageArg::Average, LinkageArg::Single],
    vec![Linkage::Average, Linkage::Single]
)]
fn selected_linkages_follow_request(
    #[case] requested: Vec<LinkageArg>,
    #[case] expected: Vec<Linkage>,
) {
    assert_eq!(selected_linkages(&requested), expected);
}

#[rstest]
fn run_file_success(temp_dir: TempDir) -> TestResult {
    let path = create_file(&temp_dir, "lines.txt", &to_text(&["x", "y", "z"], &three_items()))?;
    let summary = run_cli(file_command(path, Vec::new(), true))?;
    assert_eq!(summary.data_source, "lines");
    assert_eq!(summary.substitutions, 0);
    let last: Vec<f64> = summary
        .traces
        .iter()
        .filter_map(|trace| trace.merges().last().map(|merge| merge.distance))
        .collect();
    assert_eq!(last, [4.0, 5.0, 4.5]);
    Ok(())
}

#[rstest]
fn run_file_with_row_labels(temp_dir: TempDir) -> TestResult {
    let path = create_file(&temp_dir, "named.txt", "north 0\nsouth 1 0\n")?;
    let cli = Cli {
        command: Command::Run(RunCommand {
            linkages: vec![LinkageArg::Complete],
            format: OutputFormat::Text,
            strict: false,
            output: None,
            source: RunSource::File(FileArgs {
                path,
                row_labels: true,
                name: Some("compass".into()),
            }),
        }),
    };
    let summary = run_cli(cli)?;
    assert_eq!(summary.data_source, "compass");
    let merge = summary.traces[0].merges().next().expect("one merge");
    assert_eq!((merge.left.as_str(), merge.right.as_str()), ("north", "south"));
    Ok(())
}

#[rstest]
fn run_file_counts_substitutions(temp_dir: TempDir) -> TestResult {
    let path = create_file(&temp_dir, "messy.txt", "A 0\nB ? 0\nC -1 2 0\n")?;
    let summary = run_cli(file_command(path, vec![LinkageArg::Single], false))?;
    assert_eq!(summary.substitutions, 2);
    assert_eq!(summary.traces.len(), 1);
    Ok(())
}

#[rstest]
fn run_file_reports_missing_path(temp_dir: TempDir) {
    let path = temp_dir.path().join("absent.txt");
    let err = run_cli_expecting_error(file_command(path, Vec::new(), false), "missing file");
    assert!(matches!(err, CliError::Io { .. }));
    assert_eq!(err.code(), None);
}

#[rstest]
fn run_file_rejects_duplicate_row_labels(temp_dir: TempDir) -> TestResult {
    let path = create_file(&temp_dir, "dup.txt", "x 0\nx 1 0\n")?;
    let mut cli = file_command(path, Vec::new(), false);
    let Command::Run(run) = &mut cli.command;
    if let RunSource::File(args) = &mut run.source {
        args.row_labels = true;
    }
    let err = run_cli_expecting_error(cli, "duplicate labels must fail");
    assert!(matches!(
        err,
        CliError::Provider(MatrixProviderError::Labels(AggloError::DuplicateLabel { .. }))
    ));
    assert_eq!(err.code(), Some("AGGLO_DUPLICATE_LABEL"));
    Ok(())
}

#[rstest]
#[case::legacy(false, Ok(1))]
#[case::strict(true, Err("AGGLO_EMPTY_MATRIX"))]
fn run_empty_file(
    temp_dir: TempDir,
    #[case] strict: bool,
    #[case] expected: Result<usize, &str>,
) -> TestResult {
    let path = create_file(&temp_dir, "empty.txt", "\n")?;
    let outcome = run_cli(file_command(path, vec![LinkageArg::Average], strict))
        .map(|summary| summary.traces[0].records().len());
    match (outcome, expected) {
        (Ok(records), Ok(expected)) => assert_eq!(records, expected),
        (Err(err), Err(code)) => {
            assert!(matches!(err, CliError::Core(AggloError::EmptyMatrix)));
            assert_eq!(err.code(), Some(code));
        }
        (other, _) => panic!("unexpected outcome: {other:?}"),
    }
    Ok(())
}

#[rstest]
fn render_text_matches_step_layout(temp_dir: TempDir) -> TestResult {
    let path = create_file(&temp_dir, "three.txt", &to_text(&["A", "B", "C"], &three_items()))?;
    let summary = run_cli(file_command(path, vec![LinkageArg::Single], false))?;
    let mut buffer = Vec::new();
    render_summary(&summary, &mut buffer)?;
    assert_eq!(String::from_utf8(buffer)?, THREE_ITEM_TRACE);
    Ok(())
}

#[rstest]
fn render_linkage_lists_merges_by_node_id(temp_dir: TempDir) -> TestResult {
    let path = create_file(&temp_dir, "three.txt", &to_text(&["A", "B", "C"], &three_items()))?;
    let mut summary = run_cli(file_command(
        path,
        vec![LinkageArg::Single, LinkageArg::Complete],
        false,
    ))?;
    summary.format = OutputFormat::Linkage;
    let mut buffer = Vec::new();
    render_summary(&summary, &mut buffer)?;
    assert_eq!(String::from_utf8(buffer)?, THREE_ITEM_LINKAGE);
    Ok(())
}

#[rstest]
fn render_json_has_one_object_per_linkage() -> TestResult {
    let mut summary = run_cli(Cli::try_parse_from([
        "agglo",
        "run",
        "--linkage",
        "complete",
        "--linkage",
        "single",
        "sample",
    ])?)?;
    summary.format = OutputFormat::Json;
    let mut buffer = Vec::new();
    render_summary(&summary, &mut buffer)?;
    let value: serde_json::Value = serde_json::from_slice(&buffer)?;
    let traces = value.as_array().expect("top-level array");
    assert_eq!(traces.len(), 2);
    assert_eq!(traces[0]["linkage"], "complete");
    assert_eq!(traces[1]["linkage"], "single");
    assert_eq!(traces[0]["item_count"], 7);
    assert!(traces[0]["records"][0]["matrix"][0][0].is_null());
    assert_eq!(traces[0]["records"][1]["merge"]["left"], "C");
    assert_eq!(traces[0]["records"][1]["merge"]["right"], "E");
    Ok(())
}

#[rstest]
#[case::diagonal(None, "∞")]
#[case::rounded(Some(0.123_456), "0.12346")]
#[case::whole(Some(2.0), "2.00000")]
fn cells_use_five_decimals(#[case] cell: Option<f64>, #[case] expected: &str) {
    assert_eq!(format_cell(cell), expected);
}

#[rstest]
fn clap_parses_run_options() -> TestResult {
    let cli = Cli::try_parse_from([
        "agglo",
        "run",
        "--format",
        "json",
        "--strict",
        "--output",
        "trace.json",
        "file",
        "data.txt",
        "--row-labels",
    ])?;
    let Command::Run(run) = cli.command;
    assert_eq!(run.format, OutputFormat::Json);
    assert!(run.strict);
    assert_eq!(run.output, Some(PathBuf::from("trace.json")));
    assert!(run.linkages.is_empty());
    match run.source {
        RunSource::File(args) => {
            assert_eq!(args.path, PathBuf::from("data.txt"));
            assert!(args.row_labels);
            assert_eq!(args.name, None);
        }
        RunSource::Sample => panic!("expected a file source"),
    }
    Ok(())
}

#[rstest]
fn clap_accepts_linkage_format() -> TestResult {
    let cli = Cli::try_parse_from(["agglo", "run", "--format", "linkage", "sample"])?;
    let Command::Run(run) = cli.command;
    assert_eq!(run.format, OutputFormat::Linkage);
    Ok(())
}

#[rstest]
#[case::unknown_linkage(&["agglo", "run", "--linkage", "ward", "sample"])]
#[case::unknown_format(&["agglo", "run", "--format", "xml", "sample"])]
#[case::missing_source(&["agglo", "run"])]
fn clap_rejects_invalid_arguments(#[case] args: &[&str]) {
    assert!(Cli::try_parse_from(args).is_err());
}
