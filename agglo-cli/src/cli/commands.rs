//! Command-line parsing and execution of the `run` command.

use std::fs::File;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};

use agglo_core::{AggloError, FallbackPolicy, Linkage, Trace, run_linkages};
use agglo_providers_matrix::{MatrixProvider, MatrixProviderError, RowLabels};
use clap::{Args, Parser, Subcommand, ValueEnum};
use thiserror::Error;
use tracing::warn;

/// Top-level CLI options parsed by [`clap`].
#[derive(Debug, Parser, Clone)]
#[command(
    name = "agglo",
    about = "Trace agglomerative hierarchical clustering over a distance matrix."
)]
pub struct Cli {
    /// Command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported CLI commands.
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Cluster a distance matrix and print every step.
    Run(RunCommand),
}

/// Options accepted by the `run` command.
#[derive(Debug, Args, Clone)]
pub struct RunCommand {
    /// Linkage method to run; repeat to run several. Defaults to single,
    /// complete and average.
    #[arg(long = "linkage", value_enum)]
    pub linkages: Vec<LinkageArg>,

    /// Output format for the trace.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Reject unusable input instead of substituting fallback values.
    #[arg(long)]
    pub strict: bool,

    /// Write the trace to a file instead of stdout.
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Distance matrix source.
    #[command(subcommand)]
    pub source: RunSource,
}

/// Distance matrix sources.
#[derive(Debug, Subcommand, Clone)]
pub enum RunSource {
    /// Read a lower-triangle distance file, one labelled row per line.
    File(FileArgs),
    /// Use the built-in seven-item matrix.
    Sample,
}

/// Lower-triangle file arguments.
#[derive(Debug, Args, Clone)]
pub struct FileArgs {
    /// Path to the distance file.
    pub path: PathBuf,

    /// Use each row's leading token as its label instead of `A`, `B`, ….
    #[arg(long)]
    pub row_labels: bool,

    /// Override name for the matrix (defaults to the file name).
    #[arg(long)]
    pub name: Option<String>,
}

/// Linkage methods selectable on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LinkageArg {
    /// Minimum pairwise distance.
    Single,
    /// Maximum pairwise distance.
    Complete,
    /// Mean pairwise distance.
    Average,
}

impl From<LinkageArg> for Linkage {
    fn from(value: LinkageArg) -> Self {
        match value {
            LinkageArg::Single => Self::Single,
            LinkageArg::Complete => Self::Complete,
            LinkageArg::Average => Self::Average,
        }
    }
}

/// Trace output formats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Step-by-step text blocks.
    #[default]
    Text,
    /// One JSON object per linkage.
    Json,
    /// Merge log per linkage: `left right distance size` rows over node ids.
    Linkage,
}

/// Errors surfaced while executing CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// The distance file could not be opened.
    #[error("failed to open `{path}`: {source}")]
    Io {
        /// Path that triggered the failure.
        path: PathBuf,
        /// Underlying operating system error.
        #[source]
        source: io::Error,
    },
    /// Loading the distance matrix failed.
    #[error(transparent)]
    Provider(#[from] MatrixProviderError),
    /// Clustering failed.
    #[error(transparent)]
    Core(#[from] AggloError),
}

impl CliError {
    /// Returns the stable code of the underlying library error, if any.
    #[must_use]
    pub fn code(&self) -> Option<&'static str> {
        match self {
            Self::Io { .. } => None,
            Self::Provider(err) => Some(err.code()),
            Self::Core(err) => Some(err.code().as_str()),
        }
    }
}

/// Outcome of the `run` command.
#[derive(Debug, Clone)]
pub struct ExecutionSummary {
    /// Name of the distance matrix.
    pub data_source: String,
    /// Cells replaced by `0.0` while loading.
    pub substitutions: usize,
    /// One trace per requested linkage, in request order.
    pub traces: Vec<Trace>,
    /// Requested output format.
    pub format: OutputFormat,
    /// Requested output file; stdout when `None`.
    pub output: Option<PathBuf>,
}

/// Executes the CLI command represented by `cli`.
///
/// # Errors
/// Returns [`CliError`] when loading or clustering fails.
///
/// # Examples
/// ```
/// # use agglo_cli::cli::{Cli, Command, OutputFormat, RunCommand, RunSource, run_cli};
/// let cli = Cli {
///     command: Command::Run(RunCommand {
///         linkages: Vec::new(),
///         format: OutputFormat::Text,
///         strict: false,
///         output: None,
///         source: RunSource::Sample,
///     }),
/// };
/// let summary = run_cli(cli)?;
/// assert_eq!(summary.traces.len(), 3);
/// # Ok::<(), agglo_cli::cli::CliError>(())
/// ```
pub fn run_cli(cli: Cli) -> Result<ExecutionSummary, CliError> {
    match cli.command {
        Command::Run(run) => run_command(run),
    }
}

fn run_command(command: RunCommand) -> Result<ExecutionSummary, CliError> {
    let RunCommand {
        linkages,
        format,
        strict,
        output,
        source,
    } = command;
    let provider = match source {
        RunSource::File(args) => load_file(args)?,
        RunSource::Sample => MatrixProvider::sample(),
    };
    if provider.substitutions() > 0 {
        warn!(
            data_source = provider.name(),
            substitutions = provider.substitutions(),
            "distance matrix contained unusable cells"
        );
    }

    let policy = if strict {
        FallbackPolicy::FailFast
    } else {
        FallbackPolicy::Legacy
    };
    let traces = run_linkages(
        &selected_linkages(&linkages),
        policy,
        provider.matrix(),
        provider.labels(),
    )?;
    Ok(ExecutionSummary {
        data_source: provider.name().to_owned(),
        substitutions: provider.substitutions(),
        traces,
        format,
        output,
    })
}

pub(super) fn selected_linkages(requested: &[LinkageArg]) -> Vec<Linkage> {
    if requested.is_empty() {
        return Linkage::STANDARD.to_vec();
    }
    requested.iter().copied().map(Linkage::from).collect()
}

fn load_file(args: FileArgs) -> Result<MatrixProvider, CliError> {
    let FileArgs {
        path,
        row_labels,
        name,
    } = args;
    let chosen_name = derive_data_source_name(&path, name.as_deref());
    let reader = open_matrix_reader(&path)?;
    let row_labels = if row_labels {
        RowLabels::Leading
    } else {
        RowLabels::Generated
    };
    Ok(MatrixProvider::try_from_reader(
        chosen_name,
        reader,
        row_labels,
    )?)
}

fn open_matrix_reader(path: &Path) -> Result<BufReader<File>, CliError> {
    let file = File::open(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(BufReader::new(file))
}

pub(super) fn derive_data_source_name(path: &Path, override_name: Option<&str>) -> String {
    if let Some(name) = override_name {
        return name.to_owned();
    }

    path.file_stem()
        .and_then(|value| value.to_str())
        .map_or_else(|| "matrix".to_owned(), ToOwned::to_owned)
}
