//! CLI entry point for the `agglo` binary.
//!
//! Parses arguments with clap, runs every requested linkage over the chosen
//! distance matrix, renders the trace to stdout or a file, and maps errors to
//! exit codes. Logging is initialised first so later stages can emit
//! structured diagnostics via `tracing`.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use agglo_cli::{
    cli::{Cli, CliError, ExecutionSummary, render_summary, run_cli},
    logging::{self, LoggingError},
};
use tracing::{error, field, info};

/// Parse CLI arguments, execute the command, and render the trace.
fn try_main() -> Result<()> {
    let cli = Cli::parse();
    let summary = run_cli(cli).context("failed to execute command")?;
    info!(
        data_source = %summary.data_source,
        linkages = summary.traces.len(),
        substitutions = summary.substitutions,
        "clustering finished"
    );
    match &summary.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create `{}`", path.display()))?;
            write_summary(&summary, BufWriter::new(file))
        }
        None => write_summary(&summary, BufWriter::new(io::stdout().lock())),
    }
}

fn write_summary(summary: &ExecutionSummary, mut writer: impl Write) -> Result<()> {
    render_summary(summary, &mut writer).context("failed to render trace")?;
    writer.flush().context("failed to flush output")?;
    Ok(())
}

fn main() -> ExitCode {
    if let Err(err) = logging::init_logging() {
        report_logging_init_error(&err);
        return ExitCode::FAILURE;
    }

    if let Err(err) = try_main() {
        let code = err
            .downcast_ref::<CliError>()
            .and_then(CliError::code)
            .map(field::display);
        error!(error = %err, code, "command execution failed");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

#[expect(
    clippy::print_stderr,
    reason = "Emit one-off diagnostic before tracing is initialized"
)]
fn report_logging_init_error(err: &LoggingError) {
    eprintln!("failed to initialize logging: {err}");
}
