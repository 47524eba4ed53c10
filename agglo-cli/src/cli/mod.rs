//! Command-line interface for tracing agglomerative clustering runs.
//!
//! The `run` command loads a lower-triangle distance file (or the built-in
//! sample), clusters it under one or more linkage methods and renders every
//! step as text or JSON.

mod commands;
mod render;

pub use commands::{
    Cli, CliError, Command, ExecutionSummary, FileArgs, LinkageArg, OutputFormat, RunCommand,
    RunSource, run_cli,
};
pub use render::render_summary;

#[cfg(test)]
mod tests;
