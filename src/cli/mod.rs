//! Command line interface for the production build.
//!
//! Parses arguments, assembles the [`BuildConfig`](crate::build::BuildConfig),
//! runs the [`Orchestrator`] and prints the report.

mod args;
mod output;
mod reporter;

pub use args::{Args, BuildEnvironment, RuntimeConfig};
pub use output::OutputManager;
pub use reporter::{ConsoleEventSink, render_report};

use crate::build::Orchestrator;
use crate::build::constants::WARNING_PREVIEW_LIMIT;
use crate::error::{CliError, Result};
use clap::Parser;
use std::sync::Arc;

/// Main CLI entry point
///
/// Returns the process exit code: 0 on success, 1 on any failure.
pub async fn run() -> Result<i32> {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            // --help and --version are reported as "errors" by clap
            let code = if e.use_stderr() { 1 } else { 0 };
            e.print()?;
            return Ok(code);
        }
    };
    execute(args, &BuildEnvironment::from_process()).await
}

/// Runs one build for already-parsed arguments.
pub async fn execute(args: Args, env: &BuildEnvironment) -> Result<i32> {
    args.validate()
        .map_err(|reason| CliError::InvalidArguments { reason })?;

    let runtime = RuntimeConfig::from(&args);
    let config = args.to_build_config(env)?;

    runtime.section("Building FML application for production")?;
    runtime.indent(&format!("Source: {}", config.source_dir().display()))?;
    runtime.indent(&format!("Output: {}", config.output_dir().display()))?;
    runtime.indent(&format!("Environment: {}", config.environment()))?;

    let sink = Arc::new(ConsoleEventSink::new(*runtime.output()));
    let mut orchestrator = Orchestrator::new(config).with_event_sink(sink);
    let report = orchestrator.build().await?;

    runtime.section("Build report")?;
    runtime.println(&render_report(&report.stats, WARNING_PREVIEW_LIMIT))?;

    if report.is_success() {
        let failed = report.stats.errors().len();
        if failed > 0 {
            runtime.output().warn(&format!(
                "{failed} file(s) could not be processed; rerun with --strict to fail the build"
            ))?;
        }
        runtime.success("Build completed successfully")?;
        Ok(0)
    } else {
        runtime.error(&format!(
            "Build failed: {} file(s) could not be processed (--strict)",
            report.stats.errors().len()
        ))?;
        Ok(1)
    }
}
