//! Console rendering of build events and the end-of-run report.

use super::output::OutputManager;
use crate::build::events::{BuildEvent, BuildEventSink};
use crate::build::stats::{BuildStats, format_size};
use std::fmt::Write;

/// Prints stage progress as the build runs.
///
/// Warnings and errors are collected into the final report rather than
/// printed as they happen, unless verbose output is on.
#[derive(Debug)]
pub struct ConsoleEventSink {
    output: OutputManager,
}

impl ConsoleEventSink {
    pub fn new(output: OutputManager) -> Self {
        Self { output }
    }
}

impl BuildEventSink for ConsoleEventSink {
    fn on_event(&self, event: BuildEvent) {
        // Console write failures are not worth failing a build over
        let _ = match event {
            BuildEvent::StageStarted { stage } => self.output.progress(&stage.to_string()),
            BuildEvent::FileWritten { path, size } => self
                .output
                .verbose(&format!("{} ({})", path.display(), format_size(size))),
            BuildEvent::AssetHashed { original, hashed } => {
                self.output.verbose(&format!("{original} -> {hashed}"))
            }
            BuildEvent::FileWarning { path, message } => self
                .output
                .verbose(&format!("warning: {}: {message}", path.display())),
            BuildEvent::FileError { path, message } => self
                .output
                .verbose(&format!("error: {}: {message}", path.display())),
            BuildEvent::BuildFailed { stage, error } => {
                self.output.error(&format!("{stage} failed: {error}"))
            }
            BuildEvent::BuildFinished { .. } => Ok(()),
        };
    }

    fn wants_detailed_events(&self) -> bool {
        self.output.is_verbose()
    }
}

/// Renders the summary: duration, counts, sizes and savings, a preview of
/// at most `warning_limit` warnings, then every error.
pub fn render_report(stats: &BuildStats, warning_limit: usize) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "Duration: {:.2}s", stats.duration().as_secs_f64());
    let _ = writeln!(out, "Files processed: {}", stats.files_processed());
    let _ = writeln!(out, "Files generated: {}", stats.files_generated());
    let _ = writeln!(out, "Total size: {}", format_size(stats.total_size()));
    if stats.compressed_size() > 0 {
        let _ = write!(out, "Compressed size: {}", format_size(stats.compressed_size()));
        if let Some(savings) = stats.savings_percent() {
            let _ = write!(out, " ({savings:.1}% smaller)");
        }
        out.push('\n');
    }

    let warnings = stats.warnings();
    if !warnings.is_empty() {
        let _ = writeln!(out, "\nWarnings ({}):", warnings.len());
        for warning in warnings.iter().take(warning_limit) {
            let _ = writeln!(out, "  - {warning}");
        }
        if warnings.len() > warning_limit {
            let _ = writeln!(out, "  ... and {} more", warnings.len() - warning_limit);
        }
    }

    let errors = stats.errors();
    if !errors.is_empty() {
        let _ = writeln!(out, "\nErrors ({}):", errors.len());
        for error in errors {
            let _ = writeln!(out, "  - {error}");
        }
    }

    out
}
