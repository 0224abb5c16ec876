//! Passive aggregation of build outcomes.
//!
//! Stats are created when a run starts, mutated by every stage and only read
//! when the report is produced. Nothing in the pipeline branches on them.

use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// A warning or error tied to the file (or directory) it concerns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub path: PathBuf,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path.display(), self.message)
    }
}

/// Counters, size accumulators and ordered diagnostics for one run.
#[derive(Debug, Clone)]
pub struct BuildStats {
    started: Instant,
    files_processed: u64,
    files_generated: u64,
    total_size: u64,
    compressed_size: u64,
    errors: Vec<Diagnostic>,
    warnings: Vec<Diagnostic>,
}

impl Default for BuildStats {
    fn default() -> Self {
        Self::new()
    }
}

impl BuildStats {
    /// Starts the wall clock and zeroes every counter.
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
            files_processed: 0,
            files_generated: 0,
            total_size: 0,
            compressed_size: 0,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Counts one input file handled by a stage.
    pub fn record_processed(&mut self) {
        self.files_processed += 1;
    }

    /// Counts one generated file and adds its size to the matching accumulator.
    pub fn record_file(&mut self, size: u64, compressed: bool) {
        self.files_generated += 1;
        if compressed {
            self.compressed_size += size;
        } else {
            self.total_size += size;
        }
    }

    pub fn add_error(&mut self, path: impl AsRef<Path>, message: impl Into<String>) {
        self.errors.push(Diagnostic {
            path: path.as_ref().to_path_buf(),
            message: message.into(),
        });
    }

    pub fn add_warning(&mut self, path: impl AsRef<Path>, message: impl Into<String>) {
        self.warnings.push(Diagnostic {
            path: path.as_ref().to_path_buf(),
            message: message.into(),
        });
    }

    pub fn files_processed(&self) -> u64 {
        self.files_processed
    }

    pub fn files_generated(&self) -> u64 {
        self.files_generated
    }

    pub fn total_size(&self) -> u64 {
        self.total_size
    }

    pub fn compressed_size(&self) -> u64 {
        self.compressed_size
    }

    /// Errors in the order they were recorded.
    pub fn errors(&self) -> &[Diagnostic] {
        &self.errors
    }

    /// Warnings in the order they were recorded.
    pub fn warnings(&self) -> &[Diagnostic] {
        &self.warnings
    }

    /// Wall-clock time since the stats were created.
    pub fn duration(&self) -> Duration {
        self.started.elapsed()
    }

    /// Percentage saved by compression, relative to the uncompressed total.
    ///
    /// `None` until at least one compressed file and one regular file exist.
    pub fn savings_percent(&self) -> Option<f64> {
        if self.total_size == 0 || self.compressed_size == 0 {
            return None;
        }
        Some((1.0 - self.compressed_size as f64 / self.total_size as f64) * 100.0)
    }

    /// Serializable copy of the counters, used by the build metadata.
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            duration_ms: self.duration().as_millis() as u64,
            files_processed: self.files_processed,
            files_generated: self.files_generated,
            total_size: self.total_size,
            compressed_size: self.compressed_size,
            errors: self.errors.iter().map(ToString::to_string).collect(),
            warnings: self.warnings.iter().map(ToString::to_string).collect(),
        }
    }
}

/// Point-in-time view of [`BuildStats`].
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsSnapshot {
    pub duration_ms: u64,
    pub files_processed: u64,
    pub files_generated: u64,
    pub total_size: u64,
    pub compressed_size: u64,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

/// Formats a byte count with binary units, e.g. `1.50 KB`.
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["KB", "MB", "GB", "TB"];

    if bytes < 1024 {
        return format!("{bytes} B");
    }

    let mut value = bytes as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{value:.2} {}", UNITS[unit])
}
