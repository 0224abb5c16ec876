//! Structured build events.
//!
//! Stages never print. They report through a [`Recorder`], which updates the
//! run's [`BuildStats`] and forwards a [`BuildEvent`] to whatever
//! [`BuildEventSink`] the caller installed (console, tests, nothing).

use super::stats::BuildStats;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

/// One ordered phase of the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Preflight,
    Clean,
    Scaffold,
    Templates,
    Pages,
    Components,
    Server,
    Static,
    Manifest,
    Optimize,
    Metadata,
    Finalize,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Stage::Preflight => "Running preflight checks",
            Stage::Clean => "Cleaning output directory",
            Stage::Scaffold => "Creating output structure",
            Stage::Templates => "Compiling templates",
            Stage::Pages => "Bundling pages",
            Stage::Components => "Bundling components",
            Stage::Server => "Processing server, views and API routes",
            Stage::Static => "Copying and hashing static assets",
            Stage::Manifest => "Writing asset manifest",
            Stage::Optimize => "Running optimizations",
            Stage::Metadata => "Writing build metadata",
            Stage::Finalize => "Finalizing package",
        };
        f.write_str(label)
    }
}

/// Event emitted during a build
#[derive(Debug, Clone)]
pub enum BuildEvent {
    /// A stage began
    StageStarted { stage: Stage },

    /// A file was written into the output tree
    FileWritten { path: PathBuf, size: u64 },

    /// A non-blocking problem was recorded
    FileWarning { path: PathBuf, message: String },

    /// A per-file failure was recorded
    FileError { path: PathBuf, message: String },

    /// A static asset was renamed to its content-addressed name
    AssetHashed { original: String, hashed: String },

    /// A fatal error aborted the run
    BuildFailed { stage: Stage, error: String },

    /// All stages completed
    BuildFinished {
        success: bool,
        duration: Duration,
        errors: usize,
        warnings: usize,
    },
}

/// Trait for receiving build events
pub trait BuildEventSink: Send + Sync {
    /// Handle a build event
    fn on_event(&self, event: BuildEvent);

    /// Whether this sink wants per-file events
    ///
    /// Summary-only sinks skip `FileWritten` and `AssetHashed`.
    fn wants_detailed_events(&self) -> bool {
        true
    }
}

/// No-op event sink for silent operation
pub struct NoopEventSink;

impl BuildEventSink for NoopEventSink {
    fn on_event(&self, _event: BuildEvent) {}

    fn wants_detailed_events(&self) -> bool {
        false
    }
}

/// Sink that keeps every event in memory.
#[derive(Default)]
pub struct CollectingEventSink {
    events: Mutex<Vec<BuildEvent>>,
}

impl CollectingEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the events received so far.
    pub fn events(&self) -> Vec<BuildEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }
}

impl BuildEventSink for CollectingEventSink {
    fn on_event(&self, event: BuildEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}

/// Records outcomes into the run's stats and mirrors them as events.
pub struct Recorder<'a> {
    stats: &'a mut BuildStats,
    sink: &'a dyn BuildEventSink,
}

impl<'a> Recorder<'a> {
    pub fn new(stats: &'a mut BuildStats, sink: &'a dyn BuildEventSink) -> Self {
        Self { stats, sink }
    }

    /// Read access to the stats accumulated so far.
    pub fn stats(&self) -> &BuildStats {
        &*self.stats
    }

    pub fn stage_started(&self, stage: Stage) {
        log::info!("{stage}");
        self.sink.on_event(BuildEvent::StageStarted { stage });
    }

    pub fn processed(&mut self) {
        self.stats.record_processed();
    }

    pub fn file_written(&mut self, path: &Path, size: u64) {
        self.stats.record_file(size, false);
        if self.sink.wants_detailed_events() {
            self.sink.on_event(BuildEvent::FileWritten {
                path: path.to_path_buf(),
                size,
            });
        }
    }

    pub fn compressed_written(&mut self, path: &Path, size: u64) {
        self.stats.record_file(size, true);
        if self.sink.wants_detailed_events() {
            self.sink.on_event(BuildEvent::FileWritten {
                path: path.to_path_buf(),
                size,
            });
        }
    }

    pub fn asset_hashed(&self, original: &str, hashed: &str) {
        if self.sink.wants_detailed_events() {
            self.sink.on_event(BuildEvent::AssetHashed {
                original: original.to_string(),
                hashed: hashed.to_string(),
            });
        }
    }

    pub fn warn(&mut self, path: impl AsRef<Path>, message: impl Into<String>) {
        let path = path.as_ref();
        let message = message.into();
        log::warn!("{}: {}", path.display(), message);
        self.stats.add_warning(path, message.clone());
        self.sink.on_event(BuildEvent::FileWarning {
            path: path.to_path_buf(),
            message,
        });
    }

    pub fn error(&mut self, path: impl AsRef<Path>, message: impl Into<String>) {
        let path = path.as_ref();
        let message = message.into();
        log::error!("{}: {}", path.display(), message);
        self.stats.add_error(path, message.clone());
        self.sink.on_event(BuildEvent::FileError {
            path: path.to_path_buf(),
            message,
        });
    }
}
