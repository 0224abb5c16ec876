//! Error types for build pipeline operations.
//!
//! Fatal setup failures and per-file failures share this type. Whether an
//! error aborts the run is decided by the stage that produced it, not by the
//! variant.

use std::fmt::Display;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type alias for build operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the build pipeline
#[derive(Error, Debug)]
pub enum Error {
    /// IO errors without path context
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Filesystem errors with the operation and path that failed
    #[error("{context} `{}`: {error}", .path.display())]
    Fs {
        /// What was being attempted
        context: String,
        /// Path the operation targeted
        path: PathBuf,
        /// Underlying IO error
        #[source]
        error: std::io::Error,
    },

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Directory traversal errors
    #[error("directory walk failed: {0}")]
    WalkError(#[from] walkdir::Error),

    /// Path prefix errors while computing relative paths
    #[error("path error: {0}")]
    StripPrefix(#[from] std::path::StripPrefixError),

    /// README template rendering errors
    #[error("template rendering failed: {0}")]
    RenderError(#[from] handlebars::RenderError),

    /// An external command could not be spawned or awaited
    #[error("failed to run `{command}`: {error}")]
    CommandFailed {
        /// Command that failed
        command: String,
        /// Underlying IO error
        #[source]
        error: std::io::Error,
    },

    /// An external command exceeded its time limit and was killed
    #[error("`{command}` timed out after {seconds}s and was killed")]
    CommandTimeout {
        /// Command that timed out
        command: String,
        /// Limit that was exceeded
        seconds: u64,
    },

    /// The configured source directory does not exist
    #[error("source directory not found: {}", .0.display())]
    SourceMissing(PathBuf),

    /// The host runtime is older than the supported minimum
    #[error("host runtime {found} is older than the required {required}")]
    RuntimeTooOld {
        /// Detected version
        found: semver::Version,
        /// Minimum supported version
        required: semver::Version,
    },

    /// Cleaning the output directory would destroy the sources
    #[error(
        "refusing to clean output directory `{}`: it overlaps the source directory `{}`",
        .output.display(),
        .source_dir.display()
    )]
    UnsafeOutput {
        /// Output directory that would be removed
        output: PathBuf,
        /// Source root or input directory it overlaps
        source_dir: PathBuf,
    },

    /// Errors that carry only a message
    #[error("{0}")]
    GenericError(String),
}

/// Attaches filesystem context to IO results.
pub trait ErrorExt<T> {
    /// Wraps an IO error with the operation being attempted and the path involved.
    fn fs_context(self, context: &str, path: impl AsRef<Path>) -> Result<T>;
}

impl<T> ErrorExt<T> for std::result::Result<T, std::io::Error> {
    fn fs_context(self, context: &str, path: impl AsRef<Path>) -> Result<T> {
        self.map_err(|error| Error::Fs {
            context: context.to_string(),
            path: path.as_ref().to_path_buf(),
            error,
        })
    }
}

/// Converts options and foreign errors into [`Error::GenericError`] with a message.
pub trait Context<T> {
    /// Adds a message describing what was expected.
    fn context<C: Display>(self, context: C) -> Result<T>;
}

impl<T> Context<T> for Option<T> {
    fn context<C: Display>(self, context: C) -> Result<T> {
        self.ok_or_else(|| Error::GenericError(context.to_string()))
    }
}

impl<T, E: Display> Context<T> for std::result::Result<T, E> {
    fn context<C: Display>(self, context: C) -> Result<T> {
        self.map_err(|e| Error::GenericError(format!("{context}: {e}")))
    }
}

/// Returns early with a [`Error::GenericError`] built from a format string.
#[macro_export]
macro_rules! bail {
    ($($arg:tt)*) => {
        return Err($crate::build::Error::GenericError(format!($($arg)*)))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fs_context_keeps_path_and_operation() {
        let result: std::result::Result<(), std::io::Error> =
            Err(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        let err = result
            .fs_context("reading page", Path::new("pages/home.js"))
            .unwrap_err();
        let message = err.to_string();
        assert!(message.contains("reading page"));
        assert!(message.contains("pages/home.js"));
        assert!(message.contains("gone"));
    }

    #[test]
    fn option_context_becomes_generic_error() {
        let missing: Option<u8> = None;
        let err = missing.context("no entry").unwrap_err();
        assert!(matches!(err, Error::GenericError(ref m) if m == "no entry"));
    }
}
