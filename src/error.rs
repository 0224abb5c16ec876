//! Top-level error types for the command-line boundary.

use thiserror::Error;

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, FmlError>;

/// Main error type surfaced to `main`
#[derive(Error, Debug)]
pub enum FmlError {
    /// CLI argument errors
    #[error("CLI error: {0}")]
    Cli(#[from] CliError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Build pipeline errors
    #[error("Build error: {0}")]
    Build(#[from] crate::build::Error),
}

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    /// Invalid command line arguments
    #[error("Invalid arguments: {reason}")]
    InvalidArguments {
        /// Reason for the error
        reason: String,
    },
}

impl FmlError {
    /// Hint printed after the error message, if one applies.
    pub fn suggestion(&self) -> Option<&'static str> {
        use crate::build::Error as BuildError;
        match self {
            FmlError::Build(BuildError::SourceMissing(_)) => {
                Some("Pass the application root with --source <dir>")
            }
            FmlError::Build(BuildError::RuntimeTooOld { .. }) => {
                Some("Upgrade the host runtime to a supported version")
            }
            FmlError::Build(BuildError::UnsafeOutput { .. }) => {
                Some("Choose an output directory outside the source tree")
            }
            FmlError::Cli(CliError::InvalidArguments { .. }) => Some("Run with --help for usage"),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_errors_convert_and_carry_hints() {
        let err: FmlError = crate::build::Error::SourceMissing("app".into()).into();
        assert!(err.to_string().contains("source directory not found"));
        assert!(err.suggestion().unwrap().contains("--source"));
    }
}
