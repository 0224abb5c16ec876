//! Core BuildConfig struct and implementations.

use super::{BuildFlags, OutputLayout, SourceLayout};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Effective configuration of one build run.
///
/// Constructed via [`BuildConfigBuilder`](super::BuildConfigBuilder) and never
/// mutated afterwards.
///
/// # Examples
///
/// ```no_run
/// use fml_build::build::BuildConfigBuilder;
///
/// # fn example() -> fml_build::build::Result<()> {
/// let config = BuildConfigBuilder::new()
///     .source_dir("my-app")
///     .output_dir("my-app/dist")
///     .minify(false)
///     .build()?;
/// assert!(!config.flags().minify);
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildConfig {
    /// Root of the application sources.
    source_dir: PathBuf,

    /// Root of the deployable output tree. Destroyed and rebuilt every run.
    output_dir: PathBuf,

    /// Directory names inside the source tree.
    sources: SourceLayout,

    /// Subdirectory names inside the output tree.
    outputs: OutputLayout,

    /// Optimization switches.
    flags: BuildFlags,

    /// Limit for one external bundler invocation, in seconds.
    bundler_timeout_secs: u64,

    /// Turn recorded per-file errors into an overall failure.
    strict: bool,

    /// Dependencies that should be declared by the package descriptor.
    required_dependencies: Vec<String>,

    /// Deployment environment recorded in the metadata.
    environment: String,
}

impl BuildConfig {
    /// Returns the source root.
    pub fn source_dir(&self) -> &Path {
        &self.source_dir
    }

    /// Returns the output root.
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Returns the source directory layout.
    pub fn sources(&self) -> &SourceLayout {
        &self.sources
    }

    /// Returns the output directory layout.
    pub fn outputs(&self) -> &OutputLayout {
        &self.outputs
    }

    /// Returns the optimization switches.
    pub fn flags(&self) -> BuildFlags {
        self.flags
    }

    /// Returns the limit for one external bundler invocation.
    pub fn bundler_timeout(&self) -> Duration {
        Duration::from_secs(self.bundler_timeout_secs)
    }

    /// Whether per-file errors fail the build.
    pub fn strict(&self) -> bool {
        self.strict
    }

    /// Returns the dependencies the package descriptor should declare.
    pub fn required_dependencies(&self) -> &[String] {
        &self.required_dependencies
    }

    /// Returns the deployment environment name.
    pub fn environment(&self) -> &str {
        &self.environment
    }

    /// Resolves a source-relative directory against the source root.
    pub fn source_path(&self, relative: &Path) -> PathBuf {
        self.source_dir.join(relative)
    }

    /// Resolves an output subdirectory against the output root.
    pub fn output_path(&self, subdir: &str) -> PathBuf {
        self.output_dir.join(subdir)
    }

    /// Creates a new BuildConfig instance (used by BuildConfigBuilder).
    #[allow(clippy::too_many_arguments)]
    pub(super) fn new(
        source_dir: PathBuf,
        output_dir: PathBuf,
        sources: SourceLayout,
        outputs: OutputLayout,
        flags: BuildFlags,
        bundler_timeout: Duration,
        strict: bool,
        required_dependencies: Vec<String>,
        environment: String,
    ) -> Self {
        Self {
            source_dir,
            output_dir,
            sources,
            outputs,
            flags,
            bundler_timeout_secs: bundler_timeout.as_secs(),
            strict,
            required_dependencies,
            environment,
        }
    }
}
