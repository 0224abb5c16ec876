//! Builder for constructing BuildConfig.

use super::{BuildConfig, BuildFlags, OutputLayout, SourceLayout};
use crate::build::constants::{
    DEFAULT_BUNDLER_TIMEOUT, DEFAULT_ENVIRONMENT, DEFAULT_OUTPUT_DIR,
    DEFAULT_REQUIRED_DEPENDENCIES,
};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Builder for constructing [`BuildConfig`].
///
/// # Examples
///
/// ```no_run
/// use fml_build::build::BuildConfigBuilder;
/// use std::time::Duration;
///
/// # fn example() -> fml_build::build::Result<()> {
/// let config = BuildConfigBuilder::new()
///     .source_dir(".")
///     .output_dir("dist")
///     .hash_assets(false)
///     .bundler_timeout(Duration::from_secs(30))
///     .strict(true)
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct BuildConfigBuilder {
    source_dir: Option<PathBuf>,
    output_dir: Option<PathBuf>,
    sources: SourceLayout,
    outputs: OutputLayout,
    flags: BuildFlags,
    bundler_timeout: Option<Duration>,
    strict: bool,
    required_dependencies: Option<Vec<String>>,
    environment: Option<String>,
}

impl BuildConfigBuilder {
    /// Creates a new config builder.
    pub fn new() -> Self {
        Default::default()
    }

    /// Sets the application source root.
    ///
    /// # Required
    ///
    /// This field is required for building.
    pub fn source_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.source_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the output root.
    ///
    /// Default: `dist`
    pub fn output_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.output_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Overrides the source directory names.
    pub fn sources(mut self, sources: SourceLayout) -> Self {
        self.sources = sources;
        self
    }

    /// Overrides the output subdirectory names.
    pub fn outputs(mut self, outputs: OutputLayout) -> Self {
        self.outputs = outputs;
        self
    }

    /// Replaces all optimization switches at once.
    pub fn flags(mut self, flags: BuildFlags) -> Self {
        self.flags = flags;
        self
    }

    pub fn minify(mut self, enabled: bool) -> Self {
        self.flags.minify = enabled;
        self
    }

    pub fn source_maps(mut self, enabled: bool) -> Self {
        self.flags.source_maps = enabled;
        self
    }

    pub fn compression(mut self, enabled: bool) -> Self {
        self.flags.compression = enabled;
        self
    }

    pub fn hash_assets(mut self, enabled: bool) -> Self {
        self.flags.hash_assets = enabled;
        self
    }

    pub fn tree_shaking(mut self, enabled: bool) -> Self {
        self.flags.tree_shaking = enabled;
        self
    }

    /// Sets the limit for one external bundler invocation.
    ///
    /// Default: 120 seconds
    pub fn bundler_timeout(mut self, timeout: Duration) -> Self {
        self.bundler_timeout = Some(timeout);
        self
    }

    /// Fails the build when any per-file error was recorded.
    ///
    /// Default: false (per-file errors are reported but the build succeeds)
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Sets the dependencies the package descriptor should declare.
    ///
    /// Default: `["express"]`
    pub fn required_dependencies<I, S>(mut self, deps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required_dependencies = Some(deps.into_iter().map(Into::into).collect());
        self
    }

    /// Sets the deployment environment name.
    ///
    /// Default: `production`
    pub fn environment<S: Into<String>>(mut self, environment: S) -> Self {
        self.environment = Some(environment.into());
        self
    }

    /// Builds the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if `source_dir` is missing or the bundler timeout is
    /// shorter than one second.
    pub fn build(self) -> crate::build::Result<BuildConfig> {
        use crate::build::error::Context;

        let bundler_timeout = self.bundler_timeout.unwrap_or(DEFAULT_BUNDLER_TIMEOUT);
        if bundler_timeout < Duration::from_secs(1) {
            crate::bail!("bundler timeout must be at least one second");
        }

        Ok(BuildConfig::new(
            self.source_dir.context("source_dir is required")?,
            self.output_dir
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR)),
            self.sources,
            self.outputs,
            self.flags,
            bundler_timeout,
            self.strict,
            self.required_dependencies.unwrap_or_else(|| {
                DEFAULT_REQUIRED_DEPENDENCIES
                    .iter()
                    .map(|d| d.to_string())
                    .collect()
            }),
            self.environment
                .unwrap_or_else(|| DEFAULT_ENVIRONMENT.to_string()),
        ))
    }
}
