//! Command line argument parsing and validation.
//!
//! This module provides CLI argument parsing using clap, plus the
//! environment variables read at the process boundary.

use crate::build::constants::{DEFAULT_BUNDLER_TIMEOUT, DEFAULT_ENVIRONMENT, DEFAULT_OUTPUT_DIR};
use crate::build::{BuildConfig, BuildConfigBuilder};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// Production build orchestrator for FML applications
#[derive(Parser, Debug)]
#[command(
    name = "fml_build",
    version,
    about = "Production build for FML applications",
    long_about = "Bundles pages, components, the server entry and API routes, copies views and \
templates, content-hashes static assets and writes a deployable output directory.

Usage:
  fml_build
  fml_build --source my-app --output my-app/dist
  fml_build --no-minify --no-hash

Environment:
  SOURCE_MAPS=false     disable source maps
  NODE_ENV              environment recorded in build metadata (default: production)
  FML_BUNDLER_TIMEOUT   bundler time limit in seconds
  RUST_LOG              log verbosity (e.g. debug)

Exit code 0 = output directory is complete (per-file errors are reported, \
and fail the run only with --strict)."
)]
pub struct Args {
    /// Application root directory
    #[arg(short = 's', long, value_name = "DIR", default_value = ".")]
    pub source: PathBuf,

    /// Output directory, destroyed and rebuilt on every run
    #[arg(short = 'o', long, value_name = "DIR", default_value = DEFAULT_OUTPUT_DIR)]
    pub output: PathBuf,

    /// Skip minification
    #[arg(long)]
    pub no_minify: bool,

    /// Skip source map generation
    #[arg(long)]
    pub no_sourcemap: bool,

    /// Skip content hashing of static assets
    #[arg(long)]
    pub no_hash: bool,

    /// Skip writing gzip copies of text assets
    #[arg(long)]
    pub no_compress: bool,

    /// Fail the build when any file could not be processed
    #[arg(long)]
    pub strict: bool,

    /// Time limit for one bundler invocation, in seconds
    #[arg(
        long,
        value_name = "SECS",
        env = "FML_BUNDLER_TIMEOUT",
        default_value_t = DEFAULT_BUNDLER_TIMEOUT.as_secs()
    )]
    pub bundler_timeout: u64,

    /// Print every written file and every diagnostic as it happens
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only print errors
    #[arg(short, long)]
    pub quiet: bool,
}

/// Environment variables that influence the build.
#[derive(Debug, Clone, Default)]
pub struct BuildEnvironment {
    /// Raw `SOURCE_MAPS` value.
    pub source_maps: Option<String>,
    /// Raw `NODE_ENV` value.
    pub node_env: Option<String>,
}

impl BuildEnvironment {
    /// Reads the variables from the current process.
    pub fn from_process() -> Self {
        Self {
            source_maps: std::env::var("SOURCE_MAPS").ok(),
            node_env: std::env::var("NODE_ENV").ok(),
        }
    }

    /// `SOURCE_MAPS=false` (any case) turns source maps off; anything else
    /// leaves them on.
    pub fn source_maps_enabled(&self) -> bool {
        !self
            .source_maps
            .as_deref()
            .is_some_and(|value| value.trim().eq_ignore_ascii_case("false"))
    }

    pub fn environment(&self) -> &str {
        self.node_env
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .unwrap_or(DEFAULT_ENVIRONMENT)
    }
}

impl Args {
    /// Validate arguments for consistency
    pub fn validate(&self) -> Result<(), String> {
        if self.source.as_os_str().is_empty() {
            return Err("Source cannot be empty".to_string());
        }
        if self.output.as_os_str().is_empty() {
            return Err("Output cannot be empty".to_string());
        }
        if self.bundler_timeout == 0 {
            return Err("Bundler timeout must be at least 1 second".to_string());
        }
        Ok(())
    }

    /// Builds the run configuration from flags and environment.
    pub fn to_build_config(&self, env: &BuildEnvironment) -> crate::build::Result<BuildConfig> {
        BuildConfigBuilder::new()
            .source_dir(&self.source)
            .output_dir(&self.output)
            .minify(!self.no_minify)
            .source_maps(!self.no_sourcemap && env.source_maps_enabled())
            .hash_assets(!self.no_hash)
            .compression(!self.no_compress)
            .strict(self.strict)
            .bundler_timeout(Duration::from_secs(self.bundler_timeout))
            .environment(env.environment())
            .build()
    }
}

/// Configuration derived from command line arguments
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Output manager for colored terminal output
    output: super::OutputManager,
}

impl From<&Args> for RuntimeConfig {
    fn from(args: &Args) -> Self {
        Self {
            output: super::OutputManager::new(args.verbose, args.quiet),
        }
    }
}

impl RuntimeConfig {
    /// Get a reference to the output manager
    pub fn output(&self) -> &super::OutputManager {
        &self.output
    }

    /// Print success message if not in quiet mode
    pub fn success(&self, message: &str) -> std::io::Result<()> {
        self.output.success(message)
    }

    /// Print error message
    pub fn error(&self, message: &str) -> std::io::Result<()> {
        self.output.error(message)
    }

    /// Print section header
    pub fn section(&self, title: &str) -> std::io::Result<()> {
        self.output.section(title)
    }

    /// Print indented text
    pub fn indent(&self, message: &str) -> std::io::Result<()> {
        self.output.indent(message)
    }

    /// Print plain text
    pub fn println(&self, message: &str) -> std::io::Result<()> {
        self.output.println(message)
    }
}
