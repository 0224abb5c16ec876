//! Per-invocation bundling options.

use crate::build::BuildConfig;
use std::ffi::OsString;
use std::fmt;
use std::path::Path;

/// Output module format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Esm,
    Cjs,
    Iife,
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Format::Esm => "esm",
            Format::Cjs => "cjs",
            Format::Iife => "iife",
        })
    }
}

/// Runtime the bundle targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Browser,
    Node,
    Neutral,
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Platform::Browser => "browser",
            Platform::Node => "node",
            Platform::Neutral => "neutral",
        })
    }
}

/// How one file is bundled. Built per call, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleOptions {
    pub format: Format,
    pub platform: Platform,
    pub minify: bool,
    pub sourcemap: bool,
    pub tree_shaking: bool,
    /// Modules left as runtime imports instead of being inlined.
    pub external: Vec<String>,
}

impl BundleOptions {
    /// Options for pages and components shipped to the browser.
    pub fn browser(config: &BuildConfig) -> Self {
        let flags = config.flags();
        Self {
            format: Format::Esm,
            platform: Platform::Browser,
            minify: flags.minify,
            sourcemap: flags.source_maps,
            tree_shaking: flags.tree_shaking,
            external: Vec::new(),
        }
    }

    /// Options for the server entry and API routes.
    ///
    /// Runtime dependencies stay external so they resolve from the deployed
    /// `node_modules`.
    pub fn node(config: &BuildConfig, external: Vec<String>) -> Self {
        Self {
            platform: Platform::Node,
            external,
            ..Self::browser(config)
        }
    }

    /// Translates the options into `esbuild` command-line arguments.
    pub fn to_args(&self, input: &Path, output: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            input.as_os_str().to_owned(),
            "--bundle".into(),
            format!("--format={}", self.format).into(),
            format!("--platform={}", self.platform).into(),
            format!("--tree-shaking={}", self.tree_shaking).into(),
            "--log-level=warning".into(),
        ];
        if self.minify {
            args.push("--minify".into());
        }
        if self.sourcemap {
            args.push("--sourcemap".into());
        }
        for module in &self.external {
            args.push(format!("--external:{module}").into());
        }

        let mut outfile = OsString::from("--outfile=");
        outfile.push(output.as_os_str());
        args.push(outfile);
        args
    }
}
