//! The individual pipeline stages.
//!
//! Each stage is a free function taking the shared [`StageContext`] and a
//! [`Recorder`]. Only [`prepare`] returns errors that abort the run; every
//! other stage records per-file failures and keeps going.
//!
//! - [`prepare`] - preflight checks, clean, scaffold
//! - [`templates`] - template compilation into `fml/`
//! - [`scripts`] - page, component and API bundling
//! - [`server`] - server entry, views, API routes
//! - [`static_assets`] - public and asset copies, content hashing
//! - [`optimize`] - post-build optimization hooks
//! - [`finalize`] - pruned package descriptor and README

pub mod finalize;
pub mod optimize;
pub mod prepare;
pub mod scripts;
pub mod server;
pub mod static_assets;
pub mod templates;

use crate::build::BuildConfig;
use crate::build::bundler::Bundler;
use crate::build::events::Recorder;
use crate::build::templates::TemplateCompiler;
use crate::metadata::PackageDescriptor;
use chrono::{DateTime, Utc};
use semver::Version;
use std::path::{Path, PathBuf};

/// Read-only state shared by every stage after preflight.
pub struct StageContext<'a> {
    pub config: &'a BuildConfig,
    pub bundler: &'a Bundler,
    pub compiler: &'a dyn TemplateCompiler,
    pub package: &'a PackageDescriptor,
    pub runtime_version: Option<&'a Version>,
    pub build_time: DateTime<Utc>,
}

/// Resolves an optional source directory, warning when it is absent.
pub(crate) fn optional_dir(
    config: &BuildConfig,
    relative: &Path,
    rec: &mut Recorder<'_>,
) -> Option<PathBuf> {
    let dir = config.source_path(relative);
    if dir.is_dir() {
        Some(dir)
    } else {
        rec.warn(&dir, "directory not found; skipped");
        None
    }
}
