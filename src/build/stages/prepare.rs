//! Fatal setup stages: preflight, clean and scaffold.
//!
//! Any error returned from here aborts the run before application output is
//! written.

use crate::build::builder::{ExternalTool, HostProbe};
use crate::build::constants::{MIN_RUNTIME_VERSION, PACKAGE_FILE, RUNTIME_PROGRAM};
use crate::build::error::{Error, Result};
use crate::build::events::Recorder;
use crate::build::utils::fs::{create_dir_all, remove_dir_all};
use crate::build::BuildConfig;
use crate::metadata::{PackageDescriptor, load_package_descriptor};
use path_absolutize::Absolutize;
use semver::Version;

/// What preflight learned about the host and the project.
#[derive(Debug, Clone)]
pub struct PreflightReport {
    pub package: PackageDescriptor,
    pub runtime_version: Option<Version>,
    pub bundler_tool: Option<ExternalTool>,
}

/// Validates the source tree and host before anything is touched.
///
/// Fatal: missing source directory, an output directory that would swallow
/// the sources when cleaned, a runtime older than [`MIN_RUNTIME_VERSION`].
/// Everything else is a warning.
pub async fn preflight<P: HostProbe>(
    config: &BuildConfig,
    probe: &P,
    rec: &mut Recorder<'_>,
) -> Result<PreflightReport> {
    let source = config.source_dir();
    if !source.is_dir() {
        return Err(Error::SourceMissing(source.to_path_buf()));
    }

    check_output_placement(config)?;

    let runtime_version = probe.runtime_version().await;
    match &runtime_version {
        Some(found) if *found < MIN_RUNTIME_VERSION => {
            return Err(Error::RuntimeTooOld {
                found: found.clone(),
                required: MIN_RUNTIME_VERSION,
            });
        }
        Some(found) => log::debug!("{RUNTIME_PROGRAM} {found} satisfies >= {MIN_RUNTIME_VERSION}"),
        None => rec.warn(
            RUNTIME_PROGRAM,
            format!(
                "runtime not found; cannot verify version >= {MIN_RUNTIME_VERSION}"
            ),
        ),
    }

    let package_path = source.join(PACKAGE_FILE);
    let package = if package_path.is_file() {
        match load_package_descriptor(&package_path) {
            Ok(package) => package,
            Err(e) => {
                rec.warn(&package_path, format!("unreadable package descriptor ({e}); using defaults"));
                PackageDescriptor::default()
            }
        }
    } else {
        rec.warn(&package_path, "package descriptor not found; using defaults");
        PackageDescriptor::default()
    };

    for dependency in package.missing_dependencies(config.required_dependencies()) {
        rec.warn(
            &package_path,
            format!("required dependency `{dependency}` is not declared"),
        );
    }

    let bundler_tool = probe.bundler_tool().await;
    match &bundler_tool {
        Some(tool) => log::info!("Using {} ({})", tool.path.display(), tool.version),
        None => log::info!("No external bundler found; the fallback minifier will be used"),
    }

    Ok(PreflightReport {
        package,
        runtime_version,
        bundler_tool,
    })
}

/// Refuses an output directory that contains the source root or lives inside
/// one of the input directories, since cleaning it would delete sources.
fn check_output_placement(config: &BuildConfig) -> Result<()> {
    let output_abs = config.output_dir().absolutize()?.into_owned();
    let unsafe_output = |source_dir: &std::path::Path| Error::UnsafeOutput {
        output: config.output_dir().to_path_buf(),
        source_dir: source_dir.to_path_buf(),
    };

    let source = config.source_dir();
    if source.absolutize()?.starts_with(&output_abs) {
        return Err(unsafe_output(source));
    }

    for relative in config.sources().all() {
        let input = config.source_path(relative);
        let input_abs = input.absolutize()?;
        if output_abs.starts_with(&input_abs) {
            return Err(unsafe_output(&input));
        }
    }
    Ok(())
}

/// Removes the previous output tree.
pub async fn clean(config: &BuildConfig) -> Result<()> {
    remove_dir_all(config.output_dir()).await
}

/// Creates the output root and every output subdirectory.
pub async fn scaffold(config: &BuildConfig) -> Result<()> {
    create_dir_all(config.output_dir(), false).await?;
    for subdir in config.outputs().all() {
        create_dir_all(&config.output_path(subdir), false).await?;
    }
    Ok(())
}
