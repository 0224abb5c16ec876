//! Single-file bundling with a degraded fallback.
//!
//! [`Bundler`] turns one source file into one optimized output file. The
//! native path runs the external `esbuild` tool; when that tool is missing,
//! fails, or times out, the textual [`FallbackMinifier`] produces the output
//! instead and a warning naming the file is recorded. The bundler never
//! aborts a build.
//!
//! # Module Organization
//!
//! - [`options`] - [`BundleOptions`] and their translation to tool flags
//! - [`esbuild`] - subprocess adapter with timeout and forced kill
//! - [`fallback`] - comment-stripping, whitespace-collapsing minifier

pub mod esbuild;
pub mod fallback;
mod options;

pub use esbuild::EsbuildAdapter;
pub use fallback::FallbackMinifier;
pub use options::{BundleOptions, Format, Platform};

use crate::build::builder::ExternalTool;
use crate::build::constants::BUNDLER_PROGRAM;
use crate::build::error::Result;
use crate::build::events::Recorder;
use std::future::Future;
use std::path::Path;
use std::time::Duration;

/// A way of producing one output file from one input file.
pub trait BundleBackend {
    /// Human-readable backend name used in logs and warnings.
    fn name(&self) -> &'static str;

    /// Writes the bundled form of `input` to `output` and returns its size in bytes.
    fn bundle(
        &self,
        input: &Path,
        output: &Path,
        options: &BundleOptions,
    ) -> impl Future<Output = Result<u64>> + Send;
}

/// Chooses between the native adapter and the fallback for every file.
///
/// The choice of native tool is made once, by the availability probe at the
/// start of the run; the fallback is always present.
#[derive(Debug, Clone)]
pub struct Bundler {
    native: Option<EsbuildAdapter>,
    fallback: FallbackMinifier,
}

impl Bundler {
    /// Creates a bundler that prefers `tool` when one was found.
    pub fn new(tool: Option<&ExternalTool>, timeout: Duration) -> Self {
        Self {
            native: tool.map(|t| EsbuildAdapter::new(t, timeout)),
            fallback: FallbackMinifier,
        }
    }

    /// Creates a bundler that always uses the fallback minifier.
    pub fn fallback_only() -> Self {
        Self {
            native: None,
            fallback: FallbackMinifier,
        }
    }

    /// Whether the native tool will be tried first.
    pub fn has_native(&self) -> bool {
        self.native.is_some()
    }

    /// Bundles `input` into `output`, recording the outcome.
    ///
    /// A native failure of any kind degrades to the fallback with a warning.
    /// Only a failure of the fallback itself is returned, and the caller
    /// records it as a per-file error.
    pub async fn bundle(
        &self,
        input: &Path,
        output: &Path,
        options: &BundleOptions,
        rec: &mut Recorder<'_>,
    ) -> Result<u64> {
        rec.processed();

        let reason = match &self.native {
            Some(native) => match native.bundle(input, output, options).await {
                Ok(size) => {
                    rec.file_written(output, size);
                    return Ok(size);
                }
                Err(e) => format!("{} failed ({e})", native.name()),
            },
            None => format!("{BUNDLER_PROGRAM} is unavailable"),
        };

        rec.warn(
            input,
            format!(
                "{reason}; bundled {} with the {} instead",
                file_label(input),
                self.fallback.name()
            ),
        );

        let size = self.fallback.bundle(input, output, options).await?;
        rec.file_written(output, size);
        Ok(size)
    }
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::BuildConfigBuilder;
    use crate::build::events::NoopEventSink;
    use crate::build::stats::BuildStats;

    #[tokio::test]
    async fn missing_tool_falls_back_with_one_warning() {
        let temp = tempfile::tempdir().unwrap();
        let input = temp.path().join("home.js");
        std::fs::write(&input, "/* hi */ export default 1;").unwrap();
        let output = temp.path().join("dist/pages/home.js");
        let config = BuildConfigBuilder::new().source_dir("app").build().unwrap();

        let mut stats = BuildStats::new();
        let mut rec = Recorder::new(&mut stats, &NoopEventSink);
        let size = Bundler::fallback_only()
            .bundle(&input, &output, &BundleOptions::browser(&config), &mut rec)
            .await
            .unwrap();

        assert_eq!(size, "export default 1;".len() as u64);
        assert_eq!(stats.files_processed(), 1);
        assert_eq!(stats.files_generated(), 1);
        assert_eq!(stats.warnings().len(), 1);
        let warning = stats.warnings()[0].to_string();
        assert!(warning.contains("home.js"));
        assert!(warning.contains("fallback"));
    }

    #[tokio::test]
    async fn fallback_failure_is_returned_to_the_caller() {
        let temp = tempfile::tempdir().unwrap();
        let config = BuildConfigBuilder::new().source_dir("app").build().unwrap();

        let mut stats = BuildStats::new();
        let mut rec = Recorder::new(&mut stats, &NoopEventSink);
        let result = Bundler::fallback_only()
            .bundle(
                &temp.path().join("missing.js"),
                &temp.path().join("out.js"),
                &BundleOptions::browser(&config),
                &mut rec,
            )
            .await;

        assert!(result.is_err());
        assert_eq!(stats.files_generated(), 0);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn failing_native_tool_degrades_to_fallback() {
        use std::os::unix::fs::PermissionsExt;

        let temp = tempfile::tempdir().unwrap();
        let tool_path = temp.path().join("broken-esbuild");
        std::fs::write(&tool_path, "#!/bin/sh\nexit 1\n").unwrap();
        std::fs::set_permissions(&tool_path, std::fs::Permissions::from_mode(0o755)).unwrap();
        let tool = ExternalTool {
            path: tool_path,
            version: "broken".into(),
        };

        let input = temp.path().join("card.js");
        std::fs::write(&input, "export const card = 1; // c").unwrap();
        let output = temp.path().join("out/card.js");
        let config = BuildConfigBuilder::new().source_dir("app").build().unwrap();

        let mut stats = BuildStats::new();
        let mut rec = Recorder::new(&mut stats, &NoopEventSink);
        let bundler = Bundler::new(Some(&tool), Duration::from_secs(10));
        assert!(bundler.has_native());
        bundler
            .bundle(&input, &output, &BundleOptions::browser(&config), &mut rec)
            .await
            .unwrap();

        assert_eq!(std::fs::read_to_string(output).unwrap(), "export const card = 1;");
        assert!(stats.warnings()[0].message.contains("esbuild failed"));
    }
}
