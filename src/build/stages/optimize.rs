//! Post-build optimization hooks.
//!
//! Hooks run after the manifest is written and before metadata, so anything
//! they add is counted in the final stats. They only add files next to
//! existing outputs and never rename or remove anything the manifest refers
//! to.

use crate::build::BuildConfig;
use crate::build::constants::COMPRESSIBLE_EXTENSIONS;
use crate::build::error::{ErrorExt, Result};
use crate::build::events::Recorder;
use crate::build::utils::walk::walk_files;
use flate2::Compression;
use flate2::read::GzEncoder;
use std::future::Future;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::pin::Pin;

/// Future returned by [`OptimizationHook::run`].
pub type HookFuture<'a> = Pin<Box<dyn Future<Output = Result<()>> + 'a>>;

/// An extra pass over the finished output tree.
pub trait OptimizationHook: Send + Sync {
    fn name(&self) -> &str;

    /// Runs the pass. Per-file problems go to `rec`; a returned error is
    /// recorded against the hook as a whole.
    fn run<'a>(&'a self, config: &'a BuildConfig, rec: &'a mut Recorder<'_>) -> HookFuture<'a>;
}

/// Writes a `.gz` sibling for every compressible text output.
#[derive(Debug, Clone, Copy)]
pub struct GzipHook {
    level: Compression,
}

impl Default for GzipHook {
    fn default() -> Self {
        Self {
            level: Compression::best(),
        }
    }
}

impl GzipHook {
    async fn compress(&self, path: &Path) -> Result<(PathBuf, u64)> {
        let data = tokio::fs::read(path).await.fs_context("reading file", path)?;
        let level = self.level;
        let compressed = tokio::task::spawn_blocking(move || {
            let mut encoder = GzEncoder::new(data.as_slice(), level);
            let mut compressed = Vec::new();
            encoder.read_to_end(&mut compressed).map(|_| compressed)
        })
        .await
        .map_err(std::io::Error::other)
        .and_then(|encoded| encoded)
        .fs_context("compressing file", path)?;

        let mut target = path.as_os_str().to_owned();
        target.push(".gz");
        let target = PathBuf::from(target);
        tokio::fs::write(&target, &compressed)
            .await
            .fs_context("writing file", &target)?;
        Ok((target, compressed.len() as u64))
    }
}

impl OptimizationHook for GzipHook {
    fn name(&self) -> &str {
        "gzip"
    }

    fn run<'a>(&'a self, config: &'a BuildConfig, rec: &'a mut Recorder<'_>) -> HookFuture<'a> {
        Box::pin(async move {
            let outputs = config.outputs();
            for subdir in [
                &outputs.static_files,
                &outputs.assets,
                &outputs.pages,
                &outputs.components,
            ] {
                let root = config.output_path(subdir);
                if !root.is_dir() {
                    continue;
                }
                for file in walk_files(&root, Some(COMPRESSIBLE_EXTENSIONS))? {
                    match self.compress(&file.path).await {
                        Ok((target, size)) => rec.compressed_written(&target, size),
                        Err(e) => rec.warn(&file.path, format!("not compressed: {e}")),
                    }
                }
            }
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::BuildConfigBuilder;
    use crate::build::events::NoopEventSink;
    use crate::build::stats::BuildStats;
    use flate2::read::GzDecoder;

    #[tokio::test]
    async fn writes_gz_siblings_for_text_outputs_only() {
        let temp = tempfile::tempdir().unwrap();
        let config = BuildConfigBuilder::new()
            .source_dir(temp.path())
            .output_dir(temp.path().join("dist"))
            .build()
            .unwrap();
        let pages = config.output_path("pages");
        let statics = config.output_path("static");
        std::fs::create_dir_all(&pages).unwrap();
        std::fs::create_dir_all(&statics).unwrap();
        let script = "export default 1;".repeat(50);
        std::fs::write(pages.join("home.js"), &script).unwrap();
        std::fs::write(statics.join("logo.png"), [0u8, 1, 2, 3]).unwrap();

        let mut stats = BuildStats::new();
        let mut rec = Recorder::new(&mut stats, &NoopEventSink);
        GzipHook::default().run(&config, &mut rec).await.unwrap();

        let gz = pages.join("home.js.gz");
        let mut decoded = String::new();
        GzDecoder::new(std::fs::File::open(&gz).unwrap())
            .read_to_string(&mut decoded)
            .unwrap();
        assert_eq!(decoded, script);
        assert!(!statics.join("logo.png.gz").exists());
        assert_eq!(stats.files_generated(), 1);
        assert!(stats.compressed_size() > 0);
        assert_eq!(stats.total_size(), 0);
    }
}
