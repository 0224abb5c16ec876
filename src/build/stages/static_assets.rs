//! Static file copies and content hashing.

use super::StageContext;
use crate::build::assets::{AssetManifest, hash_assets};
use crate::build::events::Recorder;
use crate::build::utils::fs::copy_file;
use crate::build::utils::walk::walk_files;
use std::path::Path;

/// Copies `public/` into `static/` and `assets/` into `assets/`, then hashes
/// the static tree when enabled.
///
/// The `public` directory warns when absent; `assets` is silently optional.
pub async fn process_static(
    ctx: &StageContext<'_>,
    manifest: &mut AssetManifest,
    rec: &mut Recorder<'_>,
) {
    let config = ctx.config;
    let static_root = config.output_path(&config.outputs().static_files);

    let public = config.source_path(&config.sources().public);
    if public.is_dir() {
        copy_tree(&public, &static_root, rec).await;
    } else {
        rec.warn(&public, "directory not found; skipped");
    }

    let assets = config.source_path(&config.sources().assets);
    if assets.is_dir() {
        copy_tree(&assets, &config.output_path(&config.outputs().assets), rec).await;
    } else {
        log::debug!("No assets directory at {}", assets.display());
    }

    if config.flags().hash_assets {
        let renamed = hash_assets(&static_root, manifest, rec).await;
        log::info!("Hashed {renamed} static assets");
    }
}

async fn copy_tree(from: &Path, to: &Path, rec: &mut Recorder<'_>) {
    let files = match walk_files(from, None) {
        Ok(files) => files,
        Err(e) => {
            rec.error(from, format!("listing files: {e}"));
            return;
        }
    };

    for file in files {
        rec.processed();
        let output = to.join(&file.relative);
        match copy_file(&file.path, &output).await {
            Ok(size) => rec.file_written(&output, size),
            Err(e) => rec.error(&file.path, e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::BuildConfigBuilder;
    use crate::build::bundler::Bundler;
    use crate::build::events::NoopEventSink;
    use crate::build::stats::BuildStats;
    use crate::build::templates::IdentityCompiler;
    use crate::metadata::PackageDescriptor;

    async fn run(hash: bool) -> (tempfile::TempDir, AssetManifest, BuildStats) {
        let temp = tempfile::tempdir().unwrap();
        let app = temp.path().join("app");
        std::fs::create_dir_all(app.join("public/css")).unwrap();
        std::fs::create_dir_all(app.join("assets")).unwrap();
        std::fs::write(app.join("public/css/site.css"), "body{}").unwrap();
        std::fs::write(app.join("public/robots.txt"), "User-agent: *").unwrap();
        std::fs::write(app.join("assets/logo.svg"), "<svg/>").unwrap();

        let config = BuildConfigBuilder::new()
            .source_dir(&app)
            .output_dir(temp.path().join("dist"))
            .hash_assets(hash)
            .build()
            .unwrap();
        let bundler = Bundler::fallback_only();
        let package = PackageDescriptor::default();
        let ctx = StageContext {
            config: &config,
            bundler: &bundler,
            compiler: &IdentityCompiler,
            package: &package,
            runtime_version: None,
            build_time: chrono::Utc::now(),
        };

        let mut manifest = AssetManifest::new();
        let mut stats = BuildStats::new();
        let mut rec = Recorder::new(&mut stats, &NoopEventSink);
        process_static(&ctx, &mut manifest, &mut rec).await;
        (temp, manifest, stats)
    }

    #[tokio::test]
    async fn public_files_are_copied_and_hashed() {
        let (temp, manifest, stats) = run(true).await;
        let dist = temp.path().join("dist");

        let hashed = manifest.get("css/site.css").unwrap();
        assert!(dist.join("static").join(hashed).is_file());
        assert!(!dist.join("static/css/site.css").exists());
        assert!(dist.join("static/robots.txt").is_file());
        assert_eq!(manifest.len(), 1);
        // assets/ is copied but never hashed
        assert!(dist.join("assets/logo.svg").is_file());
        assert_eq!(stats.files_processed(), 3);
    }

    #[tokio::test]
    async fn hashing_can_be_disabled() {
        let (temp, manifest, _) = run(false).await;
        assert!(manifest.is_empty());
        assert!(temp.path().join("dist/static/css/site.css").is_file());
    }
}
