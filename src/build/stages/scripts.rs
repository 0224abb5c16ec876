//! Bundling of script directories (pages, components, API routes).

use super::{StageContext, optional_dir};
use crate::build::bundler::BundleOptions;
use crate::build::constants::SCRIPT_EXTENSIONS;
use crate::build::events::Recorder;
use crate::build::utils::walk::walk_files;
use std::path::{Path, PathBuf};

/// Output path for a bundled script: same relative location, `.js` extension.
pub fn bundled_path(target_root: &Path, relative: &Path) -> PathBuf {
    target_root.join(relative).with_extension("js")
}

/// Bundles every script under the source directory `source` into the output
/// subdirectory `target`. A missing source directory is a warning.
///
/// Returns the number of files written.
pub async fn bundle_directory(
    ctx: &StageContext<'_>,
    source: &Path,
    target: &str,
    options: &BundleOptions,
    rec: &mut Recorder<'_>,
) -> usize {
    let Some(source_dir) = optional_dir(ctx.config, source, rec) else {
        return 0;
    };
    let target_root = ctx.config.output_path(target);

    let files = match walk_files(&source_dir, Some(SCRIPT_EXTENSIONS)) {
        Ok(files) => files,
        Err(e) => {
            rec.error(&source_dir, format!("listing scripts: {e}"));
            return 0;
        }
    };

    let mut written = 0;
    for file in files {
        let output = bundled_path(&target_root, &file.relative);
        match ctx.bundler.bundle(&file.path, &output, options, rec).await {
            Ok(_) => written += 1,
            Err(e) => rec.error(&file.path, e.to_string()),
        }
    }
    written
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

    #[test]
    fn typescript_sources_become_js() {
        let root = Path::new("dist/pages");
        assert_eq!(
            bundled_path(root, Path::new("blog/post.tsx")),
            Path::new("dist/pages/blog/post.js")
        );
        assert_eq!(bundled_path(root, Path::new("home.mjs")), Path::new("dist/pages/home.js"));
    }

    #[tokio::test]
    async fn bundles_each_script_once_in_sorted_order() {
        let temp = tempfile::tempdir().unwrap();
        let pages = temp.path().join("app/pages");
        std::fs::create_dir_all(pages.join("blog")).unwrap();
        std::fs::write(pages.join("home.js"), "export default 'home'; // page").unwrap();
        std::fs::write(pages.join("blog/post.ts"), "export const post = 1;").unwrap();
        std::fs::write(pages.join("readme.md"), "# not a script").unwrap();

        let config = BuildConfigBuilder::new()
            .source_dir(temp.path().join("app"))
            .output_dir(temp.path().join("dist"))
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

        let mut stats = BuildStats::new();
        let mut rec = Recorder::new(&mut stats, &NoopEventSink);
        let written = bundle_directory(
            &ctx,
            &config.sources().pages,
            &config.outputs().pages,
            &BundleOptions::browser(&config),
            &mut rec,
        )
        .await;

        assert_eq!(written, 2);
        let out = temp.path().join("dist/pages");
        assert_eq!(
            std::fs::read_to_string(out.join("home.js")).unwrap(),
            "export default 'home';"
        );
        assert!(out.join("blog/post.js").is_file());
        assert!(!out.join("readme.md").exists());

        let warned: Vec<_> = stats.warnings().iter().map(|w| w.path.clone()).collect();
        assert_eq!(warned, [pages.join("blog/post.ts"), pages.join("home.js")]);
    }
}
