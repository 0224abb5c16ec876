//! In-place content addressing of static assets.
//!
//! Every eligible file under the static output root is renamed from
//! `name.ext` to `name.<hash>.ext`. A manifest entry is written only after
//! the rename succeeded, so the manifest never points at a missing file.
//! Files with identical bytes get the same hash suffix but keep their own
//! base names; nothing is deduplicated.

use super::checksum::content_hash;
use super::manifest::AssetManifest;
use crate::build::constants::HASHABLE_EXTENSIONS;
use crate::build::events::Recorder;
use crate::build::utils::walk::{has_extension, to_slash, walk_files};
use std::path::{Path, PathBuf};

/// Whether a file is a style sheet, script, image or font that gets hashed.
pub fn is_hashable(path: &Path) -> bool {
    has_extension(path, HASHABLE_EXTENSIONS)
}

/// Inserts `hash` before the final extension: `app.min.css` → `app.min.<hash>.css`.
///
/// Returns `None` for names without an extension or that are not valid UTF-8.
pub fn hashed_file_name(path: &Path, hash: &str) -> Option<PathBuf> {
    let stem = path.file_stem()?.to_str()?;
    let ext = path.extension()?.to_str()?;
    Some(path.with_file_name(format!("{stem}.{hash}.{ext}")))
}

/// Hashes every eligible file under `static_root` and records the renames.
///
/// Files are visited once each, in sorted order. Returns the number of files
/// renamed.
pub async fn hash_assets(
    static_root: &Path,
    manifest: &mut AssetManifest,
    rec: &mut Recorder<'_>,
) -> usize {
    let files = match walk_files(static_root, Some(HASHABLE_EXTENSIONS)) {
        Ok(files) => files,
        Err(e) => {
            rec.error(static_root, format!("listing static assets: {e}"));
            return 0;
        }
    };

    let mut renamed = 0;
    for file in files {
        let hash = match content_hash(&file.path).await {
            Ok(hash) => hash,
            Err(e) => {
                rec.error(&file.path, e.to_string());
                continue;
            }
        };

        let (Some(target), Some(relative_target)) = (
            hashed_file_name(&file.path, &hash),
            hashed_file_name(&file.relative, &hash),
        ) else {
            rec.warn(&file.path, "file name is not valid UTF-8; left unhashed");
            continue;
        };

        if tokio::fs::try_exists(&target).await.unwrap_or(false) {
            rec.warn(
                &file.path,
                format!(
                    "{} already exists; keeping original name",
                    target.display()
                ),
            );
            continue;
        }

        match tokio::fs::rename(&file.path, &target).await {
            Ok(()) => {
                let original = to_slash(&file.relative);
                let hashed = to_slash(&relative_target);
                log::debug!("{} -> {}", original, hashed);
                rec.asset_hashed(&original, &hashed);
                manifest.insert(original, hashed);
                renamed += 1;
            }
            Err(e) => rec.warn(
                &file.path,
                format!(
                    "could not rename to {}: {e}; keeping original name",
                    target.display()
                ),
            ),
        }
    }

    renamed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::events::NoopEventSink;
    use crate::build::stats::BuildStats;

    #[test]
    fn hash_goes_before_the_last_extension() {
        assert_eq!(
            hashed_file_name(Path::new("css/app.min.css"), "deadbeef"),
            Some(PathBuf::from("css/app.min.deadbeef.css"))
        );
        assert_eq!(hashed_file_name(Path::new("LICENSE"), "deadbeef"), None);
    }

    #[test]
    fn only_allow_listed_extensions_are_hashable() {
        for name in ["a.css", "b.JS", "c.woff2", "d.png", "e.svg"] {
            assert!(is_hashable(Path::new(name)), "{name}");
        }
        for name in ["robots.txt", "index.html", "data.json", "noext"] {
            assert!(!is_hashable(Path::new(name)), "{name}");
        }
    }

    #[tokio::test]
    async fn identical_content_shares_a_suffix_but_not_a_name() {
        let temp = tempfile::tempdir().unwrap();
        let root = temp.path();
        std::fs::write(root.join("a.css"), "body{}").unwrap();
        std::fs::write(root.join("b.css"), "body{}").unwrap();
        std::fs::write(root.join("robots.txt"), "User-agent: *").unwrap();

        let mut manifest = AssetManifest::new();
        let mut stats = BuildStats::new();
        let mut rec = Recorder::new(&mut stats, &NoopEventSink);
        let renamed = hash_assets(root, &mut manifest, &mut rec).await;

        assert_eq!(renamed, 2);
        let a = manifest.get("a.css").unwrap();
        let b = manifest.get("b.css").unwrap();
        assert_ne!(a, b);
        assert_eq!(a.split('.').nth(1), b.split('.').nth(1));
        assert!(root.join(a).exists());
        assert!(!root.join("a.css").exists());
        assert!(root.join("robots.txt").exists());
        assert!(manifest.get("robots.txt").is_none());
    }

    #[tokio::test]
    async fn nested_paths_use_forward_slashes() {
        let temp = tempfile::tempdir().unwrap();
        let nested = temp.path().join("img/icons");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(nested.join("logo.svg"), "<svg/>").unwrap();

        let mut manifest = AssetManifest::new();
        let mut stats = BuildStats::new();
        let mut rec = Recorder::new(&mut stats, &NoopEventSink);
        hash_assets(temp.path(), &mut manifest, &mut rec).await;

        let hashed = manifest.get("img/icons/logo.svg").unwrap();
        assert!(hashed.starts_with("img/icons/logo."));
        assert!(hashed.ends_with(".svg"));
    }

    #[tokio::test]
    async fn occupied_target_keeps_the_original_and_warns() {
        let temp = tempfile::tempdir().unwrap();
        let root = temp.path();
        std::fs::write(root.join("a.css"), "body{}").unwrap();
        let hash = content_hash(&root.join("a.css")).await.unwrap();
        let occupied = format!("a.{hash}.css");
        std::fs::write(root.join(&occupied), "something else").unwrap();

        let mut manifest = AssetManifest::new();
        let mut stats = BuildStats::new();
        {
            let mut rec = Recorder::new(&mut stats, &NoopEventSink);
            hash_assets(root, &mut manifest, &mut rec).await;
        }

        assert!(root.join("a.css").exists());
        assert!(manifest.get("a.css").is_none());
        assert!(stats.warnings().iter().any(|w| w.path.ends_with("a.css")));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn failed_rename_keeps_the_original_and_warns() {
        let temp = tempfile::tempdir().unwrap();
        let root = temp.path();
        // Fits in one path component, but the hashed name no longer does.
        let long_name = format!("{}.css", "a".repeat(251));
        std::fs::write(root.join(&long_name), "body{}").unwrap();
        std::fs::write(root.join("b.css"), "p{}").unwrap();

        let mut manifest = AssetManifest::new();
        let mut stats = BuildStats::new();
        let renamed = {
            let mut rec = Recorder::new(&mut stats, &NoopEventSink);
            hash_assets(root, &mut manifest, &mut rec).await
        };

        assert_eq!(renamed, 1);
        assert!(root.join(&long_name).exists());
        assert!(manifest.get(&long_name).is_none());
        assert!(manifest.get("b.css").is_some());
        let warning = stats
            .warnings()
            .iter()
            .find(|w| w.path.ends_with(&long_name))
            .unwrap();
        assert!(warning.message.contains("could not rename"));
        assert!(stats.errors().is_empty());
    }
}
