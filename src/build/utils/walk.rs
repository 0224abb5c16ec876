//! Deterministic file enumeration.
//!
//! `walkdir` traverses with an explicit stack, so pathological nesting cannot
//! overflow the call stack. Results are sorted by relative path so every
//! stage sees the same order on every platform and filesystem.

use crate::build::error::Result;
use std::path::{Component, Path, PathBuf};

/// A regular file found under a walk root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkedFile {
    /// Full path of the file.
    pub path: PathBuf,
    /// Path relative to the walk root.
    pub relative: PathBuf,
}

/// Lists every regular file under `root`, sorted by relative path.
///
/// When `extensions` is given, only files whose extension matches one of the
/// entries (case-insensitively) are returned. Symlinks to regular files are
/// listed under the link's own path; directory symlinks are not descended
/// into and dangling links are skipped, both with a logged warning.
pub fn walk_files(root: &Path, extensions: Option<&[&str]>) -> Result<Vec<WalkedFile>> {
    let mut files = Vec::new();

    for entry in walkdir::WalkDir::new(root).follow_links(false) {
        let entry = entry?;
        let file_type = entry.file_type();
        if file_type.is_symlink() {
            match std::fs::metadata(entry.path()) {
                Ok(target) if target.is_file() => {}
                Ok(_) => {
                    log::warn!("{}: directory symlink not followed", entry.path().display());
                    continue;
                }
                Err(e) => {
                    log::warn!("{}: dangling symlink skipped ({e})", entry.path().display());
                    continue;
                }
            }
        } else if !file_type.is_file() {
            continue;
        }
        if let Some(allowed) = extensions
            && !has_extension(entry.path(), allowed)
        {
            continue;
        }

        let relative = entry.path().strip_prefix(root)?.to_path_buf();
        files.push(WalkedFile {
            path: entry.path().to_path_buf(),
            relative,
        });
    }

    files.sort_by(|a, b| a.relative.cmp(&b.relative));
    Ok(files)
}

/// Whether `path` ends in one of `allowed` (case-insensitive, without the dot).
pub fn has_extension(path: &Path, allowed: &[&str]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| allowed.iter().any(|a| a.eq_ignore_ascii_case(ext)))
}

/// Renders a relative path with `/` separators, independent of the host OS.
pub fn to_slash(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(root: &Path, relative: &str) {
        let path = root.join(relative);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, relative).unwrap();
    }

    #[test]
    fn files_come_back_sorted_by_relative_path() {
        let temp = tempfile::tempdir().unwrap();
        for name in ["zeta.js", "alpha/b.js", "alpha/a.js", "beta.js"] {
            touch(temp.path(), name);
        }

        let files = walk_files(temp.path(), None).unwrap();
        let relative: Vec<_> = files.iter().map(|f| to_slash(&f.relative)).collect();

        assert_eq!(relative, ["alpha/a.js", "alpha/b.js", "beta.js", "zeta.js"]);
    }

    #[test]
    fn extension_filter_is_case_insensitive() {
        let temp = tempfile::tempdir().unwrap();
        for name in ["a.JS", "b.css", "c.txt", "noext"] {
            touch(temp.path(), name);
        }

        let files = walk_files(temp.path(), Some(&["js", "css"])).unwrap();
        let names: Vec<_> = files.iter().map(|f| to_slash(&f.relative)).collect();

        assert_eq!(names, ["a.JS", "b.css"]);
    }

    #[test]
    fn deep_trees_are_walked_without_recursion() {
        let temp = tempfile::tempdir().unwrap();
        let nested: String = (0..64).map(|i| format!("d{i}/")).collect();
        touch(temp.path(), &format!("{nested}leaf.js"));

        let files = walk_files(temp.path(), None).unwrap();
        assert_eq!(files.len(), 1);
        assert!(to_slash(&files[0].relative).ends_with("d63/leaf.js"));
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_files_are_listed_and_dangling_links_skipped() {
        let temp = tempfile::tempdir().unwrap();
        touch(temp.path(), "shared/site.css");
        let root = temp.path().join("public");
        std::fs::create_dir_all(&root).unwrap();
        std::os::unix::fs::symlink(temp.path().join("shared/site.css"), root.join("site.css"))
            .unwrap();
        std::os::unix::fs::symlink(temp.path().join("shared"), root.join("linked-dir")).unwrap();
        std::os::unix::fs::symlink(temp.path().join("gone.css"), root.join("broken.css")).unwrap();

        let files = walk_files(&root, None).unwrap();
        let names: Vec<_> = files.iter().map(|f| to_slash(&f.relative)).collect();

        assert_eq!(names, ["site.css"]);
        assert_eq!(std::fs::read_to_string(&files[0].path).unwrap(), "shared/site.css");
    }

    #[test]
    fn missing_root_is_an_error() {
        let temp = tempfile::tempdir().unwrap();
        assert!(walk_files(&temp.path().join("absent"), None).is_err());
    }
}
