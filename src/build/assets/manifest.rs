//! Asset manifest: original static path → content-hashed path.

use crate::build::error::Result;
use crate::build::utils::fs::write_file;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;

/// Mapping from an asset's path relative to the static output root to its
/// hashed path. Kept sorted so the written document is stable across runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AssetManifest {
    entries: BTreeMap<String, String>,
}

impl AssetManifest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a completed rename.
    pub fn insert(&mut self, original: String, hashed: String) {
        self.entries.insert(original, hashed);
    }

    pub fn get(&self, original: &str) -> Option<&str> {
        self.entries.get(original).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in sorted order of original path.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ManifestDocument<'a> {
    version: &'a str,
    build_time: DateTime<Utc>,
    assets: &'a AssetManifest,
}

/// Writes `{ version, buildTime, assets }` as pretty-printed JSON.
///
/// Returns the number of bytes written.
pub async fn write_manifest(
    path: &Path,
    manifest: &AssetManifest,
    version: &str,
    build_time: DateTime<Utc>,
) -> Result<u64> {
    let document = ManifestDocument {
        version,
        build_time,
        assets: manifest,
    };
    let json = serde_json::to_string_pretty(&document)?;
    write_file(path, json).await
}
