//! `build-metadata.json` writer.

use crate::build::error::Result;
use crate::build::settings::BuildConfig;
use crate::build::stats::StatsSnapshot;
use crate::build::utils::fs::write_file;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::Path;

/// Snapshot of one run, written once after every asset mutation is done.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildMetadata<'a> {
    pub build_time: DateTime<Utc>,
    pub version: &'a str,
    /// Host runtime version, or `null` when it could not be determined.
    pub runtime_version: Option<String>,
    pub environment: &'a str,
    pub config: &'a BuildConfig,
    pub stats: StatsSnapshot,
}

/// Writes the metadata as pretty-printed JSON and returns the bytes written.
pub async fn write_metadata(path: &Path, metadata: &BuildMetadata<'_>) -> Result<u64> {
    let json = serde_json::to_string_pretty(metadata)?;
    write_file(path, json).await
}
