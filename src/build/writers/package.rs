//! Pruned `package.json` writer.

use crate::build::error::Result;
use crate::build::utils::fs::write_file;
use crate::metadata::PrunedDescriptor;
use std::path::Path;

/// Writes the deployment descriptor and returns the bytes written.
pub async fn write_pruned_descriptor(path: &Path, descriptor: &PrunedDescriptor) -> Result<u64> {
    let mut json = serde_json::to_string_pretty(descriptor)?;
    json.push('\n');
    write_file(path, json).await
}
