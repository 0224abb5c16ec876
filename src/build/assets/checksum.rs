//! Asset content digests.

use crate::build::constants::HASH_LENGTH;
use crate::build::error::{ErrorExt, Result};
use sha2::{Digest, Sha256};
use std::path::Path;
use tokio::io::AsyncReadExt;

/// Calculates the SHA-256 checksum of a single file.
///
/// Reads the file in 8KB chunks so large images and fonts are never held in
/// memory whole.
///
/// # Returns
///
/// * `Ok(String)` - Hex-encoded SHA-256 hash (64 characters)
/// * `Err` - If the file cannot be read
pub async fn calculate_sha256(file_path: &Path) -> Result<String> {
    let mut file = tokio::fs::File::open(file_path)
        .await
        .fs_context("opening file for hashing", file_path)?;
    let mut hasher = Sha256::new();
    let mut buffer = vec![0u8; 8192];

    loop {
        let n = file
            .read(&mut buffer)
            .await
            .fs_context("reading file for hash calculation", file_path)?;
        if n == 0 {
            break;
        }
        hasher.update(&buffer[..n]);
    }

    Ok(hex::encode(hasher.finalize()))
}

/// Short content hash embedded in asset file names.
///
/// The first [`HASH_LENGTH`] hex characters of the SHA-256 digest. Identical
/// bytes always produce the identical hash.
pub async fn content_hash(file_path: &Path) -> Result<String> {
    let mut digest = calculate_sha256(file_path).await?;
    digest.truncate(HASH_LENGTH);
    Ok(digest)
}
