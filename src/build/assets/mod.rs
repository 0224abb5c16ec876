//! Content-addressed static assets and the manifest that maps them.

mod checksum;
pub mod hasher;
pub mod manifest;

pub use checksum::{calculate_sha256, content_hash};
pub use hasher::{hash_assets, hashed_file_name, is_hashable};
pub use manifest::{AssetManifest, write_manifest};
