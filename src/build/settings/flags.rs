//! Feature switches for a build.

use serde::Serialize;

/// Optimizations applied during a build.
///
/// Everything is enabled by default; the CLI turns individual switches off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildFlags {
    /// Minify bundled scripts.
    pub minify: bool,

    /// Emit source maps next to bundled scripts.
    ///
    /// Only honoured by the external bundler; the fallback minifier never
    /// produces maps.
    pub source_maps: bool,

    /// Write gzip siblings for text assets.
    pub compression: bool,

    /// Content-hash static assets and emit the asset manifest entries.
    pub hash_assets: bool,

    /// Drop unused exports while bundling.
    pub tree_shaking: bool,
}

impl Default for BuildFlags {
    fn default() -> Self {
        Self {
            minify: true,
            source_maps: true,
            compression: true,
            hash_assets: true,
            tree_shaking: true,
        }
    }
}
