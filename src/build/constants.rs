//! Build pipeline constants: file names, tool names, limits and timeouts.

use semver::Version;
use std::time::Duration;

/// Default output directory, relative to the working directory
pub const DEFAULT_OUTPUT_DIR: &str = "dist";

/// External bundling tool looked up on `PATH`
pub const BUNDLER_PROGRAM: &str = "esbuild";

/// Host runtime the produced server targets
pub const RUNTIME_PROGRAM: &str = "node";

/// Oldest host runtime the produced output supports
pub const MIN_RUNTIME_VERSION: Version = Version::new(18, 0, 0);

/// Timeout for a single bundler invocation (2 minutes)
/// A hung bundler would otherwise stall the whole build
pub const DEFAULT_BUNDLER_TIMEOUT: Duration = Duration::from_secs(120);

/// Timeout for `--version` probes (10 seconds)
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(10);

/// How long to wait for a killed child to be reaped
pub const KILL_GRACE_PERIOD: Duration = Duration::from_secs(10);

/// Number of hex characters of the content digest embedded in file names
pub const HASH_LENGTH: usize = 8;

/// Dependencies the produced server needs at runtime
pub const DEFAULT_REQUIRED_DEPENDENCIES: &[&str] = &["express"];

/// Environment name recorded when `NODE_ENV` is unset
pub const DEFAULT_ENVIRONMENT: &str = "production";

/// Number of warnings printed in the end-of-run report
pub const WARNING_PREVIEW_LIMIT: usize = 10;

pub const MANIFEST_FILE: &str = "asset-manifest.json";
pub const METADATA_FILE: &str = "build-metadata.json";
pub const PACKAGE_FILE: &str = "package.json";
pub const README_FILE: &str = "README.md";
pub const SERVER_ENTRY: &str = "server.js";

/// Source extensions handed to the bundler
pub const SCRIPT_EXTENSIONS: &[&str] = &["js", "mjs", "jsx", "ts", "tsx"];

/// Template source extension
pub const TEMPLATE_EXTENSION: &str = "fml";

/// Static assets eligible for content hashing: style sheets, scripts, images, fonts
pub const HASHABLE_EXTENSIONS: &[&str] = &[
    "css", "js", "mjs", "png", "jpg", "jpeg", "gif", "svg", "webp", "ico", "woff", "woff2", "ttf",
    "eot", "otf",
];

/// Text outputs that get a gzip sibling when compression is enabled
pub const COMPRESSIBLE_EXTENSIONS: &[&str] =
    &["js", "mjs", "css", "html", "json", "svg", "txt", "xml", "map"];
