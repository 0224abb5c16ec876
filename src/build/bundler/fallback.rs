//! Textual fallback minifier.
//!
//! Used when the external bundler is unavailable or fails. This is a purely
//! textual pass, not a lexer: comment delimiters inside string, template or
//! regex literals are treated as comments. `"http://example.com"` loses
//! everything after `//`. Callers must not rely on it for correctness, only
//! as a degraded path that still produces output.

use super::{BundleBackend, BundleOptions};
use crate::build::error::{ErrorExt, Result};
use crate::build::utils::fs::write_file;
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

static BLOCK_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)/\*.*?\*/").expect("block comment pattern is valid"));

static LINE_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"//[^\n]*").expect("line comment pattern is valid"));

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

/// Strips block comments, then line comments, collapses whitespace runs to a
/// single space and trims the result.
pub fn minify(source: &str) -> String {
    let without_blocks = BLOCK_COMMENT.replace_all(source, "");
    let without_lines = LINE_COMMENT.replace_all(&without_blocks, "");
    WHITESPACE
        .replace_all(&without_lines, " ")
        .trim()
        .to_string()
}

/// Bundle backend that needs no external tool.
///
/// Copies the source verbatim when minification is off. Never inlines
/// imports and never writes source maps.
#[derive(Debug, Default, Clone, Copy)]
pub struct FallbackMinifier;

impl BundleBackend for FallbackMinifier {
    fn name(&self) -> &'static str {
        "fallback minifier"
    }

    async fn bundle(&self, input: &Path, output: &Path, options: &BundleOptions) -> Result<u64> {
        let source = tokio::fs::read_to_string(input)
            .await
            .fs_context("reading source", input)?;

        let contents = if options.minify {
            minify(&source)
        } else {
            source
        };

        write_file(output, contents).await
    }
}
