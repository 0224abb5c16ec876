//! Pluggable template compilation.
//!
//! The template language itself lives outside this crate. The pipeline only
//! needs something that turns template source into deployable text; the
//! default [`IdentityCompiler`] passes sources through unchanged.

use super::error::Result;
use std::path::Path;

/// Turns one template source into its deployable form.
pub trait TemplateCompiler: Send + Sync {
    /// Name used in logs.
    fn name(&self) -> &str;

    /// Compiles `source`, read from `path`.
    fn compile(&self, source: &str, path: &Path) -> Result<String>;
}

/// Pass-through compiler.
#[derive(Debug, Default, Clone, Copy)]
pub struct IdentityCompiler;

impl TemplateCompiler for IdentityCompiler {
    fn name(&self) -> &str {
        "identity"
    }

    fn compile(&self, source: &str, _path: &Path) -> Result<String> {
        Ok(source.to_string())
    }
}
