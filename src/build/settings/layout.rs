//! Source and output directory layouts.

use serde::Serialize;
use std::path::{Path, PathBuf};

/// Directory names inside the source tree.
///
/// Relative entries are resolved against the source root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceLayout {
    pub public: PathBuf,
    pub pages: PathBuf,
    pub components: PathBuf,
    pub views: PathBuf,
    pub api: PathBuf,
    pub templates: PathBuf,
    pub assets: PathBuf,
}

impl SourceLayout {
    /// All input directories.
    pub fn all(&self) -> [&Path; 7] {
        [
            self.public.as_path(),
            self.pages.as_path(),
            self.components.as_path(),
            self.views.as_path(),
            self.api.as_path(),
            self.templates.as_path(),
            self.assets.as_path(),
        ]
    }
}

impl Default for SourceLayout {
    fn default() -> Self {
        Self {
            public: "public".into(),
            pages: "pages".into(),
            components: "components".into(),
            views: "views".into(),
            api: "api".into(),
            templates: "templates".into(),
            assets: "assets".into(),
        }
    }
}

/// Subdirectory names created under the output root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputLayout {
    pub pages: String,
    pub components: String,
    pub assets: String,
    #[serde(rename = "static")]
    pub static_files: String,
    pub views: String,
    pub api: String,
    pub templates: String,
}

impl OutputLayout {
    /// All subdirectories, in scaffolding order.
    pub fn all(&self) -> [&str; 7] {
        [
            self.pages.as_str(),
            self.components.as_str(),
            self.assets.as_str(),
            self.static_files.as_str(),
            self.views.as_str(),
            self.api.as_str(),
            self.templates.as_str(),
        ]
    }
}

impl Default for OutputLayout {
    fn default() -> Self {
        Self {
            pages: "pages".into(),
            components: "components".into(),
            assets: "assets".into(),
            static_files: "static".into(),
            views: "views".into(),
            api: "api".into(),
            templates: "fml".into(),
        }
    }
}
