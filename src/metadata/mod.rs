//! Package descriptor (`package.json`) loading and pruning.
//!
//! The source descriptor is read to discover the application version and its
//! declared dependencies. It is never modified; a pruned copy containing only
//! what a deployment needs is written into the output tree.

use crate::build::constants::SERVER_ENTRY;
use crate::build::error::{ErrorExt, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Version reported when the descriptor does not declare one
pub const DEFAULT_VERSION: &str = "0.0.0";

/// The fields of `package.json` the build cares about.
///
/// Unknown fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageDescriptor {
    pub name: Option<String>,
    pub version: Option<String>,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub module_type: Option<String>,
    pub main: Option<String>,
    pub engines: Option<BTreeMap<String, String>>,
    #[serde(default)]
    pub dependencies: BTreeMap<String, String>,
    #[serde(default)]
    pub dev_dependencies: BTreeMap<String, String>,
    #[serde(default)]
    pub scripts: BTreeMap<String, String>,
}

/// Deployment copy of the descriptor: runtime fields only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PrunedDescriptor {
    pub name: String,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub module_type: String,
    pub main: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub engines: Option<BTreeMap<String, String>>,
    pub scripts: BTreeMap<String, String>,
    pub dependencies: BTreeMap<String, String>,
}

/// Reads and parses a `package.json`.
pub fn load_package_descriptor(path: &Path) -> Result<PackageDescriptor> {
    let raw = std::fs::read_to_string(path).fs_context("reading package descriptor", path)?;
    Ok(serde_json::from_str(&raw)?)
}

impl PackageDescriptor {
    /// Declared version, or [`DEFAULT_VERSION`].
    pub fn version_or_default(&self) -> &str {
        self.version.as_deref().unwrap_or(DEFAULT_VERSION)
    }

    /// Runtime dependency names, sorted.
    pub fn runtime_dependencies(&self) -> Vec<String> {
        self.dependencies.keys().cloned().collect()
    }

    /// Entries of `required` that are not declared as runtime dependencies.
    pub fn missing_dependencies<'a>(&self, required: &'a [String]) -> Vec<&'a str> {
        required
            .iter()
            .filter(|dep| !self.dependencies.contains_key(dep.as_str()))
            .map(String::as_str)
            .collect()
    }

    /// Strips dev dependencies and build scripts, pointing `main` at the
    /// bundled server entry.
    ///
    /// `fallback_name` is used when the descriptor has no name.
    pub fn prune(&self, fallback_name: &str) -> PrunedDescriptor {
        let mut scripts = BTreeMap::new();
        scripts.insert("start".to_string(), format!("node {SERVER_ENTRY}"));

        PrunedDescriptor {
            name: self
                .name
                .clone()
                .unwrap_or_else(|| fallback_name.to_string()),
            version: self.version_or_default().to_string(),
            description: self.description.clone(),
            module_type: self
                .module_type
                .clone()
                .unwrap_or_else(|| "module".to_string()),
            main: SERVER_ENTRY.to_string(),
            engines: self.engines.clone(),
            scripts,
            dependencies: self.dependencies.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DESCRIPTOR: &str = r#"{
        "name": "shop",
        "version": "2.1.0",
        "description": "Storefront",
        "type": "module",
        "main": "src/server.js",
        "engines": { "node": ">=18" },
        "scripts": { "dev": "fml dev", "build": "fml build" },
        "dependencies": { "express": "^4.19.0", "ejs": "^3.1.0" },
        "devDependencies": { "eslint": "^9.0.0" },
        "private": true
    }"#;

    #[test]
    fn pruning_keeps_runtime_fields_only() {
        let descriptor: PackageDescriptor = serde_json::from_str(DESCRIPTOR).unwrap();
        let pruned = descriptor.prune("fallback");

        let json = serde_json::to_value(&pruned).unwrap();
        assert_eq!(json["name"], "shop");
        assert_eq!(json["version"], "2.1.0");
        assert_eq!(json["main"], "server.js");
        assert_eq!(json["engines"]["node"], ">=18");
        assert_eq!(json["dependencies"]["express"], "^4.19.0");
        assert_eq!(json["scripts"]["start"], "node server.js");
        assert!(json.get("devDependencies").is_none());
        assert!(json["scripts"].get("build").is_none());
        assert!(json.get("private").is_none());
    }

    #[test]
    fn empty_descriptor_gets_defaults() {
        let pruned = PackageDescriptor::default().prune("my-app");
        assert_eq!(pruned.name, "my-app");
        assert_eq!(pruned.version, DEFAULT_VERSION);
        assert_eq!(pruned.module_type, "module");
        assert!(pruned.description.is_none());
    }

    #[test]
    fn missing_dependencies_are_listed_in_required_order() {
        let descriptor: PackageDescriptor = serde_json::from_str(DESCRIPTOR).unwrap();
        let required = vec!["compression".to_string(), "express".to_string(), "helmet".to_string()];
        assert_eq!(descriptor.missing_dependencies(&required), ["compression", "helmet"]);
        assert_eq!(descriptor.runtime_dependencies(), ["ejs", "express"]);
    }

    #[test]
    fn malformed_descriptor_is_an_error() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("package.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(load_package_descriptor(&path).is_err());
    }
}
