//! Shared fixtures for integration tests.

#![allow(dead_code)]

use fml_build::build::{BuildConfig, BuildConfigBuilder, BuildReport, FixedProbe, Orchestrator};
use semver::Version;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A throwaway application tree plus an output directory beside it.
pub struct Project {
    pub temp: TempDir,
}

impl Project {
    /// Empty application directory with a valid `package.json`.
    pub fn new() -> Self {
        let project = Self {
            temp: tempfile::tempdir().expect("tempdir"),
        };
        project.file(
            "package.json",
            r#"{
  "name": "shop",
  "version": "1.2.3",
  "type": "module",
  "scripts": { "build": "fml build" },
  "dependencies": { "express": "^4.19.0" },
  "devDependencies": { "eslint": "^9.0.0" }
}"#,
        );
        project
    }

    /// Every optional directory populated, except the ones the caller removes.
    pub fn full() -> Self {
        let project = Self::new();
        project
            .file("server.js", "import express from 'express';\n// start\nexpress().listen(3000);")
            .file("pages/home.js", "/* home page */\nexport default function Home() { return 'home'; }")
            .file("components/button.jsx", "export const Button = () => 'button'; // ui")
            .file("api/users.js", "export default (req, res) => res.json([]);")
            .file("views/index.ejs", "<html><%- body %></html>")
            .file("templates/layout.fml", "<layout>{{ content }}</layout>")
            .file("public/css/site.css", "body { margin: 0; }")
            .file("public/js/app.js", "console.log('app');")
            .file("public/robots.txt", "User-agent: *");
        project
    }

    pub fn app(&self) -> PathBuf {
        self.temp.path().join("app")
    }

    pub fn dist(&self) -> PathBuf {
        self.temp.path().join("dist")
    }

    pub fn file(&self, relative: &str, contents: &str) -> &Self {
        let path = self.app().join(relative);
        std::fs::create_dir_all(path.parent().expect("parent")).expect("create dirs");
        std::fs::write(path, contents).expect("write file");
        self
    }

    pub fn remove(&self, relative: &str) -> &Self {
        let path = self.app().join(relative);
        if path.is_dir() {
            std::fs::remove_dir_all(path).expect("remove dir");
        } else {
            std::fs::remove_file(path).expect("remove file");
        }
        self
    }

    pub fn config(&self) -> BuildConfigBuilder {
        BuildConfigBuilder::new()
            .source_dir(self.app())
            .output_dir(self.dist())
    }

    pub fn dist_path(&self, relative: &str) -> PathBuf {
        self.dist().join(relative)
    }

    pub fn read_json(&self, relative: &str) -> serde_json::Value {
        let raw = std::fs::read_to_string(self.dist_path(relative)).expect("read json");
        serde_json::from_str(&raw).expect("parse json")
    }
}

/// Probe for a host with a supported runtime and no external bundler.
pub fn no_bundler() -> FixedProbe {
    FixedProbe::unavailable().with_runtime(Version::new(20, 11, 1))
}

/// Runs a build with the fallback bundler.
pub async fn build(config: BuildConfig) -> fml_build::build::Result<BuildReport> {
    Orchestrator::new(config).with_probe(no_bundler()).build().await
}

/// Relative paths of every file under `root`, sorted, with `/` separators.
pub fn tree(root: &Path) -> Vec<String> {
    let mut files: Vec<String> = walkdir::WalkDir::new(root)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .map(|e| {
            e.path()
                .strip_prefix(root)
                .expect("prefix")
                .to_string_lossy()
                .replace('\\', "/")
        })
        .collect();
    files.sort();
    files
}
