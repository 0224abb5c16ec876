//! External tool detection and availability checking.
//!
//! The pipeline never looks at `PATH` directly. It asks a [`HostProbe`] once
//! per run which bundler binary to use and which runtime version is
//! installed. [`SystemProbe`] answers by inspecting the host; tests inject a
//! [`FixedProbe`] so results do not depend on the machine.

use crate::build::constants::{BUNDLER_PROGRAM, PROBE_TIMEOUT, RUNTIME_PROGRAM};
use semver::Version;
use std::future::Future;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

/// An executable found on the host, with the version it reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalTool {
    pub path: PathBuf,
    pub version: String,
}

/// Answers availability questions about the host.
pub trait HostProbe {
    /// Locates a working external bundler, if any.
    fn bundler_tool(&self) -> impl Future<Output = Option<ExternalTool>> + Send;

    /// Reports the installed host runtime version, if it can be determined.
    fn runtime_version(&self) -> impl Future<Output = Option<Version>> + Send;
}

/// Probes the real host through `PATH` and `--version`.
#[derive(Debug, Clone)]
pub struct SystemProbe {
    bundler_program: String,
    runtime_program: String,
    timeout: Duration,
}

impl Default for SystemProbe {
    fn default() -> Self {
        Self {
            bundler_program: BUNDLER_PROGRAM.to_string(),
            runtime_program: RUNTIME_PROGRAM.to_string(),
            timeout: PROBE_TIMEOUT,
        }
    }
}

impl HostProbe for SystemProbe {
    async fn bundler_tool(&self) -> Option<ExternalTool> {
        probe_version(&self.bundler_program, self.timeout).await
    }

    async fn runtime_version(&self) -> Option<Version> {
        let tool = probe_version(&self.runtime_program, self.timeout).await?;
        let version = parse_runtime_version(&tool.version);
        if version.is_none() {
            log::warn!(
                "{} reported an unparseable version: {}",
                self.runtime_program,
                tool.version
            );
        }
        version
    }
}

/// Runs `<program> --version` and returns the tool when it answers successfully.
async fn probe_version(program: &str, timeout: Duration) -> Option<ExternalTool> {
    let path = match which::which(program) {
        Ok(path) => path,
        Err(e) => {
            log::debug!("{} not found in PATH: {}", program, e);
            return None;
        }
    };
    log::debug!("Found {} at: {}", program, path.display());

    let mut command = Command::new(&path);
    command
        .arg("--version")
        .stdin(Stdio::null())
        .kill_on_drop(true);

    match tokio::time::timeout(timeout, command.output()).await {
        Ok(Ok(output)) if output.status.success() => {
            let version = String::from_utf8_lossy(&output.stdout).trim().to_string();
            log::info!("✓ {} available: {}", program, version);
            Some(ExternalTool { path, version })
        }
        Ok(Ok(output)) => {
            log::warn!(
                "{} found at {} but --version check failed (exit code: {:?}). Stderr: {}",
                program,
                path.display(),
                output.status.code(),
                String::from_utf8_lossy(&output.stderr).trim()
            );
            None
        }
        Ok(Err(e)) => {
            log::warn!(
                "{} found at {} but failed to execute: {}. Check file permissions.",
                program,
                path.display(),
                e
            );
            None
        }
        Err(_) => {
            log::warn!(
                "{} --version did not answer within {}s",
                program,
                timeout.as_secs()
            );
            None
        }
    }
}

/// Parses runtime version output such as `v20.11.1`.
pub fn parse_runtime_version(raw: &str) -> Option<Version> {
    let trimmed = raw.trim();
    Version::parse(trimmed.strip_prefix('v').unwrap_or(trimmed)).ok()
}

/// Probe with predetermined answers.
#[derive(Debug, Clone, Default)]
pub struct FixedProbe {
    pub tool: Option<ExternalTool>,
    pub runtime: Option<Version>,
}

impl FixedProbe {
    /// Neither a bundler nor a runtime is available.
    pub fn unavailable() -> Self {
        Self::default()
    }

    /// Reports `runtime` as the installed runtime version.
    pub fn with_runtime(mut self, runtime: Version) -> Self {
        self.runtime = Some(runtime);
        self
    }

    /// Reports `tool` as the available bundler.
    pub fn with_tool(mut self, tool: ExternalTool) -> Self {
        self.tool = Some(tool);
        self
    }
}

impl HostProbe for FixedProbe {
    async fn bundler_tool(&self) -> Option<ExternalTool> {
        self.tool.clone()
    }

    async fn runtime_version(&self) -> Option<Version> {
        self.runtime.clone()
    }
}
