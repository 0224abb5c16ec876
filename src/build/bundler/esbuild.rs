//! Native bundler adapter.
//!
//! Runs the external `esbuild` binary as a subprocess. Every invocation is
//! bounded by a timeout; a child that overruns it is killed and reaped before
//! the error is returned, so the caller can fall back.

use super::{BundleBackend, BundleOptions};
use crate::build::builder::ExternalTool;
use crate::build::constants::KILL_GRACE_PERIOD;
use crate::build::error::{Error, ErrorExt, Result};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::io::AsyncReadExt;
use tokio::process::Command;

/// Bundle backend backed by the `esbuild` executable.
#[derive(Debug, Clone)]
pub struct EsbuildAdapter {
    program: PathBuf,
    timeout: Duration,
}

impl EsbuildAdapter {
    pub fn new(tool: &ExternalTool, timeout: Duration) -> Self {
        Self {
            program: tool.path.clone(),
            timeout,
        }
    }

    fn command_name(&self) -> String {
        self.program
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.program.display().to_string())
    }
}

impl BundleBackend for EsbuildAdapter {
    fn name(&self) -> &'static str {
        "esbuild"
    }

    async fn bundle(&self, input: &Path, output: &Path, options: &BundleOptions) -> Result<u64> {
        if let Some(parent) = output.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .fs_context("creating bundle output directory", parent)?;
        }

        let command = self.command_name();
        log::debug!("{} {}", command, input.display());

        let mut child = Command::new(&self.program)
            .args(options.to_args(input, output))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|error| Error::CommandFailed {
                command: command.clone(),
                error,
            })?;

        // Drain stderr concurrently so a chatty tool cannot block on a full pipe
        let stderr = child.stderr.take();
        let stderr_task = tokio::spawn(async move {
            let mut captured = String::new();
            if let Some(mut stderr) = stderr {
                let _ = stderr.read_to_string(&mut captured).await;
            }
            captured
        });

        let status = match tokio::time::timeout(self.timeout, child.wait()).await {
            Ok(Ok(status)) => status,
            Ok(Err(error)) => return Err(Error::CommandFailed { command, error }),
            Err(_elapsed) => {
                log::warn!(
                    "{} timed out after {}s on {}, terminating...",
                    command,
                    self.timeout.as_secs(),
                    input.display()
                );

                if let Err(e) = child.kill().await {
                    log::warn!("Failed to kill {} process: {}", command, e);
                }

                // Reap the child so no zombie outlives the build
                let _ = tokio::time::timeout(KILL_GRACE_PERIOD, child.wait()).await;

                return Err(Error::CommandTimeout {
                    command,
                    seconds: self.timeout.as_secs(),
                });
            }
        };

        let stderr = stderr_task.await.unwrap_or_default();
        if !status.success() {
            crate::bail!(
                "{} exited with code {:?}: {}",
                command,
                status.code(),
                stderr.trim()
            );
        }

        let metadata = tokio::fs::metadata(output)
            .await
            .fs_context("reading bundle output", output)?;
        Ok(metadata.len())
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::build::BuildConfigBuilder;
    use std::os::unix::fs::PermissionsExt;

    fn fake_tool(dir: &Path, script: &str) -> ExternalTool {
        let path = dir.join("fake-esbuild");
        std::fs::write(&path, format!("#!/bin/sh\n{script}\n")).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        ExternalTool {
            path,
            version: "0.0.0-test".into(),
        }
    }

    fn options() -> BundleOptions {
        let config = BuildConfigBuilder::new().source_dir("app").build().unwrap();
        BundleOptions::browser(&config)
    }

    #[tokio::test]
    async fn successful_run_reports_output_size() {
        let temp = tempfile::tempdir().unwrap();
        // Last argument is --outfile=<path>
        let tool = fake_tool(
            temp.path(),
            r#"for arg in "$@"; do out="$arg"; done; printf 'bundled' > "${out#--outfile=}""#,
        );
        let adapter = EsbuildAdapter::new(&tool, Duration::from_secs(10));
        let input = temp.path().join("home.js");
        std::fs::write(&input, "export {}").unwrap();
        let output = temp.path().join("dist/pages/home.js");

        let size = adapter.bundle(&input, &output, &options()).await.unwrap();

        assert_eq!(size, 7);
        assert_eq!(std::fs::read_to_string(output).unwrap(), "bundled");
    }

    #[tokio::test]
    async fn non_zero_exit_carries_stderr() {
        let temp = tempfile::tempdir().unwrap();
        let tool = fake_tool(temp.path(), "echo 'syntax error' >&2; exit 3");
        let adapter = EsbuildAdapter::new(&tool, Duration::from_secs(10));

        let err = adapter
            .bundle(
                &temp.path().join("in.js"),
                &temp.path().join("out.js"),
                &options(),
            )
            .await
            .unwrap_err();

        let message = err.to_string();
        assert!(message.contains("Some(3)"));
        assert!(message.contains("syntax error"));
    }

    #[tokio::test]
    async fn hung_tool_is_killed_after_timeout() {
        let temp = tempfile::tempdir().unwrap();
        let tool = fake_tool(temp.path(), "exec sleep 30");
        let adapter = EsbuildAdapter::new(&tool, Duration::from_secs(1));

        let started = std::time::Instant::now();
        let err = adapter
            .bundle(
                &temp.path().join("in.js"),
                &temp.path().join("out.js"),
                &options(),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, Error::CommandTimeout { seconds: 1, .. }));
        assert!(started.elapsed() < Duration::from_secs(15));
    }
}
