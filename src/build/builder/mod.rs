//! Build orchestration and coordination.
//!
//! The [`Orchestrator`] owns one run: it probes the host, drives the stages
//! in their fixed order, tracks the [`BuildPhase`] and hands back a
//! [`BuildReport`].
//!
//! # Example
//!
//! ```no_run
//! use fml_build::build::{BuildConfigBuilder, Orchestrator};
//!
//! # async fn example() -> fml_build::build::Result<()> {
//! let config = BuildConfigBuilder::new()
//!     .source_dir("my-app")
//!     .output_dir("my-app/dist")
//!     .build()?;
//!
//! let report = Orchestrator::new(config).build().await?;
//! println!("{} files generated", report.stats.files_generated());
//! # Ok(())
//! # }
//! ```
//!
//! # Module Organization
//!
//! - [`orchestrator`] - main [`Orchestrator`] struct and the stage sequence
//! - [`state`] - [`BuildPhase`] transitions
//! - [`tool_detection`] - external tool and runtime availability

mod orchestrator;
mod state;
mod tool_detection;

pub use orchestrator::{BuildReport, Orchestrator};
pub use state::BuildPhase;
pub use tool_detection::{ExternalTool, FixedProbe, HostProbe, SystemProbe, parse_runtime_version};
