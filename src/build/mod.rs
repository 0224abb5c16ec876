//! Production build pipeline.
//!
//! Turns an application source tree (pages, components, server entry, API
//! routes, templates, static assets) into a deployable output tree.
//!
//! # Overview
//!
//! The pipeline:
//! 1. Validates the source tree and host in preflight
//! 2. Cleans and scaffolds the output directory
//! 3. Compiles templates, bundles pages, components, server and API routes
//! 4. Copies static files and renames them by content hash
//! 5. Writes the asset manifest, runs optimization hooks, writes metadata
//! 6. Emits a pruned `package.json` and a deployment README
//!
//! # Module Organization
//!
//! - [`assets`] - content hashing and the asset manifest
//! - [`builder`] - [`Orchestrator`], phases and host probing
//! - [`bundler`] - external bundler adapter and fallback minifier
//! - [`events`] - structured build events and sinks
//! - [`settings`] - [`BuildConfig`] and its builder
//! - [`stages`] - the individual pipeline stages
//! - [`stats`] - counters and diagnostics
//! - [`writers`] - metadata, package descriptor and README output

pub mod assets;
pub mod builder;
pub mod bundler;
pub mod constants;
pub mod error;
pub mod events;
pub mod settings;
pub mod stages;
pub mod stats;
pub mod templates;
pub mod utils;
pub mod writers;

pub use builder::{BuildPhase, BuildReport, FixedProbe, HostProbe, Orchestrator, SystemProbe};
pub use error::{Context, Error, ErrorExt, Result};
pub use settings::{BuildConfig, BuildConfigBuilder, BuildFlags, OutputLayout, SourceLayout};
pub use stats::{BuildStats, format_size};
