//! Production build orchestrator for FML applications
//!
//! This library turns an application source tree into a deployable output
//! tree:
//! - bundled and minified pages, components, server entry and API routes
//! - content-hashed static assets with an asset manifest
//! - build metadata, a pruned package descriptor and a deployment README
//!
//! It can be used both as a CLI tool and as a library dependency.

pub mod build;
pub mod cli;
pub mod error;
pub mod metadata;

// Re-export commonly used types
pub use error::{CliError, FmlError, Result};
