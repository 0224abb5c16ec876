//! Configuration structures for one build run.
//!
//! A [`BuildConfig`] is assembled once through [`BuildConfigBuilder`] and is
//! immutable for the duration of the run. It is also embedded verbatim in the
//! build metadata, so every type here is serializable.

mod builder;
mod core;
mod flags;
mod layout;

pub use builder::BuildConfigBuilder;
pub use core::BuildConfig;
pub use flags::BuildFlags;
pub use layout::{OutputLayout, SourceLayout};
