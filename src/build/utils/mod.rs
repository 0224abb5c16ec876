//! Filesystem helpers shared by the stages.

pub mod fs;
pub mod walk;
