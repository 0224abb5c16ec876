//! Serialization of final build state into the output tree.

mod metadata;
mod package;
mod readme;

pub use metadata::{BuildMetadata, write_metadata};
pub use package::write_pruned_descriptor;
pub use readme::{render_readme, write_readme};
