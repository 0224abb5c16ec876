//! Deployment package: pruned descriptor and README.

use super::StageContext;
use crate::build::constants::{PACKAGE_FILE, README_FILE};
use crate::build::events::Recorder;
use crate::build::writers::{write_pruned_descriptor, write_readme};
use path_absolutize::Absolutize;

/// Writes `package.json` and `README.md` into the output root.
pub async fn finalize_package(ctx: &StageContext<'_>, rec: &mut Recorder<'_>) {
    // `.` has no file name, so resolve it first
    let fallback_name = ctx
        .config
        .source_dir()
        .absolutize()
        .ok()
        .and_then(|dir| dir.file_name().map(|n| n.to_string_lossy().into_owned()))
        .unwrap_or_else(|| "app".to_string());
    let pruned = ctx.package.prune(&fallback_name);

    let package_path = ctx.config.output_dir().join(PACKAGE_FILE);
    match write_pruned_descriptor(&package_path, &pruned).await {
        Ok(size) => rec.file_written(&package_path, size),
        Err(e) => rec.error(&package_path, e.to_string()),
    }

    let readme_path = ctx.config.output_dir().join(README_FILE);
    let build_time = ctx.build_time.to_rfc3339();
    match write_readme(&readme_path, &pruned, ctx.config.environment(), &build_time).await {
        Ok(size) => rec.file_written(&readme_path, size),
        Err(e) => rec.error(&readme_path, e.to_string()),
    }
}
