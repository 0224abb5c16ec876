//! Server entry, views and API routes.

use super::scripts::bundle_directory;
use super::{StageContext, optional_dir};
use crate::build::bundler::BundleOptions;
use crate::build::constants::SERVER_ENTRY;
use crate::build::events::Recorder;
use crate::build::utils::fs::copy_file;
use crate::build::utils::walk::walk_files;

/// Bundles `server.js` for the node platform, copies views verbatim and
/// bundles API routes.
///
/// Declared runtime dependencies stay external so the deployed server
/// resolves them from `node_modules`.
pub async fn process_server(ctx: &StageContext<'_>, rec: &mut Recorder<'_>) {
    let options = BundleOptions::node(ctx.config, ctx.package.runtime_dependencies());

    let entry = ctx.config.source_dir().join(SERVER_ENTRY);
    if entry.is_file() {
        let output = ctx.config.output_dir().join(SERVER_ENTRY);
        if let Err(e) = ctx.bundler.bundle(&entry, &output, &options, rec).await {
            rec.error(&entry, e.to_string());
        }
    } else {
        rec.warn(&entry, "server entry not found; skipped");
    }

    copy_views(ctx, rec).await;

    bundle_directory(
        ctx,
        &ctx.config.sources().api,
        &ctx.config.outputs().api,
        &options,
        rec,
    )
    .await;
}

/// Copies every file of the views directory without transformation.
async fn copy_views(ctx: &StageContext<'_>, rec: &mut Recorder<'_>) {
    let Some(views) = optional_dir(ctx.config, &ctx.config.sources().views, rec) else {
        return;
    };
    let target = ctx.config.output_path(&ctx.config.outputs().views);

    let files = match walk_files(&views, None) {
        Ok(files) => files,
        Err(e) => {
            rec.error(&views, format!("listing views: {e}"));
            return;
        }
    };

    for file in files {
        rec.processed();
        let output = target.join(&file.relative);
        match copy_file(&file.path, &output).await {
            Ok(size) => rec.file_written(&output, size),
            Err(e) => rec.error(&file.path, e.to_string()),
        }
    }
}
