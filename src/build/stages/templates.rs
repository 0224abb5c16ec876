//! Template compilation into the `fml/` output directory.

use super::{StageContext, optional_dir};
use crate::build::constants::TEMPLATE_EXTENSION;
use crate::build::error::{ErrorExt, Result};
use crate::build::events::Recorder;
use crate::build::utils::fs::write_file;
use crate::build::utils::walk::{WalkedFile, walk_files};
use std::path::Path;

/// Compiles every template under the templates directory, keeping the
/// relative layout.
pub async fn compile_templates(ctx: &StageContext<'_>, rec: &mut Recorder<'_>) {
    let Some(source) = optional_dir(ctx.config, &ctx.config.sources().templates, rec) else {
        return;
    };
    let target = ctx.config.output_path(&ctx.config.outputs().templates);

    let files = match walk_files(&source, Some(&[TEMPLATE_EXTENSION][..])) {
        Ok(files) => files,
        Err(e) => {
            rec.error(&source, format!("listing templates: {e}"));
            return;
        }
    };

    for file in files {
        rec.processed();
        let output = target.join(&file.relative);
        match compile_one(ctx, &file, &output).await {
            Ok(size) => rec.file_written(&output, size),
            Err(e) => rec.error(&file.path, e.to_string()),
        }
    }
}

async fn compile_one(ctx: &StageContext<'_>, file: &WalkedFile, output: &Path) -> Result<u64> {
    let source = tokio::fs::read_to_string(&file.path)
        .await
        .fs_context("reading template", &file.path)?;
    let compiled = ctx.compiler.compile(&source, &file.path)?;
    log::debug!("{} compiled {}", ctx.compiler.name(), file.relative.display());
    write_file(output, compiled).await
}
