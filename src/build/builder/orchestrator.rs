//! Main build orchestration.
//!
//! This module provides the [`Orchestrator`] that runs the stage sequence
//! against one [`BuildConfig`].

use super::state::BuildPhase;
use super::tool_detection::{HostProbe, SystemProbe};
use crate::build::assets::{AssetManifest, write_manifest};
use crate::build::bundler::{BundleOptions, Bundler};
use crate::build::constants::{MANIFEST_FILE, METADATA_FILE};
use crate::build::error::Result;
use crate::build::events::{BuildEvent, BuildEventSink, NoopEventSink, Recorder, Stage};
use crate::build::settings::BuildConfig;
use crate::build::stages::optimize::{GzipHook, OptimizationHook};
use crate::build::stages::{self, StageContext};
use crate::build::stats::BuildStats;
use crate::build::templates::{IdentityCompiler, TemplateCompiler};
use crate::build::writers::{BuildMetadata, write_metadata};
use chrono::Utc;
use std::path::Path;
use std::sync::Arc;

/// Outcome of a run that got past the setup phases.
#[derive(Debug)]
pub struct BuildReport {
    pub stats: BuildStats,
    pub manifest: AssetManifest,
    strict: bool,
}

impl BuildReport {
    /// Whether the run counts as successful.
    ///
    /// Recorded per-file errors only fail a strict run.
    pub fn is_success(&self) -> bool {
        !self.strict || self.stats.errors().is_empty()
    }
}

/// Drives one production build.
///
/// Setup failures (preflight, clean, scaffold) are returned as errors. Every
/// later stage is best-effort: problems are recorded in the report's stats
/// and the run continues.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use fml_build::build::{BuildConfigBuilder, FixedProbe, Orchestrator};
/// use fml_build::build::events::CollectingEventSink;
///
/// # async fn example() -> fml_build::build::Result<()> {
/// let config = BuildConfigBuilder::new().source_dir("my-app").build()?;
/// let sink = Arc::new(CollectingEventSink::new());
///
/// let mut orchestrator = Orchestrator::new(config)
///     .with_probe(FixedProbe::unavailable())
///     .with_event_sink(sink.clone());
/// let report = orchestrator.build().await?;
/// assert!(report.is_success());
/// # Ok(())
/// # }
/// ```
pub struct Orchestrator<P: HostProbe = SystemProbe> {
    config: BuildConfig,
    probe: P,
    compiler: Box<dyn TemplateCompiler>,
    hooks: Vec<Box<dyn OptimizationHook>>,
    sink: Arc<dyn BuildEventSink>,
    phase: BuildPhase,
}

impl<P: HostProbe> std::fmt::Debug for Orchestrator<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("config", &self.config)
            .field("compiler", &self.compiler.name())
            .field(
                "hooks",
                &self.hooks.iter().map(|h| h.name()).collect::<Vec<_>>(),
            )
            .field("phase", &self.phase)
            .finish()
    }
}

impl Orchestrator<SystemProbe> {
    /// Creates an orchestrator that probes the real host.
    ///
    /// Gzip compression is registered when the config enables it.
    pub fn new(config: BuildConfig) -> Self {
        let mut hooks: Vec<Box<dyn OptimizationHook>> = Vec::new();
        if config.flags().compression {
            hooks.push(Box::new(GzipHook::default()));
        }

        Self {
            config,
            probe: SystemProbe::default(),
            compiler: Box::new(IdentityCompiler),
            hooks,
            sink: Arc::new(NoopEventSink),
            phase: BuildPhase::Init,
        }
    }
}

impl<P: HostProbe> Orchestrator<P> {
    /// Replaces the host probe.
    pub fn with_probe<Q: HostProbe>(self, probe: Q) -> Orchestrator<Q> {
        Orchestrator {
            config: self.config,
            probe,
            compiler: self.compiler,
            hooks: self.hooks,
            sink: self.sink,
            phase: self.phase,
        }
    }

    pub fn with_template_compiler(mut self, compiler: impl TemplateCompiler + 'static) -> Self {
        self.compiler = Box::new(compiler);
        self
    }

    /// Appends an optimization hook; hooks run in registration order.
    pub fn with_hook(mut self, hook: impl OptimizationHook + 'static) -> Self {
        self.hooks.push(Box::new(hook));
        self
    }

    pub fn with_event_sink(mut self, sink: Arc<dyn BuildEventSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn config(&self) -> &BuildConfig {
        &self.config
    }

    /// Phase reached by the last run.
    pub fn phase(&self) -> BuildPhase {
        self.phase
    }

    /// Runs every stage in order.
    ///
    /// Returns an error only when a setup phase fails; the output directory
    /// is left untouched if preflight fails.
    pub async fn build(&mut self) -> Result<BuildReport> {
        let sink = Arc::clone(&self.sink);
        let mut stats = BuildStats::new();
        let mut manifest = AssetManifest::new();
        let mut cursor = Cursor::default();

        let result = {
            let mut rec = Recorder::new(&mut stats, sink.as_ref());
            self.run_stages(&mut manifest, &mut rec, &mut cursor).await
        };

        match result {
            Ok(()) => {
                self.phase = cursor.phase;
                let report = BuildReport {
                    stats,
                    manifest,
                    strict: self.config.strict(),
                };
                log::info!(
                    "Build finished in {:.2}s with {} errors and {} warnings",
                    report.stats.duration().as_secs_f64(),
                    report.stats.errors().len(),
                    report.stats.warnings().len()
                );
                sink.on_event(BuildEvent::BuildFinished {
                    success: report.is_success(),
                    duration: report.stats.duration(),
                    errors: report.stats.errors().len(),
                    warnings: report.stats.warnings().len(),
                });
                Ok(report)
            }
            Err(e) => {
                cursor.fail();
                self.phase = cursor.phase;
                log::error!("{} failed: {e}", cursor.stage);
                sink.on_event(BuildEvent::BuildFailed {
                    stage: cursor.stage,
                    error: e.to_string(),
                });
                Err(e)
            }
        }
    }

    async fn run_stages(
        &self,
        manifest: &mut AssetManifest,
        rec: &mut Recorder<'_>,
        cursor: &mut Cursor,
    ) -> Result<()> {
        let config = &self.config;

        cursor.start(Stage::Preflight, rec);
        cursor.advance(BuildPhase::Preflight);
        let preflight = stages::prepare::preflight(config, &self.probe, rec).await?;

        cursor.start(Stage::Clean, rec);
        stages::prepare::clean(config).await?;
        cursor.advance(BuildPhase::Cleaned);

        cursor.start(Stage::Scaffold, rec);
        stages::prepare::scaffold(config).await?;
        cursor.advance(BuildPhase::Scaffolded);

        let bundler = Bundler::new(preflight.bundler_tool.as_ref(), config.bundler_timeout());
        let ctx = StageContext {
            config,
            bundler: &bundler,
            compiler: self.compiler.as_ref(),
            package: &preflight.package,
            runtime_version: preflight.runtime_version.as_ref(),
            build_time: Utc::now(),
        };

        cursor.start(Stage::Templates, rec);
        stages::templates::compile_templates(&ctx, rec).await;
        cursor.advance(BuildPhase::TemplatesDone);

        let browser = BundleOptions::browser(config);

        cursor.start(Stage::Pages, rec);
        stages::scripts::bundle_directory(
            &ctx,
            &config.sources().pages,
            &config.outputs().pages,
            &browser,
            rec,
        )
        .await;
        cursor.advance(BuildPhase::PagesDone);

        cursor.start(Stage::Components, rec);
        stages::scripts::bundle_directory(
            &ctx,
            &config.sources().components,
            &config.outputs().components,
            &browser,
            rec,
        )
        .await;
        cursor.advance(BuildPhase::ComponentsDone);

        cursor.start(Stage::Server, rec);
        stages::server::process_server(&ctx, rec).await;
        cursor.advance(BuildPhase::ServerDone);

        cursor.start(Stage::Static, rec);
        stages::static_assets::process_static(&ctx, manifest, rec).await;
        cursor.advance(BuildPhase::StaticDone);

        let version = ctx.package.version_or_default();

        cursor.start(Stage::Manifest, rec);
        let manifest_path = config.output_dir().join(MANIFEST_FILE);
        match write_manifest(&manifest_path, manifest, version, ctx.build_time).await {
            Ok(size) => rec.file_written(&manifest_path, size),
            Err(e) => rec.error(&manifest_path, e.to_string()),
        }
        cursor.advance(BuildPhase::ManifestWritten);

        if !self.hooks.is_empty() {
            cursor.start(Stage::Optimize, rec);
            for hook in &self.hooks {
                log::debug!("Running {} hook", hook.name());
                if let Err(e) = hook.run(config, rec).await {
                    rec.error(Path::new(hook.name()), e.to_string());
                }
            }
        }

        cursor.start(Stage::Metadata, rec);
        let metadata_path = config.output_dir().join(METADATA_FILE);
        let metadata = BuildMetadata {
            build_time: ctx.build_time,
            version,
            runtime_version: ctx.runtime_version.map(ToString::to_string),
            environment: config.environment(),
            config,
            stats: rec.stats().snapshot(),
        };
        match write_metadata(&metadata_path, &metadata).await {
            Ok(size) => rec.file_written(&metadata_path, size),
            Err(e) => rec.error(&metadata_path, e.to_string()),
        }
        cursor.advance(BuildPhase::MetadataWritten);

        cursor.start(Stage::Finalize, rec);
        stages::finalize::finalize_package(&ctx, rec).await;
        cursor.advance(BuildPhase::Done);

        Ok(())
    }
}

/// Phase and stage of the run in progress.
#[derive(Debug)]
struct Cursor {
    phase: BuildPhase,
    stage: Stage,
}

impl Default for Cursor {
    fn default() -> Self {
        Self {
            phase: BuildPhase::Init,
            stage: Stage::Preflight,
        }
    }
}

impl Cursor {
    fn start(&mut self, stage: Stage, rec: &Recorder<'_>) {
        self.stage = stage;
        rec.stage_started(stage);
    }

    fn advance(&mut self, next: BuildPhase) {
        debug_assert!(
            self.phase.can_advance_to(next),
            "invalid transition {} -> {next}",
            self.phase
        );
        self.phase = next;
    }

    fn fail(&mut self) {
        debug_assert!(self.phase.can_fail(), "{} cannot fail", self.phase);
        self.phase = BuildPhase::Failed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::BuildConfigBuilder;
    use crate::build::builder::FixedProbe;
    use crate::build::events::CollectingEventSink;
    use semver::Version;

    #[tokio::test]
    async fn missing_source_fails_in_preflight() {
        let temp = tempfile::tempdir().unwrap();
        let config = BuildConfigBuilder::new()
            .source_dir(temp.path().join("missing"))
            .output_dir(temp.path().join("dist"))
            .build()
            .unwrap();
        let sink = Arc::new(CollectingEventSink::new());

        let mut orchestrator = Orchestrator::new(config)
            .with_probe(FixedProbe::unavailable())
            .with_event_sink(sink.clone());
        assert!(orchestrator.build().await.is_err());

        assert_eq!(orchestrator.phase(), BuildPhase::Failed);
        assert!(!temp.path().join("dist").exists());
        assert!(sink.events().iter().any(|e| matches!(
            e,
            BuildEvent::BuildFailed {
                stage: Stage::Preflight,
                ..
            }
        )));
    }

    #[tokio::test]
    async fn empty_project_reaches_done() {
        let temp = tempfile::tempdir().unwrap();
        let app = temp.path().join("app");
        std::fs::create_dir_all(&app).unwrap();
        let config = BuildConfigBuilder::new()
            .source_dir(&app)
            .output_dir(temp.path().join("dist"))
            .build()
            .unwrap();

        let mut orchestrator = Orchestrator::new(config)
            .with_probe(FixedProbe::unavailable().with_runtime(Version::new(20, 0, 0)));
        let report = orchestrator.build().await.unwrap();

        assert_eq!(orchestrator.phase(), BuildPhase::Done);
        assert!(report.is_success());
        assert!(report.manifest.is_empty());
        assert!(temp.path().join("dist/asset-manifest.json").is_file());
        assert!(temp.path().join("dist/build-metadata.json").is_file());
    }
}
