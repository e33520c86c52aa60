//! Generation run orchestration
//!
//! A run is: load schema -> resolve features -> plan -> check templates ->
//! prepare skeleton -> render every planned artifact in order. The first
//! error aborts the run; nothing is rolled back.

use crate::error::{GenerateError, Result};
use crate::features::{resolve, FeatureDefaults, ResolvedConfig};
use crate::plan::{plan, ArtifactPlan, ArtifactPlanEntry, MigrationSequence};
use crate::render::RenderPipeline;
use crate::schema::Schema;
use crate::sink::{DiskSink, FileSink};
use crate::skeleton;
use crate::templates::{TemplateBackend, TemplateSource};
use std::path::{Path, PathBuf};

/// Options supplied by the command line
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    /// Path to the schema document
    pub schema_path: PathBuf,

    /// Output root, cleared and repopulated
    pub output_dir: PathBuf,

    /// Feature values used when the schema does not set them
    pub defaults: FeatureDefaults,

    /// Template set to render from
    pub templates: TemplateSource,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            schema_path: PathBuf::from("schema.json"),
            output_dir: PathBuf::from("my-app"),
            defaults: FeatureDefaults::default(),
            templates: TemplateSource::Embedded,
        }
    }
}

/// Everything decided before the filesystem is touched
#[derive(Debug, Clone)]
pub struct PreparedRun {
    pub schema: Schema,
    pub config: ResolvedConfig,
    pub plan: ArtifactPlan,
}

impl PreparedRun {
    /// Load, resolve and plan. Fails before any output directory is touched.
    pub fn load(schema_path: &Path, defaults: &FeatureDefaults) -> Result<Self> {
        let schema = Schema::load(schema_path)?;
        Self::from_schema(schema, defaults, MigrationSequence::from_now())
    }

    pub fn from_schema(
        schema: Schema,
        defaults: &FeatureDefaults,
        migrations: MigrationSequence,
    ) -> Result<Self> {
        let config = resolve(&schema, defaults);
        let plan = plan(&schema, &config, migrations)?;
        Ok(Self {
            schema,
            config,
            plan,
        })
    }
}

/// Outcome of a successful run
#[derive(Debug, Clone)]
pub struct GenerateReport {
    pub output_dir: PathBuf,
    pub config: ResolvedConfig,
    /// Written files, in plan order
    pub files: Vec<PathBuf>,
}

impl GenerateReport {
    /// Commands to get the generated project running
    pub fn next_steps(&self) -> Vec<String> {
        let mut steps = Vec::new();
        let root = self.output_dir.display();

        steps.push(format!("cd {}/backend && npm install && npm run dev", root));
        steps.push(format!("cd {}/frontend && npm install && npm start", root));
        if self.config.docker {
            steps.push(format!("cd {} && docker compose up --build", root));
        }
        if self.config.terraform {
            steps.push(format!("cd {}/terraform && terraform init", root));
        }

        steps
    }
}

/// Fail with the first planned artifact whose template the backend does not ship
pub fn check_templates<B: TemplateBackend>(backend: &B, plan: &ArtifactPlan) -> Result<()> {
    match plan.iter().find(|e| !backend.has_template(e.template_id)) {
        Some(entry) => Err(GenerateError::TemplateNotFound {
            template_id: entry.template_id.to_string(),
            destination: entry.destination.clone(),
        }),
        None => Ok(()),
    }
}

/// Materialize a prepared run below `output_dir`.
///
/// `on_written` is called after each file is written, in plan order.
pub async fn generate<B, S, F>(
    run: &PreparedRun,
    output_dir: &Path,
    backend: &B,
    sink: &S,
    mut on_written: F,
) -> Result<GenerateReport>
where
    B: TemplateBackend,
    S: FileSink,
    F: FnMut(&ArtifactPlanEntry, &Path),
{
    check_templates(backend, &run.plan)?;

    skeleton::prepare(sink, output_dir, &run.config).await?;

    let pipeline = RenderPipeline::new(backend, sink, output_dir, &run.schema, &run.config);
    let mut files = Vec::with_capacity(run.plan.len());

    for entry in &run.plan {
        let path = pipeline.render(entry).await?;
        on_written(entry, &path);
        files.push(path);
    }

    Ok(GenerateReport {
        output_dir: output_dir.to_path_buf(),
        config: run.config,
        files,
    })
}

/// Run a full generation to disk with the configured template source
pub async fn run(options: &GenerateOptions) -> Result<GenerateReport> {
    let prepared = PreparedRun::load(&options.schema_path, &options.defaults)?;
    let backend = options.templates.backend()?;
    generate(&prepared, &options.output_dir, &backend, &DiskSink, |_, _| {}).await
}
