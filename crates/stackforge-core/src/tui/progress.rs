//! Charm-style progress output for a generation run using cliclack

use crate::features::{Feature, ResolvedConfig};
use crate::generator::{self, GenerateOptions, GenerateReport, PreparedRun};
use crate::sink::DiskSink;
use crate::templates::{version, MiniJinjaBackend, TemplateSource};
use anyhow::Result;
use colored::Colorize;
use std::path::Path;

/// CLI arguments for a generation run
#[derive(Debug, Clone, Default)]
pub struct RunArgs {
    pub options: GenerateOptions,

    /// List every written file after the run
    pub verbose: bool,
}

/// Run a generation with progress output
pub async fn run(args: RunArgs, cli_version: &str) -> Result<()> {
    cliclack::intro(format!("stackforge {}", cli_version))?;

    // Step 1: Load schema, resolve features, plan artifacts
    let prepared = load_schema(&args.options)?;

    // Step 2: Report resolved feature set
    report_features(&prepared.config)?;

    // Step 3: Setup template backend
    let backend = setup_backend(&args.options.templates, cli_version)?;

    // Step 4: Warn before discarding an existing output directory
    warn_existing_output(&args.options.output_dir)?;

    // Step 5: Generate project
    let report = create_project(&prepared, &args.options.output_dir, &backend).await?;

    if args.verbose {
        print_files(&report);
    }

    // Step 6: Show next steps
    print_next_steps(&report)?;

    Ok(())
}

fn load_schema(options: &GenerateOptions) -> Result<PreparedRun> {
    let spinner = cliclack::spinner();
    spinner.start(format!("Loading schema {}...", options.schema_path.display()));

    match PreparedRun::load(&options.schema_path, &options.defaults) {
        Ok(prepared) => {
            spinner.stop(format!(
                "Project: {} ({} entities, {} artifacts)",
                prepared.schema.project_name,
                prepared.schema.entities.len(),
                prepared.plan.len()
            ));
            Ok(prepared)
        }
        Err(e) => {
            spinner.stop("Failed to load schema");
            Err(e.into())
        }
    }
}

fn report_features(config: &ResolvedConfig) -> Result<()> {
    let describe = |features: Vec<Feature>| -> String {
        if features.is_empty() {
            "none".to_string()
        } else {
            features
                .iter()
                .map(Feature::display_name)
                .collect::<Vec<_>>()
                .join(", ")
        }
    };

    let enabled = config.enabled();
    let disabled: Vec<Feature> = Feature::ALL
        .into_iter()
        .filter(|f| !config.is_enabled(*f))
        .collect();

    cliclack::log::info(format!("Enabled: {}", describe(enabled)))?;
    cliclack::log::info(format!("Disabled: {}", describe(disabled)))?;
    Ok(())
}

fn setup_backend(source: &TemplateSource, cli_version: &str) -> Result<MiniJinjaBackend> {
    match source {
        TemplateSource::Local(path) => {
            cliclack::log::info(format!("Using local templates from {}", path.display()))?;
            if let Some(manifest) = source.manifest()? {
                cliclack::log::info(format!(
                    "Template pack: {} ({})",
                    manifest.name, manifest.version
                ))?;
                if let Some(warning) = version::check_compatibility(cli_version, &manifest.version)
                {
                    cliclack::log::warning(warning)?;
                }
            }
        }
        TemplateSource::Embedded => {
            cliclack::log::info("Using built-in templates")?;
        }
    }

    Ok(source.backend()?)
}

fn warn_existing_output(output_dir: &Path) -> Result<()> {
    if output_dir.is_dir() {
        if let Ok(entries) = std::fs::read_dir(output_dir) {
            let count = entries.count();
            if count > 0 {
                cliclack::log::warning(format!(
                    "Replacing {} existing items in {}",
                    count,
                    output_dir.display()
                ))?;
            }
        }
    }
    Ok(())
}

async fn create_project(
    prepared: &PreparedRun,
    output_dir: &Path,
    backend: &MiniJinjaBackend,
) -> Result<GenerateReport> {
    let spinner = cliclack::spinner();
    spinner.start("Generating project...");

    match generator::generate(prepared, output_dir, backend, &DiskSink, |_, _| {}).await {
        Ok(report) => {
            spinner.stop(format!(
                "Created {} files in {}",
                report.files.len(),
                output_dir.display()
            ));
            Ok(report)
        }
        Err(e) => {
            spinner.stop("Generation failed");
            cliclack::log::error(format!("{}", e))?;
            anyhow::bail!("Fix the schema or templates and run again.");
        }
    }
}

fn print_files(report: &GenerateReport) {
    println!();
    for file in &report.files {
        let relative = file.strip_prefix(&report.output_dir).unwrap_or(file);
        println!("  {} {}", "+".green(), relative.display());
    }
}

fn print_next_steps(report: &GenerateReport) -> Result<()> {
    let steps = report.next_steps();

    println!();
    println!("  Next steps");
    println!();

    for (i, step) in steps.iter().enumerate() {
        println!("  {}.  {}", i + 1, step);
    }

    cliclack::outro("Happy coding!")?;

    Ok(())
}
