//! stackforge CLI - Full-stack project generation from an entity schema

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use colored::Colorize;
use stackforge_core::tui::RunArgs;
use stackforge_core::{FeatureDefaults, GenerateOptions, PreparedRun, TemplateSource};
use std::path::PathBuf;

/// CLI version
pub const CLI_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser, Debug)]
#[command(name = "stackforge")]
#[command(about = "Generate a full-stack project from an entity schema")]
#[command(version)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,

    #[command(flatten)]
    pub generate: GenerateArgs,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate the project (default when no subcommand is given)
    Generate(GenerateArgs),
    /// Print the ordered artifact plan without writing anything
    Plan(GenerateArgs),
}

#[derive(Parser, Debug, Clone)]
pub struct GenerateArgs {
    /// Path to the schema document (JSON, or YAML with a .yaml/.yml extension)
    #[arg(long, default_value = "schema.json")]
    pub schema: PathBuf,

    /// Output directory; its previous contents are discarded
    #[arg(long, default_value = "my-app")]
    pub output: PathBuf,

    /// Generate the GraphQL layer unless the schema says otherwise
    #[arg(long, default_value_t = false, action = ArgAction::Set)]
    pub graphql: bool,

    /// Generate Dockerfiles and docker-compose unless the schema says otherwise
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    pub docker: bool,

    /// Generate the CI workflow unless the schema says otherwise
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    pub ci: bool,

    /// Generate Terraform files unless the schema says otherwise
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    pub terraform: bool,

    /// Generate the admin dashboard unless the schema says otherwise
    #[arg(long = "admin-panel", default_value_t = false, action = ArgAction::Set)]
    pub admin_panel: bool,

    /// Local directory to use for templates instead of the built-in set (for development use)
    #[arg(long = "template-dir")]
    pub template_dir: Option<PathBuf>,

    /// List every generated file
    #[arg(short, long)]
    pub verbose: bool,
}

impl From<GenerateArgs> for RunArgs {
    fn from(args: GenerateArgs) -> Self {
        RunArgs {
            options: GenerateOptions {
                schema_path: args.schema,
                output_dir: args.output,
                defaults: FeatureDefaults {
                    graphql: args.graphql,
                    docker: args.docker,
                    ci: args.ci,
                    terraform: args.terraform,
                    admin_panel: args.admin_panel,
                },
                templates: TemplateSource::resolve(args.template_dir),
            },
            verbose: args.verbose,
        }
    }
}

/// Print the plan for a schema, grouped by stage
fn print_plan(args: GenerateArgs) -> Result<()> {
    let run_args = RunArgs::from(args);
    let prepared = PreparedRun::load(
        &run_args.options.schema_path,
        &run_args.options.defaults,
    )?;

    println!(
        "{}",
        format!(
            "Plan for {} ({} artifacts)",
            prepared.schema.project_name,
            prepared.plan.len()
        )
        .cyan()
        .bold()
    );

    let mut current = None;
    for entry in &prepared.plan {
        if current != Some(entry.stage) {
            println!();
            println!("  {}", entry.stage.label().bold());
            current = Some(entry.stage);
        }
        println!(
            "    {} {} {}",
            entry.destination,
            "<-".dimmed(),
            entry.template_id.dimmed()
        );
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Ensure terminal cursor is restored on panic
    let default_panic = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = console::Term::stderr().show_cursor();
        default_panic(info);
    }));

    // Handle Ctrl+C gracefully
    ctrlc::set_handler(move || {
        let _ = console::Term::stderr().show_cursor();
        std::process::exit(130);
    })
    .ok();

    let args = Args::parse();

    match args.command {
        Some(Command::Plan(plan_args)) => print_plan(plan_args),
        Some(Command::Generate(generate_args)) => run(generate_args).await,
        None => run(args.generate).await,
    }
}

async fn run(args: GenerateArgs) -> Result<()> {
    let result = stackforge_core::run(args.into(), CLI_VERSION).await;

    // Ensure cursor is visible on normal exit
    let _ = console::Term::stderr().show_cursor();

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::parse_from(["stackforge"]);
        assert!(args.command.is_none());
        let run_args = RunArgs::from(args.generate);
        assert_eq!(run_args.options.schema_path, PathBuf::from("schema.json"));
        assert_eq!(run_args.options.output_dir, PathBuf::from("my-app"));
        assert_eq!(run_args.options.defaults, FeatureDefaults::default());
    }

    #[test]
    fn test_boolean_flags_take_values() {
        let args = Args::parse_from([
            "stackforge",
            "--docker",
            "false",
            "--graphql",
            "true",
            "--admin-panel",
            "true",
        ]);
        assert!(!args.generate.docker);
        assert!(args.generate.graphql);
        assert!(args.generate.admin_panel);
        assert!(args.generate.terraform);
    }

    #[test]
    fn test_plan_subcommand() {
        let args = Args::parse_from(["stackforge", "plan", "--schema", "blog.yaml"]);
        match args.command {
            Some(Command::Plan(plan_args)) => {
                assert_eq!(plan_args.schema, PathBuf::from("blog.yaml"))
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_top_level_flags_conflict_with_subcommand() {
        let result = Args::try_parse_from([
            "stackforge",
            "--schema",
            "blog.json",
            "--graphql",
            "true",
            "plan",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_subcommand_flags_are_honoured() {
        let args = Args::try_parse_from([
            "stackforge",
            "plan",
            "--schema",
            "blog.json",
            "--graphql",
            "true",
        ])
        .unwrap();
        match args.command {
            Some(Command::Plan(plan_args)) => {
                assert_eq!(plan_args.schema, PathBuf::from("blog.json"));
                assert!(plan_args.graphql);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_top_level_flags_without_subcommand() {
        let args = Args::try_parse_from(["stackforge", "--schema", "blog.json"]).unwrap();
        assert!(args.command.is_none());
        assert_eq!(args.generate.schema, PathBuf::from("blog.json"));
    }

    #[test]
    fn test_template_dir_selects_local_source() {
        let args = Args::parse_from(["stackforge", "--template-dir", "tpl"]);
        let run_args = RunArgs::from(args.generate);
        assert_eq!(
            run_args.options.templates,
            TemplateSource::Local(PathBuf::from("tpl"))
        );
    }
}
