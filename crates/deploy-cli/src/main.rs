//! deploy-config CLI
//!
//! Non-interactive front-end: recommends recipes for a project, shows the
//! resolved option settings of a recipe and validates proposed values.

mod cli;
mod commands;
mod context;
mod error;
mod offline;

use std::path::Path;
use std::sync::Arc;

use clap::Parser;
use colored::Colorize;
use deploy_validation::ValidatorPipeline;

use cli::{Cli, Commands};
use context::SessionContext;
use error::Result;
use offline::OfflineResourceQueryer;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    let directive = if cli.verbose { "debug" } else { "info" };
    if let Err(e) = deploy_core::logging::init_with_default(directive) {
        eprintln!("{}: failed to initialize logging: {}", "warning".yellow(), e);
    }
    tracing::debug!("Verbose mode enabled");

    execute_command(&cli).await
}

fn load(cli: &Cli, facts: &Path) -> Result<SessionContext> {
    SessionContext::load(facts, &cli.recipe_dirs, cli.global_config_dir.as_deref())
}

async fn execute_command(cli: &Cli) -> Result<()> {
    match &cli.command {
        Commands::Recommend { project, json } => {
            let ctx = load(cli, &project.project)?;
            commands::run_recommend(&ctx, *json)
        }
        Commands::Settings { target, all, json } => {
            let ctx = load(cli, &target.project.project)?;
            let recommendation = ctx.recommendation(&target.recipe, target.previous.as_deref())?;
            commands::run_settings(&recommendation, *all, *json)
        }
        Commands::Validate {
            target,
            assignments,
            all,
        } => {
            let ctx = load(cli, &target.project.project)?;
            let recommendation = ctx.recommendation(&target.recipe, target.previous.as_deref())?;
            let pipeline = ValidatorPipeline::new(Arc::new(OfflineResourceQueryer));
            commands::run_validate(recommendation, &pipeline, assignments, *all).await
        }
    }
}
