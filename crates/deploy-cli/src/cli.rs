//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// deploy-config - Recommend deployment recipes for a project and configure them
#[derive(Parser, Debug)]
#[command(name = "deploy-config")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Directory with *.recipe files (repeatable, searched before configured paths)
    #[arg(
        long = "recipes",
        value_name = "DIR",
        global = true,
        env = "DEPLOY_CONFIG_RECIPES",
        value_delimiter = ','
    )]
    pub recipe_dirs: Vec<PathBuf>,

    /// Directory holding the global config.toml
    #[arg(long, value_name = "DIR", global = true, env = "DEPLOY_CONFIG_GLOBAL_DIR")]
    pub global_config_dir: Option<PathBuf>,

    /// The command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// List the recipes that apply to a project, best first
    ///
    /// Examples:
    ///   deploy-config recommend --project facts.json
    ///   deploy-config recommend --project facts.json --json
    Recommend {
        #[command(flatten)]
        project: ProjectArgs,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Show the resolved option settings of one recipe
    ///
    /// Examples:
    ///   deploy-config settings --project facts.json --recipe AspNetAppEcsFargate
    ///   deploy-config settings -p facts.json -r AspNetAppEcsFargate --previous settings.json
    Settings {
        #[command(flatten)]
        target: TargetArgs,

        /// Include settings hidden by their dependencies
        #[arg(long)]
        all: bool,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Validate option setting values for one recipe
    ///
    /// Each --set runs the setting's validators before the value is kept;
    /// the recipe validators run last, against the final values.
    ///
    /// Examples:
    ///   deploy-config validate -p facts.json -r AspNetAppEcsFargate --set DesiredCount=4
    ///   deploy-config validate -p facts.json -r AspNetAppEcsFargate --set 'ECSCluster={"CreateNew":false}'
    Validate {
        #[command(flatten)]
        target: TargetArgs,

        /// Setting to change, by fully qualified id (repeatable)
        #[arg(long = "set", value_name = "ID=VALUE", value_parser = parse_assignment)]
        assignments: Vec<(String, String)>,

        /// Also validate the current value of every displayed setting
        #[arg(long)]
        all: bool,
    },
}

/// Arguments naming the project to work on
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct ProjectArgs {
    /// Project facts file (JSON) produced by the project probe
    #[arg(short, long, value_name = "FACTS")]
    pub project: PathBuf,
}

/// Arguments naming a project and one of its recipes
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct TargetArgs {
    #[command(flatten)]
    pub project: ProjectArgs,

    /// Recipe id
    #[arg(short, long)]
    pub recipe: String,

    /// Settings persisted by a previous deployment (JSON object)
    #[arg(long, value_name = "FILE")]
    pub previous: Option<PathBuf>,
}

/// Parse `Id=value`. The value may be empty and may itself contain `=`.
pub fn parse_assignment(raw: &str) -> Result<(String, String), String> {
    let (id, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected ID=VALUE, got '{raw}'"))?;
    let id = id.trim();
    if id.is_empty() {
        return Err(format!("missing setting id in '{raw}'"));
    }
    Ok((id.to_string(), value.to_string()))
}
