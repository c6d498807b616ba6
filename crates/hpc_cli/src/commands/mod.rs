//! CLI command definitions.

use clap::{Parser, Subcommand};

pub mod default_validators;
pub mod validate;

/// hpc - HPC blueprint validation
#[derive(Parser)]
#[command(name = "hpc")]
#[command(version, about = "Validate HPC deployment blueprints")]
#[command(long_about = r#"
Validates an HPC deployment blueprint before it is expanded into
infrastructure: global variables, cloud preconditions (project, region and
zone), resource structure, declared outputs and module settings.

COMMANDS:
  validate            → Run every validation stage on a blueprint
  default-validators  → Show the validators a blueprint will run

EXIT CODES:
  0 - Success
  1 - General error
  2 - Invalid arguments
  3 - Validation failure
"#)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate a blueprint
    Validate(validate::ValidateArgs),

    /// Print the validators a blueprint runs
    #[command(name = "default-validators")]
    DefaultValidators(default_validators::DefaultValidatorsArgs),
}

/// Output format for printed documents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Yaml,
    Json,
}
