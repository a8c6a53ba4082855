use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use vet::Validator;

mod commands;

use commands::{BasicArgs, ConfigSchemaArgs, ManifestArgs};

#[derive(Parser)]
#[command(name = "vet-cli", version, about = "Run vet validation demos")]
struct Cli {
    /// TOML file configuring path separator and naming conventions
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a small order of books and print the failures
    Basic(BasicArgs),
    /// Validate a container manifest (JSON); exits non-zero on failures
    Manifest(ManifestArgs),
    /// Print the configuration JSON schema
    ConfigSchema(ConfigSchemaArgs),
}

fn validator(config: Option<&PathBuf>) -> Result<Validator> {
    let Some(path) = config else {
        return Ok(Validator::new());
    };
    let cfg = vet::load_config(path)?;
    tracing::debug!(config = %path.display(), separator = %cfg.path.separator, "loaded config");
    Validator::from_config(&cfg).with_context(|| format!("applying config {}", path.display()))
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::ConfigSchema(args) => commands::config_schema::run(args),
        Commands::Basic(args) => {
            let validator = validator(cli.config.as_ref())?;
            commands::basic::run(&validator, args)
        }
        Commands::Manifest(args) => {
            let validator = validator(cli.config.as_ref())?;
            commands::manifest::run(&validator, args)
        }
    }
}

fn main() {
    vet_otel::init();

    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        eprintln!("{err:#}");
        std::process::exit(1);
    }
}
