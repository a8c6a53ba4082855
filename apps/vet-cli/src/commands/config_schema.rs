use anyhow::{Context, Result};
use clap::Args;

#[derive(Args)]
pub struct ConfigSchemaArgs {
    /// Print compact JSON instead of pretty output
    #[arg(long)]
    pub compact: bool,
}

pub fn run(args: ConfigSchemaArgs) -> Result<()> {
    let schema = vet::config_schema_json().context("rendering config schema")?;
    if args.compact {
        println!("{}", schema);
    } else {
        println!(
            "{}",
            serde_json::to_string_pretty(&schema).unwrap_or_else(|_| schema.to_string())
        );
    }
    Ok(())
}
