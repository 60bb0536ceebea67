//! Check command implementation
//!
//! Prints the effective merged configuration, which makes the precedence
//! between flags, environment, and file directly observable.

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};

use crate::config::FileConfig;

#[derive(Args)]
pub struct CheckArgs {
    /// Output format for the effective configuration
    #[arg(long, value_enum, default_value = "yaml")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum OutputFormat {
    Yaml,
    Json,
}

pub fn run(args: CheckArgs, config: &FileConfig) -> Result<()> {
    let rendered = match args.format {
        OutputFormat::Yaml => {
            serde_yaml::to_string(config).context("serializing configuration as YAML")?
        }
        OutputFormat::Json => {
            let mut out = serde_json::to_string_pretty(config)
                .context("serializing configuration as JSON")?;
            out.push('\n');
            out
        }
    };
    print!("{rendered}");
    Ok(())
}
