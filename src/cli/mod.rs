//! Command-line interface for appstrap
//!
//! Provides `run`, `check`, and `completions` subcommands over a shared set
//! of global configuration flags.

use anyhow::Result;
use clap::{ArgMatches, Command, CommandFactory, FromArgMatches, Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::{load_file_config, ConfigFactory, FileConfig};

pub mod check;
pub mod completions;
pub mod run;

/// Application template wiring flags, environment, and a config file into one configuration
#[derive(Parser)]
#[command(name = "appstrap")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to the configuration file
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<String>,

    /// Address the application binds to
    #[arg(long, global = true, value_name = "ADDR")]
    pub host: Option<String>,

    /// Port the application listens on
    #[arg(long, global = true)]
    pub port: Option<u16>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Directory for application state
    #[arg(long, global = true, value_name = "DIR")]
    pub data_dir: Option<String>,

    /// Number of worker threads
    #[arg(long, global = true)]
    pub workers: Option<usize>,

    /// Timeout applied to in-flight work on shutdown, in seconds
    #[arg(long, global = true, value_name = "SECS")]
    pub timeout_secs: Option<u64>,

    /// Enable verbose logging (sets log level to DEBUG)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the application with the merged configuration
    Run,

    /// Load the configuration and print the effective merged result
    Check(check::CheckArgs),

    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}

pub fn run() -> Result<()> {
    let cmd = Cli::command();
    let matches = cmd.clone().get_matches();
    let cli = Cli::from_arg_matches(&matches)?;

    // Wire verbose flag to the tracing log level.
    // RUST_LOG in the environment always takes precedence; --verbose falls back to DEBUG.
    let filter = if cli.verbose {
        EnvFilter::from_default_env().add_directive(Level::DEBUG.into())
    } else {
        EnvFilter::from_default_env().add_directive(Level::WARN.into())
    };
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init();

    match cli.command {
        Commands::Run => run::run(&bootstrap(&cmd, &matches)?),
        Commands::Check(args) => check::run(args, &bootstrap(&cmd, &matches)?),
        Commands::Completions(args) => completions::run(args),
    }
}

/// Explicit composition root: build the store via the factory, then the
/// typed configuration via the loader. The result is passed down by
/// parameter; nothing is registered globally.
pub fn bootstrap(cmd: &Command, matches: &ArgMatches) -> Result<FileConfig> {
    let factory = ConfigFactory::new();
    let mut settings = factory.configure(cmd, matches)?;
    let config = load_file_config(matches, &mut settings)?;
    Ok(config)
}
