//! appstrap: CLI application template with layered configuration
//!
//! Merges command-line flags, environment variables, and a configuration
//! file into one typed configuration and hands it to the application.

use anyhow::Result;

fn main() -> Result<()> {
    appstrap::cli::run()
}
