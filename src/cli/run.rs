//! Run command implementation

use anyhow::Result;
use tracing::{debug, info};

use crate::config::FileConfig;

pub fn run(config: &FileConfig) -> Result<()> {
    debug!(?config, "effective configuration");
    info!(host = %config.host, port = config.port, workers = config.workers, "application starting");

    // The template ends here; a real application hands `config` to its
    // server or worker pool and blocks.
    println!(
        "appstrap configured for {}:{} ({} workers, data in {})",
        config.host,
        config.port,
        config.workers,
        config.data_dir.display()
    );
    Ok(())
}
