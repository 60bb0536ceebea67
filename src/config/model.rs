//! The template's typed configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Merged application configuration, populated once at startup from the
/// config file plus any flag and environment overrides, then passed down
/// read-only. Keys are kebab-case to match flag names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct FileConfig {
    /// Address the application binds to.
    pub host: String,

    /// Port the application listens on.
    pub port: u16,

    /// Log level filter (trace, debug, info, warn, error).
    pub log_level: String,

    /// Directory for application state.
    pub data_dir: PathBuf,

    /// Number of worker threads.
    pub workers: usize,

    /// Timeout applied to in-flight work on shutdown, in seconds.
    pub timeout_secs: u64,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            log_level: "info".to_string(),
            data_dir: PathBuf::from("./data"),
            workers: 4,
            timeout_secs: 30,
        }
    }
}
