//! Error taxonomy for configuration bootstrap.

use std::path::PathBuf;
use thiserror::Error;

/// Everything that can go wrong between parsing flags and holding a typed
/// configuration. No variant is retried or suppressed; the caller decides
/// whether a failure aborts startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Binding a command-line flag into the store failed. Indicates a flag
    /// definition problem rather than bad user input.
    #[error("failed to bind command flag `{flag}`: {reason}")]
    Bind { flag: String, reason: String },

    /// The user ran the program without `--config`.
    #[error("no configuration file path specified")]
    MissingConfigPath,

    /// The configuration file could not be located, read, or parsed.
    #[error("failed to read config file {}", .path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The merged values do not fit the target structure.
    #[error("failed to unmarshal configuration")]
    Unmarshal(#[source] figment::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_read_message_names_the_path() {
        let err = ConfigError::FileRead {
            path: PathBuf::from("/etc/app.yaml"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into(),
        };
        assert!(err.to_string().contains("/etc/app.yaml"));
    }

    #[test]
    fn test_missing_path_message() {
        assert_eq!(
            ConfigError::MissingConfigPath.to_string(),
            "no configuration file path specified"
        );
    }
}
