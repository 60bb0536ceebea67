//! File configuration loading over a configured store.

use clap::ArgMatches;
use std::path::PathBuf;

use super::error::ConfigError;
use super::model::FileConfig;
use super::store::Settings;

/// Load the configuration file named by the `config` flag into the store and
/// unmarshal the merged result.
///
/// Fails with [`ConfigError::MissingConfigPath`] before touching the
/// filesystem when the flag is absent or empty, with
/// [`ConfigError::FileRead`] when the file cannot be read or parsed, and with
/// [`ConfigError::Unmarshal`] when the merged values do not fit
/// [`FileConfig`].
pub fn load_file_config(
    matches: &ArgMatches,
    settings: &mut Settings,
) -> Result<FileConfig, ConfigError> {
    let path = config_flag_path(matches)?;
    settings.set_config_file(path);
    settings.read_config()?;
    settings.extract()
}

/// The `config` flag's current value, if the command defines one and the
/// user supplied a non-empty path. The value is kept as an OS path, so a
/// path that is not valid UTF-8 is still attempted.
fn config_flag_path(matches: &ArgMatches) -> Result<PathBuf, ConfigError> {
    let Some(value) = matches
        .try_get_raw("config")
        .ok()
        .flatten()
        .and_then(|mut raw| raw.next())
    else {
        return Err(ConfigError::MissingConfigPath);
    };

    if value.is_empty() {
        return Err(ConfigError::MissingConfigPath);
    }
    Ok(PathBuf::from(value))
}
