//! Factory producing configured [`Settings`] stores.

use clap::{ArgMatches, Command};

use super::error::ConfigError;
use super::replacer::KeyReplacer;
use super::store::{Settings, Store};

/// Strategy for configuring a freshly created store against a command.
pub type ConfigureFn =
    fn(&mut dyn Store, &Command, &ArgMatches, &KeyReplacer) -> Result<(), ConfigError>;

/// Produces independent [`Settings`] instances bound to a command's flags and
/// to environment variables. Holds only the replacer and the configure
/// strategy; calling [`configure`] twice yields two stores that share no
/// mutable state.
///
/// [`configure`]: ConfigFactory::configure
#[derive(Debug, Clone)]
pub struct ConfigFactory {
    replacer: KeyReplacer,
    configure: ConfigureFn,
}

impl ConfigFactory {
    /// A factory with the environment-variable replacer (`-`/`.` to `_`) and
    /// the standard configure strategy.
    pub fn new() -> Self {
        Self { replacer: KeyReplacer::env_default(), configure: configure_store }
    }

    /// Create a new store and run the configure strategy over it.
    pub fn configure(&self, cmd: &Command, matches: &ArgMatches) -> Result<Settings, ConfigError> {
        let mut settings = Settings::new();
        (self.configure)(&mut settings, cmd, matches, &self.replacer)?;
        Ok(settings)
    }
}

impl Default for ConfigFactory {
    fn default() -> Self {
        Self::new()
    }
}

/// The standard configure strategy: enable automatic environment lookups,
/// install the replacer, and bind every flag of the command into the store.
pub fn configure_store(
    store: &mut dyn Store,
    cmd: &Command,
    matches: &ArgMatches,
    replacer: &KeyReplacer,
) -> Result<(), ConfigError> {
    store.enable_auto_env();
    store.set_key_replacer(replacer.clone());
    store.bind_flags(cmd, matches)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Arg;
    use serde::Deserialize;

    /// Store double recording which capabilities were invoked.
    #[derive(Debug, Default)]
    struct RecordingStore {
        calls: Vec<&'static str>,
    }

    impl Store for RecordingStore {
        fn enable_auto_env(&mut self) {
            self.calls.push("enable_auto_env");
        }

        fn set_key_replacer(&mut self, _replacer: KeyReplacer) {
            self.calls.push("set_key_replacer");
        }

        fn bind_flags(&mut self, _cmd: &Command, _matches: &ArgMatches) -> Result<(), ConfigError> {
            self.calls.push("bind_flags");
            Ok(())
        }
    }

    fn sample_cmd() -> Command {
        Command::new("sample")
            .arg(Arg::new("host").long("host").num_args(1))
            .arg(
                Arg::new("port")
                    .long("port")
                    .num_args(1)
                    .value_parser(clap::value_parser!(u16)),
            )
    }

    #[test]
    fn test_configure_store_runs_all_three_steps_in_order() {
        let cmd = sample_cmd();
        let matches = cmd.clone().try_get_matches_from(["sample"]).expect("parse");
        let mut store = RecordingStore::default();

        configure_store(&mut store, &cmd, &matches, &KeyReplacer::env_default()).expect("configure");
        assert_eq!(store.calls, vec!["enable_auto_env", "set_key_replacer", "bind_flags"]);
    }

    #[test]
    fn test_configure_twice_yields_independent_stores() {
        #[derive(Debug, Default, Deserialize, PartialEq)]
        #[serde(default)]
        struct Partial {
            host: Option<String>,
            port: Option<u16>,
        }

        let cmd = sample_cmd();
        let matches =
            cmd.clone().try_get_matches_from(["sample", "--port", "9090"]).expect("parse");
        let factory = ConfigFactory::new();

        let first = factory.configure(&cmd, &matches).expect("first");
        let mut second = factory.configure(&cmd, &matches).expect("second");
        second.set_config_file("/tmp/never-read.yaml");

        let a: Partial = first.extract().expect("extract first");
        let b: Partial = second.extract().expect("extract second");
        assert_eq!(a, b);
        assert_eq!(a.port, Some(9090));
        assert_eq!(first.config_file(), None);
    }
}
