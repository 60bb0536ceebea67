//! The merged key/value store backing the bootstrap.
//!
//! `Settings` layers four sources into one figment key-space: flag defaults,
//! the configuration file, environment variables, and explicitly set flags.
//! Later layers win, so an explicit flag beats the environment, which beats
//! the file, which beats a flag's built-in default.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use clap::parser::ValueSource;
use clap::{ArgAction, ArgMatches, Command};
use figment::providers::{Format, Json, Toml, Yaml};
use figment::value::{Dict, Map, Num, Tag, Value};
use figment::{Figment, Metadata, Profile, Provider};
use serde::de::DeserializeOwned;

use super::error::ConfigError;
use super::replacer::KeyReplacer;

/// The narrow store capability the factory configures. Implemented by
/// [`Settings`] and by test doubles, so the configure strategy can be
/// exercised without a real store.
pub trait Store {
    /// Consult environment variables for every bound key during extraction.
    fn enable_auto_env(&mut self);

    /// Install the key replacer used to derive environment variable names.
    fn set_key_replacer(&mut self, replacer: KeyReplacer);

    /// Bind every flag of `cmd` into the store so flag values participate in
    /// lookups. Defaults land in the lowest layer; values the user actually
    /// passed land in the highest.
    fn bind_flags(&mut self, cmd: &Command, matches: &ArgMatches) -> Result<(), ConfigError>;
}

/// Source of environment variables, abstracted so lookups are testable
/// without mutating the process environment.
pub trait EnvSource: fmt::Debug {
    fn get(&self, name: &str) -> Option<String>;
}

/// Reads from the actual process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdEnv;

impl EnvSource for StdEnv {
    fn get(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

/// Environment source backed by a map, for tests.
#[derive(Debug, Clone, Default)]
pub struct MockEnv {
    vars: BTreeMap<String, String>,
}

impl MockEnv {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<I, K, V>(iter: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(name.into(), value.into());
    }
}

impl EnvSource for MockEnv {
    fn get(&self, name: &str) -> Option<String> {
        self.vars.get(name).cloned()
    }
}

/// The figment-backed store produced by the factory and consumed by the
/// loader. Mutated in place by a single owner during startup, read-only
/// afterwards.
#[derive(Debug)]
pub struct Settings {
    auto_env: bool,
    replacer: KeyReplacer,
    env: Box<dyn EnvSource + Send + Sync>,
    bound_keys: Vec<String>,
    flag_defaults: Dict,
    flag_overrides: Dict,
    file_layer: Option<Dict>,
    config_file: Option<PathBuf>,
}

impl Settings {
    pub fn new() -> Self {
        Self {
            auto_env: false,
            replacer: KeyReplacer::env_default(),
            env: Box::new(StdEnv),
            bound_keys: Vec::new(),
            flag_defaults: Dict::new(),
            flag_overrides: Dict::new(),
            file_layer: None,
            config_file: None,
        }
    }

    /// Swap the environment source. Tests use [`MockEnv`] here.
    pub fn set_env_source(&mut self, env: Box<dyn EnvSource + Send + Sync>) {
        self.env = env;
    }

    /// Record the path of the configuration file to read.
    pub fn set_config_file(&mut self, path: impl Into<PathBuf>) {
        self.config_file = Some(path.into());
    }

    pub fn config_file(&self) -> Option<&Path> {
        self.config_file.as_deref()
    }

    /// Read and parse the configuration file set via [`set_config_file`],
    /// installing its contents as the file layer. The format is chosen by
    /// file extension (toml, yaml/yml, json).
    ///
    /// [`set_config_file`]: Settings::set_config_file
    pub fn read_config(&mut self) -> Result<(), ConfigError> {
        let path = self.config_file.clone().ok_or(ConfigError::MissingConfigPath)?;

        let content = fs::read_to_string(&path).map_err(|e| ConfigError::FileRead {
            path: path.clone(),
            source: e.into(),
        })?;

        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("").to_ascii_lowercase();
        let data = match ext.as_str() {
            "toml" => Toml::string(&content).data(),
            "yaml" | "yml" => Yaml::string(&content).data(),
            "json" => Json::string(&content).data(),
            other => {
                return Err(ConfigError::FileRead {
                    path,
                    source: format!("unsupported config extension '.{other}'").into(),
                })
            }
        }
        .map_err(|e| ConfigError::FileRead { path: path.clone(), source: e.into() })?;

        self.file_layer = Some(flatten_profiles(data));
        Ok(())
    }

    /// Extract the merged layers into a typed structure.
    pub fn extract<T: DeserializeOwned>(&self) -> Result<T, ConfigError> {
        let mut figment =
            Figment::new().merge(DictLayer::new("flag defaults", self.flag_defaults.clone()));
        if let Some(file) = &self.file_layer {
            figment = figment.merge(DictLayer::new("config file", file.clone()));
        }
        if self.auto_env {
            figment = figment.merge(DictLayer::new("environment", self.env_layer()));
        }
        figment = figment.merge(DictLayer::new("command-line flags", self.flag_overrides.clone()));

        figment.extract().map_err(ConfigError::Unmarshal)
    }

    fn env_layer(&self) -> Dict {
        let mut dict = Dict::new();
        for key in &self.bound_keys {
            if let Some(raw) = self.env.get(&self.replacer.env_name(key)) {
                dict.insert(key.clone(), parse_scalar(&raw));
            }
        }
        dict
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::new()
    }
}

impl Store for Settings {
    fn enable_auto_env(&mut self) {
        self.auto_env = true;
    }

    fn set_key_replacer(&mut self, replacer: KeyReplacer) {
        self.replacer = replacer;
    }

    fn bind_flags(&mut self, cmd: &Command, matches: &ArgMatches) -> Result<(), ConfigError> {
        for arg in cmd.get_arguments() {
            if arg.is_positional() {
                continue;
            }
            match arg.get_action() {
                ArgAction::Help | ArgAction::HelpShort | ArgAction::HelpLong | ArgAction::Version => {
                    continue
                }
                _ => {}
            }
            let id = arg.get_id().as_str();
            let key = arg.get_long().unwrap_or(id).to_string();

            // Values the user passed and values clap filled in from a flag
            // default both come out of the matches in their declared type;
            // only the layer they land in differs.
            let source = matches.value_source(id);
            if source.is_some() {
                let value = match arg.get_action() {
                    ArgAction::SetTrue | ArgAction::SetFalse => {
                        Value::Bool(Tag::Default, matches.get_flag(id))
                    }
                    ArgAction::Count => {
                        Value::Num(Tag::Default, Num::I64(i64::from(matches.get_count(id))))
                    }
                    _ => match typed_flag_value(matches, id) {
                        Some(value) => value,
                        None => match matches.get_raw(id) {
                            Some(raw) => raw_flag_value(&key, raw)?,
                            None => Value::Bool(Tag::Default, true),
                        },
                    },
                };
                if source == Some(ValueSource::CommandLine) {
                    self.flag_overrides.insert(key.clone(), value);
                } else {
                    self.flag_defaults.insert(key.clone(), value);
                }
            }

            if !self.bound_keys.contains(&key) {
                self.bound_keys.push(key);
            }
        }
        Ok(())
    }
}

/// A pre-resolved dictionary acting as one figment layer.
#[derive(Debug, Clone)]
struct DictLayer {
    name: &'static str,
    dict: Dict,
}

impl DictLayer {
    fn new(name: &'static str, dict: Dict) -> Self {
        Self { name, dict }
    }
}

impl Provider for DictLayer {
    fn metadata(&self) -> Metadata {
        Metadata::named(self.name)
    }

    fn data(&self) -> Result<Map<Profile, Dict>, figment::Error> {
        Ok(Profile::Default.collect(self.dict.clone()))
    }
}

/// Collapse a provider's per-profile data into a single dictionary,
/// preferring the default profile.
fn flatten_profiles(mut data: Map<Profile, Dict>) -> Dict {
    if let Some(dict) = data.remove(&Profile::Default) {
        return dict;
    }
    data.into_iter().next().map(|(_, dict)| dict).unwrap_or_default()
}

/// Flag values in the type their clap parser declared, converted to figment
/// values. Returns `None` for parser types with no figment counterpart; the
/// caller falls back to the raw text.
fn typed_flag_value(matches: &ArgMatches, id: &str) -> Option<Value> {
    macro_rules! downcast {
        ($t:ty, $mk:expr) => {
            if let Ok(Some(vals)) = matches.try_get_many::<$t>(id) {
                return Some(collapse(vals.map($mk).collect()));
            }
        };
    }

    downcast!(String, |v: &String| Value::String(Tag::Default, v.clone()));
    downcast!(PathBuf, |v: &PathBuf| Value::String(Tag::Default, v.to_string_lossy().into_owned()));
    downcast!(bool, |v: &bool| Value::Bool(Tag::Default, *v));
    downcast!(char, |v: &char| Value::Char(Tag::Default, *v));
    downcast!(u8, |v: &u8| Value::Num(Tag::Default, Num::U8(*v)));
    downcast!(u16, |v: &u16| Value::Num(Tag::Default, Num::U16(*v)));
    downcast!(u32, |v: &u32| Value::Num(Tag::Default, Num::U32(*v)));
    downcast!(u64, |v: &u64| Value::Num(Tag::Default, Num::U64(*v)));
    downcast!(u128, |v: &u128| Value::Num(Tag::Default, Num::U128(*v)));
    downcast!(usize, |v: &usize| Value::Num(Tag::Default, Num::USize(*v)));
    downcast!(i8, |v: &i8| Value::Num(Tag::Default, Num::I8(*v)));
    downcast!(i16, |v: &i16| Value::Num(Tag::Default, Num::I16(*v)));
    downcast!(i32, |v: &i32| Value::Num(Tag::Default, Num::I32(*v)));
    downcast!(i64, |v: &i64| Value::Num(Tag::Default, Num::I64(*v)));
    downcast!(i128, |v: &i128| Value::Num(Tag::Default, Num::I128(*v)));
    downcast!(isize, |v: &isize| Value::Num(Tag::Default, Num::ISize(*v)));
    downcast!(f32, |v: &f32| Value::Num(Tag::Default, Num::F32(*v)));
    downcast!(f64, |v: &f64| Value::Num(Tag::Default, Num::F64(*v)));
    None
}

/// Collapse parsed flag values into a single figment value: one value stays
/// a scalar, several become an array, none means bare presence.
fn collapse(mut values: Vec<Value>) -> Value {
    match values.len() {
        0 => Value::Bool(Tag::Default, true),
        1 => values.remove(0),
        _ => Value::Array(Tag::Default, values),
    }
}

/// Parse a raw environment string into the tightest figment scalar: bool,
/// integer, float, then string. Environment variables carry no declared
/// type, so guessing is the only option; flag values never go through here
/// unless their parser type has no figment counterpart.
fn parse_scalar(raw: &str) -> Value {
    if let Ok(b) = raw.parse::<bool>() {
        return Value::Bool(Tag::Default, b);
    }
    if let Ok(i) = raw.parse::<i64>() {
        return Value::Num(Tag::Default, Num::I64(i));
    }
    if let Ok(f) = raw.parse::<f64>() {
        return Value::Num(Tag::Default, Num::F64(f));
    }
    Value::String(Tag::Default, raw.to_string())
}

fn raw_flag_value<'a, I>(key: &str, values: I) -> Result<Value, ConfigError>
where
    I: IntoIterator<Item = &'a std::ffi::OsStr>,
{
    let mut parsed = Vec::new();
    for os in values {
        let s = os.to_str().ok_or_else(|| ConfigError::Bind {
            flag: key.to_string(),
            reason: "value is not valid UTF-8".to_string(),
        })?;
        parsed.push(parse_scalar(s));
    }
    Ok(collapse(parsed))
}
