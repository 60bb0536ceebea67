//! Configuration bootstrap
//!
//! Wires command-line flags, environment variables, and a configuration file
//! into one merged, typed configuration with proper precedence
//! (flag > env > file > flag default).

pub mod error;
pub mod factory;
pub mod loader;
pub mod model;
pub mod replacer;
pub mod store;

pub use error::ConfigError;
pub use factory::ConfigFactory;
pub use loader::load_file_config;
pub use model::FileConfig;
pub use replacer::KeyReplacer;
pub use store::{EnvSource, MockEnv, Settings, StdEnv, Store};
