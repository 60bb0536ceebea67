//! appstrap: CLI application template with layered configuration
//!
//! The reusable piece is [`config`]: a factory that binds a command's flags
//! and the environment into a figment-backed store, and a loader that merges
//! a configuration file into it and extracts a typed [`config::FileConfig`].
//! [`cli`] is the template's command surface and composition root.

pub mod cli;
pub mod config;
