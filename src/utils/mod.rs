//! Configuration loading

pub mod config;

pub use config::{ClientConfig, ConfigError, ConfigResult, Environment};
