//! Configuration management module
//!
//! This module handles loading and validation of application configuration
//! from TOML files, environment variables and command line flags.

pub mod cli;
pub mod settings;
pub mod validation;

pub use cli::Cli;
pub use settings::{Settings, BotConfig, ProxyConfig, DatabaseConfig, ModerationConfig, LoggingConfig};
