//! Application settings management
//!
//! This module defines the configuration structure and provides methods
//! for loading settings from TOML files, environment variables and the
//! command line.

use serde::{Deserialize, Serialize};

use super::cli::{parse_proxy_address, parse_proxy_auth, Cli};
use crate::utils::errors::Result;

/// Environment variable prefix, e.g. `REPORTBOT_BOT__TOKEN`
pub const ENV_PREFIX: &str = "REPORTBOT";

/// Main application configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    pub bot: BotConfig,
    pub database: DatabaseConfig,
    pub moderation: ModerationConfig,
    pub logging: LoggingConfig,
}

/// Telegram bot configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct BotConfig {
    pub token: String,
    pub proxy: Option<ProxyConfig>,
}

/// SOCKS5 proxy used for every Bot API request
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ProxyConfig {
    /// `<hostname>:<port>`
    pub address: String,
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Database configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub path: String,
    /// Keep everything in memory; nothing survives a restart
    pub in_memory: bool,
}

/// Tunables of the moderation coordinator
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ModerationConfig {
    /// How long an offender stays banned after an accepted report
    pub ban_duration_days: i64,
    /// Delay before the vote prompt of an accepted report is removed
    pub prompt_grace_secs: u64,
    /// Lifetime of refusal, denial and usage notices
    pub notice_ttl_secs: u64,
    /// Upper bound on the administrator list round trip
    pub privilege_check_timeout_secs: u64,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// Directory for the daily rolling log file; stdout only when absent
    pub file_path: Option<String>,
    pub json: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: "bot.db".to_string(),
            in_memory: false,
        }
    }
}

impl Default for ModerationConfig {
    fn default() -> Self {
        Self {
            ban_duration_days: 730,
            prompt_grace_secs: 5,
            notice_ttl_secs: 30,
            privilege_check_timeout_secs: 5,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file_path: None,
            json: false,
        }
    }
}

impl Settings {
    /// Load settings from the configuration file and environment variables,
    /// then apply command line overrides.
    pub fn load(cli: &Cli) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(&cli.config).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut settings: Settings = settings.try_deserialize()?;
        settings.apply_cli(cli)?;
        Ok(settings)
    }

    /// Apply command line flags on top of file and environment values
    pub fn apply_cli(&mut self, cli: &Cli) -> Result<()> {
        if let Some(token) = &cli.token {
            self.bot.token = token.clone();
        }
        if let Some(path) = &cli.db {
            self.database.path = path.clone();
        }
        if cli.test {
            self.database.in_memory = true;
        }
        if let Some(socks) = &cli.socks {
            let (host, port) = parse_proxy_address(socks)?;
            let proxy = self.bot.proxy.get_or_insert_with(ProxyConfig::default);
            proxy.address = format!("{host}:{port}");
        }
        if let Some(auth) = &cli.socks_auth {
            let (username, password) = parse_proxy_auth(auth)?;
            let proxy = self.bot.proxy.get_or_insert_with(ProxyConfig::default);
            proxy.username = Some(username);
            proxy.password = Some(password);
        }
        Ok(())
    }

    /// Validate configuration settings
    pub fn validate(&self) -> Result<()> {
        super::validation::validate_settings(self)
    }
}
