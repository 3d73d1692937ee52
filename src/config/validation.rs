//! Configuration validation module
//!
//! This module provides validation functions for application configuration
//! to ensure all required settings are properly configured.

use super::cli::{parse_proxy_address, parse_proxy_auth};
use super::Settings;
use crate::utils::errors::{ReportBotError, Result};

/// Longest ban the bot may hand out, ten years
pub const MAX_BAN_DURATION_DAYS: i64 = 3650;

/// Validate all configuration settings
pub fn validate_settings(settings: &Settings) -> Result<()> {
    validate_bot_config(&settings.bot)?;
    validate_database_config(&settings.database)?;
    validate_moderation_config(&settings.moderation)?;
    validate_logging_config(&settings.logging)?;

    Ok(())
}

/// Validate bot configuration
fn validate_bot_config(config: &super::BotConfig) -> Result<()> {
    if config.token.trim().is_empty() {
        return Err(ReportBotError::Config(
            "You must specify the bot token".to_string(),
        ));
    }

    if let Some(proxy) = &config.proxy {
        parse_proxy_address(&proxy.address)?;
        if proxy.username.is_some() != proxy.password.is_some() {
            return Err(ReportBotError::Config(
                "Socks5 username and password must be given together".to_string(),
            ));
        }
        if let (Some(user), Some(pass)) = (&proxy.username, &proxy.password) {
            parse_proxy_auth(&format!("{user}:{pass}"))?;
        }
    }

    Ok(())
}

/// Validate database configuration
fn validate_database_config(config: &super::DatabaseConfig) -> Result<()> {
    if !config.in_memory && config.path.trim().is_empty() {
        return Err(ReportBotError::Config(
            "DB path is not provided".to_string(),
        ));
    }

    Ok(())
}

/// Validate moderation tunables
fn validate_moderation_config(config: &super::ModerationConfig) -> Result<()> {
    if config.ban_duration_days <= 0 || config.ban_duration_days > MAX_BAN_DURATION_DAYS {
        return Err(ReportBotError::Config(format!(
            "Ban duration must be between 1 and {} days",
            MAX_BAN_DURATION_DAYS
        )));
    }

    if config.privilege_check_timeout_secs == 0 {
        return Err(ReportBotError::Config(
            "Privilege check timeout must be greater than 0".to_string(),
        ));
    }

    Ok(())
}

/// Validate logging configuration
fn validate_logging_config(config: &super::LoggingConfig) -> Result<()> {
    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_levels.contains(&config.level.as_str()) {
        return Err(ReportBotError::Config(
            format!("Invalid log level: {}. Valid levels: {:?}", config.level, valid_levels)
        ));
    }

    Ok(())
}
