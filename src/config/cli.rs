//! Command line interface
//!
//! Flags given here override the configuration file and the environment.

use clap::Parser;
use regex::Regex;

use crate::utils::errors::{ReportBotError, Result};

#[derive(Parser, Debug, Clone)]
#[command(name = "reportbot")]
#[command(about = "Telegram bot that removes offenders from group chats by peer vote")]
pub struct Cli {
    /// Telegram bot token
    #[arg(long, env = "REPORTBOT_TOKEN")]
    pub token: Option<String>,

    /// Path of the SQLite database file
    #[arg(long)]
    pub db: Option<String>,

    /// Use an in-memory database
    #[arg(long)]
    pub test: bool,

    /// SOCKS5 proxy in the form <hostname>:<port>
    #[arg(long)]
    pub socks: Option<String>,

    /// SOCKS5 credentials in the form <user>:<pass>
    #[arg(long = "socks-auth")]
    pub socks_auth: Option<String>,

    /// Configuration file, without extension
    #[arg(short, long, default_value = "config")]
    pub config: String,
}

/// Split a `<hostname>:<port>` proxy address
pub fn parse_proxy_address(value: &str) -> Result<(String, u16)> {
    let re = Regex::new(r"^(.+):(\d+)$").map_err(|e| ReportBotError::Config(e.to_string()))?;
    let caps = re.captures(value).ok_or_else(|| {
        ReportBotError::Config("Socks5 URL must be in the form of <hostname>:<port>".to_string())
    })?;
    let port = caps[2]
        .parse::<u16>()
        .map_err(|_| ReportBotError::Config(format!("Invalid socks5 port: {}", &caps[2])))?;
    Ok((caps[1].to_string(), port))
}

/// Split `<user>:<pass>` proxy credentials
pub fn parse_proxy_auth(value: &str) -> Result<(String, String)> {
    let re = Regex::new(r"^([^:]+):(.*)$").map_err(|e| ReportBotError::Config(e.to_string()))?;
    let caps = re.captures(value).ok_or_else(|| {
        ReportBotError::Config("Socks5 auth data must be in the form of <user>:<pass>".to_string())
    })?;
    Ok((caps[1].to_string(), caps[2].to_string()))
}
