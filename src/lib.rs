//! ReportBot Telegram Bot
//!
//! A Telegram bot for group chat moderation by peer vote. Members flag a
//! message with `/report`, eligible members vote on it, and once enough votes
//! are in the author is removed from the group.

#![allow(non_snake_case)]

pub mod config;
pub mod database;
pub mod handlers;
pub mod models;
pub mod services;
pub mod utils;

// Re-export commonly used types
pub use config::Settings;
pub use utils::errors::{ReportBotError, Result};

// Re-export main components for easy access
pub use database::DatabaseService;
pub use services::{EntityStore, Moderator, TelegramModerator};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get library information
pub fn info() -> String {
    format!("{} v{}", NAME, VERSION)
}
