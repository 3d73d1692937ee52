//! Error handling for ReportBot
//!
//! This module defines the main error type used throughout the application
//! and how each kind of failure is treated by the event handlers.

use thiserror::Error;

/// Main error type for ReportBot
#[derive(Error, Debug)]
pub enum ReportBotError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Database migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Telegram API error: {0}")]
    Telegram(#[from] teloxide::RequestError),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Settings source error: {0}")]
    Settings(#[from] config::ConfigError),

    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Group not found: {group_id}")]
    GroupNotFound { group_id: i64 },

    #[error("Report case not found: {case_id}")]
    ReportNotFound { case_id: i64 },

    #[error("Entity store is shut down")]
    StoreClosed,

    #[error("Operation timed out: {0}")]
    Timeout(String),
}

/// Result type alias for ReportBot operations
pub type Result<T> = std::result::Result<T, ReportBotError>;

impl ReportBotError {
    /// Whether the error only affects the event being handled.
    ///
    /// Everything except startup configuration and a dead store is contained
    /// within the handler that produced it.
    pub fn is_recoverable(&self) -> bool {
        match self {
            ReportBotError::Config(_) => false,
            ReportBotError::Settings(_) => false,
            ReportBotError::UrlParse(_) => false,
            ReportBotError::Migration(_) => false,
            ReportBotError::StoreClosed => false,
            ReportBotError::Database(_) => true,
            ReportBotError::Telegram(_) => true,
            ReportBotError::Http(_) => true,
            ReportBotError::Io(_) => true,
            ReportBotError::InvalidInput(_) => true,
            ReportBotError::GroupNotFound { .. } => true,
            ReportBotError::ReportNotFound { .. } => true,
            ReportBotError::Timeout(_) => true,
        }
    }

    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            ReportBotError::Config(_)
            | ReportBotError::Settings(_)
            | ReportBotError::Migration(_)
            | ReportBotError::StoreClosed => ErrorSeverity::Critical,
            ReportBotError::InvalidInput(_) => ErrorSeverity::Info,
            ReportBotError::Timeout(_) | ReportBotError::ReportNotFound { .. } => {
                ErrorSeverity::Warning
            }
            _ => ErrorSeverity::Error,
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "INFO"),
            ErrorSeverity::Warning => write!(f, "WARN"),
            ErrorSeverity::Error => write!(f, "ERROR"),
            ErrorSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}
