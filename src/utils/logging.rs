//! Logging configuration and setup
//!
//! This module provides logging initialization and structured logging helpers
//! for moderation events.

use tracing::{debug, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::config::LoggingConfig;
use crate::utils::errors::{ReportBotError, Result};

/// Initialize logging based on configuration.
///
/// `RUST_LOG` takes precedence over the configured level. The returned guard
/// flushes the file appender and must live as long as the process.
pub fn init_logging(config: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .map_err(|e| ReportBotError::Config(format!("Invalid log filter: {e}")))?;

    let stdout_layer = if config.json {
        fmt::layer().json().with_writer(std::io::stdout).boxed()
    } else {
        fmt::layer().with_writer(std::io::stdout).boxed()
    };

    let (file_layer, guard) = match &config.file_path {
        Some(dir) => {
            let file_appender = tracing_appender::rolling::daily(dir, "reportbot.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            let layer = fmt::layer()
                .with_ansi(false)
                .with_writer(non_blocking)
                .boxed();
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stdout_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| ReportBotError::Config(format!("Logging already initialized: {e}")))?;

    info!("Logging initialized with level: {}", config.level);
    Ok(guard)
}

/// Log a report case transition
pub fn log_report_event(chat_id: i64, case_id: i64, event: &str, details: Option<&str>) {
    info!(
        chat_id = chat_id,
        case_id = case_id,
        event = event,
        details = details,
        "Report event occurred"
    );
}

/// Log a vote interaction
pub fn log_vote(chat_id: i64, case_id: i64, voter_id: i64, total: i64, threshold: i64) {
    debug!(
        chat_id = chat_id,
        case_id = case_id,
        voter_id = voter_id,
        total = total,
        threshold = threshold,
        "Vote toggled"
    );
}

/// Log admin configuration changes
pub fn log_admin_action(admin_id: i64, chat_id: i64, action: &str, value: i64) {
    warn!(
        admin_id = admin_id,
        chat_id = chat_id,
        action = action,
        value = value,
        "Admin action performed"
    );
}
