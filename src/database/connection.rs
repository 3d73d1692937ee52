//! Database connection management

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

use crate::config::DatabaseConfig;
use crate::utils::errors::ReportBotError;

pub type DatabasePool = SqlitePool;

/// Create a new database connection pool.
///
/// An in-memory database lives inside a single connection, so the pool is
/// pinned to exactly one connection that is never recycled.
pub async fn create_pool(config: &DatabaseConfig) -> Result<DatabasePool, ReportBotError> {
    let options = if config.in_memory {
        SqliteConnectOptions::from_str("sqlite::memory:")?
    } else {
        SqliteConnectOptions::new()
            .filename(&config.path)
            .create_if_missing(true)
    };
    let options = options.foreign_keys(true);

    let pool_options = if config.in_memory {
        SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        SqlitePoolOptions::new().max_connections(4)
    };

    let pool = pool_options.connect_with(options).await?;

    // Test the connection
    sqlx::query("SELECT 1").execute(&pool).await?;

    tracing::info!(
        in_memory = config.in_memory,
        path = %config.path,
        "Database connection pool created successfully"
    );
    Ok(pool)
}

/// Run database migrations
pub async fn run_migrations(pool: &DatabasePool) -> Result<(), ReportBotError> {
    tracing::info!("Running database migrations...");

    sqlx::migrate!("./migrations").run(pool).await?;

    tracing::info!("Database migrations completed successfully");
    Ok(())
}

/// Check database health
pub async fn health_check(pool: &DatabasePool) -> Result<(), ReportBotError> {
    sqlx::query("SELECT 1").execute(pool).await?;

    Ok(())
}
