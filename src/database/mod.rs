//! Database module
//!
//! This module handles the SQLite connection, migrations and the
//! transactional operations used by the entity store.

pub mod connection;
pub mod repositories;
pub mod service;

// Re-export commonly used database components
pub use connection::{DatabasePool, create_pool, run_migrations, health_check};
pub use service::{DatabaseService, CaseContext, OpenReport, OpenReportOutcome, CastVote, CastVoteOutcome};
