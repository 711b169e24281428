//! Shared test utilities.
//!
//! Provides tracing setup and in-memory databases, including one whose table
//! was never created so that every query fails like an unreachable store.

use crate::{config::database, errors::Result};
use sea_orm::DatabaseConnection;
use tracing_subscriber::EnvFilter;

/// Installs a test-friendly tracing subscriber once per process.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("trace")), // Default to TRACE for tests if RUST_LOG is not set
        )
        .with_test_writer()
        .try_init();
}

/// Creates an in-memory `SQLite` database with all tables initialized.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = database::create_connection("sqlite::memory:").await?;
    database::create_tables(&db).await?;
    Ok(db)
}

/// Creates an in-memory database without any tables; every store call errors.
pub async fn setup_unreachable_db() -> Result<DatabaseConnection> {
    database::create_connection("sqlite::memory:").await
}
