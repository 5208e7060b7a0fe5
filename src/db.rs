//! Database connection and pool management for the Vetted BFF.
//!
//! This module provides functionality to initialize and manage a SeaORM
//! connection pool with configurable parameters, and to apply migrations.

use anyhow::{Context, Result};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection};
use std::time::Duration;
use tokio::time::sleep;

use crate::config::AppConfig;

/// Number of connection attempts made at startup
const CONNECT_ATTEMPTS: u32 = 5;
/// Delay before the second attempt; doubled after each failure
const INITIAL_BACKOFF: Duration = Duration::from_millis(100);

/// Errors raised while opening the connection pool.
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    #[error("database unreachable after {attempts} attempts: {source}")]
    Unreachable {
        attempts: u32,
        #[source]
        source: sea_orm::DbErr,
    },
    #[error("invalid database configuration: {0}")]
    InvalidConfiguration(&'static str),
}

/// Opens the SeaORM pool described by `cfg`.
///
/// A database that is still starting is retried up to five times with a
/// doubling delay from 100ms. This is the only place that retries; request
/// handlers make one attempt per call.
///
/// ```no_run
/// use vetted_bff::{config::AppConfig, db::init_pool};
///
/// #[tokio::main]
/// async fn main() -> anyhow::Result<()> {
///     let db = init_pool(&AppConfig::default()).await?;
///     vetted_bff::db::health_check(&db).await
/// }
/// ```
pub async fn init_pool(cfg: &AppConfig) -> Result<DatabaseConnection> {
    if cfg.database_url.trim().is_empty() {
        return Err(DatabaseError::InvalidConfiguration("database URL is empty").into());
    }

    let options = pool_options(cfg);
    let mut delay = INITIAL_BACKOFF;
    let mut attempt = 1;

    loop {
        match Database::connect(options.clone()).await {
            Ok(db) => {
                tracing::info!(
                    attempt,
                    max_connections = cfg.db_max_connections,
                    "Database pool ready"
                );
                return Ok(db);
            }
            Err(source) if attempt >= CONNECT_ATTEMPTS => {
                tracing::error!(attempts = attempt, error = %source, "Giving up on database");
                return Err(DatabaseError::Unreachable {
                    attempts: attempt,
                    source,
                }
                .into());
            }
            Err(err) => {
                tracing::warn!(
                    attempt,
                    error = %err,
                    retry_in_ms = delay.as_millis() as u64,
                    "Database not reachable yet"
                );
                sleep(delay).await;
                delay *= 2;
                attempt += 1;
            }
        }
    }
}

fn pool_options(cfg: &AppConfig) -> ConnectOptions {
    let mut options = ConnectOptions::new(cfg.database_url.as_str());
    options
        .max_connections(cfg.db_max_connections)
        .acquire_timeout(Duration::from_millis(cfg.db_acquire_timeout_ms))
        .idle_timeout(Duration::from_secs(10 * 60))
        .max_lifetime(Duration::from_secs(30 * 60))
        .sqlx_logging(true)
        .sqlx_logging_level(log::LevelFilter::Debug);
    options
}

/// Applies all pending migrations from the `migration` crate.
pub async fn run_migrations(db: &DatabaseConnection) -> Result<()> {
    Migrator::up(db, None)
        .await
        .context("applying database migrations")?;
    tracing::info!("Database migrations applied");
    Ok(())
}

/// Health check for the database connection.
///
/// Verifies that the database connection is still active by executing a
/// trivial query.
pub async fn health_check(db: &DatabaseConnection) -> Result<()> {
    use sea_orm::Statement;

    let stmt = Statement::from_string(db.get_database_backend(), "SELECT 1".to_string());

    db.query_one(stmt)
        .await
        .context("Database health check failed")?;

    Ok(())
}
