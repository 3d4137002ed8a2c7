//! SQLite adapters for the reelcache record store.

pub mod connection;
pub mod ledger_repository;
pub mod link_repository;
pub mod migrations;
pub mod movie_repository;
pub mod search_repository;

pub use connection::{
    create_pool, create_test_pool, verify_connection, ConnectionError, PoolConfig,
};
pub use ledger_repository::SqliteLedgerRepository;
pub use link_repository::SqliteLinkRepository;
pub use migrations::{all_embedded_migrations, Migration, MigrationError, Migrator};
pub use movie_repository::SqliteMovieRepository;
pub use search_repository::SqliteSearchRepository;

use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::SqlitePool;

use crate::domain::errors::{DomainError, DomainResult};

/// Format a timestamp for storage.
///
/// Fixed-width RFC 3339 UTC with microsecond precision and a `Z` suffix, so
/// the lexicographic `<`/`MAX` comparisons in the prune SQL agree with
/// chronological order. Every write must go through this helper.
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Parse an RFC 3339 timestamp from a SQLite row field.
pub fn parse_timestamp(s: &str) -> DomainResult<DateTime<Utc>> {
    chrono::DateTime::parse_from_rfc3339(s)
        .map_err(|e| DomainError::Serialization(e.to_string()))
        .map(|dt| dt.with_timezone(&Utc))
}

#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    #[error("Connection error: {0}")]
    Connection(#[from] ConnectionError),
    #[error("Migration error: {0}")]
    Migration(#[from] MigrationError),
    #[error("Query error: {0}")]
    Query(#[from] sqlx::Error),
}

/// Create the shared pool and bring the schema up to date. Called once at
/// startup; every session then borrows the same pool.
pub async fn initialize_database(
    database_url: &str,
    pool_config: Option<PoolConfig>,
) -> Result<SqlitePool, DatabaseError> {
    let pool = create_pool(database_url, pool_config).await?;
    let migrator = Migrator::new(pool.clone());
    migrator
        .run_embedded_migrations(all_embedded_migrations())
        .await?;
    Ok(pool)
}

/// Create an in-memory test pool with all migrations applied.
pub async fn create_migrated_test_pool() -> Result<SqlitePool, DatabaseError> {
    let pool = create_test_pool().await?;
    let migrator = Migrator::new(pool.clone());
    migrator
        .run_embedded_migrations(all_embedded_migrations())
        .await?;
    Ok(pool)
}
