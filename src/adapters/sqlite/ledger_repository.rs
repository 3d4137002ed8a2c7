//! SQLite implementation of the LedgerRepository.
//!
//! The ledger is append-only: one row per incoming query event, never
//! pruned, read back only as frequency counts.

use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::domain::errors::DomainResult;
use crate::domain::models::QueryCount;
use crate::domain::ports::LedgerRepository;

#[derive(Clone)]
pub struct SqliteLedgerRepository {
    pool: SqlitePool,
}

impl SqliteLedgerRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LedgerRepository for SqliteLedgerRepository {
    async fn append(&self, query: &str, requester: &str) -> DomainResult<()> {
        sqlx::query("INSERT INTO query_ledger (query_text, requester_id) VALUES (?, ?)")
            .bind(query)
            .bind(requester)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn top_queries(&self, requester: &str, limit: u32) -> DomainResult<Vec<QueryCount>> {
        let rows: Vec<(String, i64)> = sqlx::query_as(
            r#"SELECT query_text, COUNT(*) AS cnt
               FROM query_ledger
               WHERE requester_id = ?
               GROUP BY query_text
               ORDER BY cnt DESC, query_text
               LIMIT ?"#,
        )
        .bind(requester)
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(query, count)| QueryCount { query, count })
            .collect())
    }
}
