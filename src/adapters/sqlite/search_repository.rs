//! SQLite implementation of the SearchRepository.

use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{HistoryEntry, SearchHit};
use crate::domain::ports::SearchRepository;

use super::{format_timestamp, parse_timestamp};

#[derive(Clone)]
pub struct SqliteSearchRepository {
    pool: SqlitePool,
}

impl SqliteSearchRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SearchRepository for SqliteSearchRepository {
    async fn record(&self, hits: &[SearchHit]) -> DomainResult<()> {
        if hits.is_empty() {
            return Ok(());
        }

        let mut tx = self.pool.begin().await?;

        for hit in hits {
            sqlx::query(
                r#"INSERT OR IGNORE INTO search_hits (
                       query_text, movie_id, name, year, requester_id, recorded_at
                   ) VALUES (?, ?, ?, ?, ?, ?)"#,
            )
            .bind(&hit.query)
            .bind(&hit.movie_id)
            .bind(&hit.name)
            .bind(hit.year)
            .bind(&hit.requester)
            .bind(format_timestamp(hit.recorded_at))
            .execute(&mut *tx)
            .await?;

            // Strict `<` keeps timestamp ties alive.
            sqlx::query(
                r#"DELETE FROM search_hits
                   WHERE requester_id = ? AND query_text = ?
                     AND recorded_at < (
                         SELECT MAX(recorded_at) FROM search_hits
                         WHERE requester_id = ? AND query_text = ?
                     )"#,
            )
            .bind(&hit.requester)
            .bind(&hit.query)
            .bind(&hit.requester)
            .bind(&hit.query)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn find(&self, query: &str, requester: &str) -> DomainResult<Vec<SearchHit>> {
        let rows: Vec<SearchHitRow> = sqlx::query_as(
            "SELECT * FROM search_hits WHERE query_text = ? AND requester_id = ? ORDER BY rowid",
        )
        .bind(query)
        .bind(requester)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn recent_queries(
        &self,
        requester: &str,
        limit: u32,
    ) -> DomainResult<Vec<HistoryEntry>> {
        let rows: Vec<(String, String)> = sqlx::query_as(
            r#"SELECT query_text, MAX(recorded_at) AS last_seen
               FROM search_hits
               WHERE requester_id = ?
               GROUP BY query_text
               ORDER BY last_seen DESC
               LIMIT ?"#,
        )
        .bind(requester)
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|(query, last_seen)| {
                Ok(HistoryEntry {
                    query,
                    last_seen: parse_timestamp(&last_seen)?,
                })
            })
            .collect()
    }

    async fn distinct_query_count(&self, requester: &str) -> DomainResult<i64> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(DISTINCT query_text) FROM search_hits WHERE requester_id = ?",
        )
        .bind(requester)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }
}

#[derive(sqlx::FromRow)]
struct SearchHitRow {
    query_text: String,
    movie_id: String,
    name: Option<String>,
    year: Option<i64>,
    requester_id: String,
    recorded_at: String,
}

impl TryFrom<SearchHitRow> for SearchHit {
    type Error = DomainError;

    fn try_from(row: SearchHitRow) -> Result<Self, Self::Error> {
        let recorded_at = parse_timestamp(&row.recorded_at)?;
        Ok(SearchHit {
            query: row.query_text,
            movie_id: row.movie_id,
            name: row.name,
            year: row.year,
            requester: row.requester_id,
            recorded_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::sqlite::create_migrated_test_pool;
    use chrono::{Duration, Utc};

    async fn setup_test_repo() -> SqliteSearchRepository {
        let pool = create_migrated_test_pool().await.unwrap();
        SqliteSearchRepository::new(pool)
    }

    fn now() -> chrono::DateTime<Utc> {
        chrono::DateTime::from_timestamp_micros(Utc::now().timestamp_micros()).unwrap()
    }

    fn hit(query: &str, movie_id: &str, requester: &str, at: chrono::DateTime<Utc>) -> SearchHit {
        SearchHit {
            query: query.to_string(),
            movie_id: movie_id.to_string(),
            name: Some(format!("Movie {movie_id}")),
            year: Some(1999),
            requester: requester.to_string(),
            recorded_at: at,
        }
    }

    #[tokio::test]
    async fn test_record_and_find_preserves_order() {
        let repo = setup_test_repo().await;
        let t0 = now();
        let hits = vec![
            hit("matrix", "301", "r1", t0),
            hit("matrix", "302", "r1", t0),
            hit("matrix", "303", "r1", t0),
        ];

        repo.record(&hits).await.unwrap();

        let found = repo.find("matrix", "r1").await.unwrap();
        assert_eq!(found, hits);
    }

    #[tokio::test]
    async fn test_refresh_replaces_rows_not_duplicates() {
        let repo = setup_test_repo().await;
        let t0 = now();
        let original = vec![hit("matrix", "301", "r1", t0), hit("matrix", "302", "r1", t0)];
        repo.record(&original).await.unwrap();

        let t1 = t0 + Duration::seconds(30);
        let refreshed: Vec<SearchHit> = original.iter().map(|h| h.refreshed(t1)).collect();
        repo.record(&refreshed).await.unwrap();

        let found = repo.find("matrix", "r1").await.unwrap();
        assert_eq!(found.len(), 2);
        assert!(found.iter().all(|h| h.recorded_at == t1));
    }

    #[tokio::test]
    async fn test_tied_timestamps_all_survive() {
        let repo = setup_test_repo().await;
        let t0 = now();

        repo.record(&[hit("matrix", "301", "r1", t0)]).await.unwrap();
        repo.record(&[hit("matrix", "302", "r1", t0)]).await.unwrap();

        let found = repo.find("matrix", "r1").await.unwrap();
        assert_eq!(found.len(), 2, "prune is strict <, ties must survive");
    }

    #[tokio::test]
    async fn test_recent_queries_orders_by_latest() {
        let repo = setup_test_repo().await;
        let t0 = now();

        repo.record(&[hit("alpha", "1", "r1", t0)]).await.unwrap();
        repo.record(&[hit("beta", "2", "r1", t0 + Duration::seconds(5))])
            .await
            .unwrap();
        // Re-searching alpha bumps it to the front.
        repo.record(&[hit("alpha", "1", "r1", t0 + Duration::seconds(10))])
            .await
            .unwrap();

        let history = repo.recent_queries("r1", 10).await.unwrap();
        let queries: Vec<&str> = history.iter().map(|h| h.query.as_str()).collect();
        assert_eq!(queries, vec!["alpha", "beta"]);
        assert_eq!(history[0].last_seen, t0 + Duration::seconds(10));
    }

    #[tokio::test]
    async fn test_recent_queries_respects_limit() {
        let repo = setup_test_repo().await;
        let t0 = now();

        for (i, q) in ["a", "b", "c"].iter().enumerate() {
            repo.record(&[hit(q, "1", "r1", t0 + Duration::seconds(i as i64))])
                .await
                .unwrap();
        }

        let history = repo.recent_queries("r1", 2).await.unwrap();
        assert_eq!(history.len(), 2);
    }

    #[tokio::test]
    async fn test_distinct_query_count() {
        let repo = setup_test_repo().await;
        let t0 = now();

        repo.record(&[hit("alpha", "1", "r1", t0)]).await.unwrap();
        repo.record(&[hit("alpha", "1", "r1", t0 + Duration::seconds(1))])
            .await
            .unwrap();
        repo.record(&[hit("beta", "2", "r1", t0)]).await.unwrap();
        repo.record(&[hit("gamma", "3", "r2", t0)]).await.unwrap();

        assert_eq!(repo.distinct_query_count("r1").await.unwrap(), 2);
        assert_eq!(repo.distinct_query_count("r2").await.unwrap(), 1);
        assert_eq!(repo.distinct_query_count("nobody").await.unwrap(), 0);
    }
}
