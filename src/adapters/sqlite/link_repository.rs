//! SQLite implementation of the LinkRepository.

use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::WatchLink;
use crate::domain::ports::LinkRepository;

use super::{format_timestamp, parse_timestamp};

#[derive(Clone)]
pub struct SqliteLinkRepository {
    pool: SqlitePool,
}

impl SqliteLinkRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LinkRepository for SqliteLinkRepository {
    async fn record(&self, links: &[WatchLink]) -> DomainResult<()> {
        if links.is_empty() {
            return Ok(());
        }

        let mut tx = self.pool.begin().await?;

        for link in links {
            sqlx::query(
                r#"INSERT OR IGNORE INTO watch_links (
                       movie_id, link, title, source, requester_id, recorded_at
                   ) VALUES (?, ?, ?, ?, ?, ?)"#,
            )
            .bind(&link.movie_id)
            .bind(&link.link)
            .bind(&link.title)
            .bind(&link.source)
            .bind(&link.requester)
            .bind(format_timestamp(link.recorded_at))
            .execute(&mut *tx)
            .await?;

            // Strict `<` keeps timestamp ties alive.
            sqlx::query(
                r#"DELETE FROM watch_links
                   WHERE requester_id = ? AND movie_id = ?
                     AND recorded_at < (
                         SELECT MAX(recorded_at) FROM watch_links
                         WHERE requester_id = ? AND movie_id = ?
                     )"#,
            )
            .bind(&link.requester)
            .bind(&link.movie_id)
            .bind(&link.requester)
            .bind(&link.movie_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn find(&self, movie_id: &str, requester: &str) -> DomainResult<Vec<WatchLink>> {
        let rows: Vec<WatchLinkRow> = sqlx::query_as(
            "SELECT * FROM watch_links WHERE movie_id = ? AND requester_id = ? ORDER BY rowid",
        )
        .bind(movie_id)
        .bind(requester)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn distinct_movie_count(&self, requester: &str) -> DomainResult<i64> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(DISTINCT movie_id) FROM watch_links WHERE requester_id = ?",
        )
        .bind(requester)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }
}

#[derive(sqlx::FromRow)]
struct WatchLinkRow {
    movie_id: String,
    link: String,
    title: String,
    source: String,
    requester_id: String,
    recorded_at: String,
}

impl TryFrom<WatchLinkRow> for WatchLink {
    type Error = DomainError;

    fn try_from(row: WatchLinkRow) -> Result<Self, Self::Error> {
        let recorded_at = parse_timestamp(&row.recorded_at)?;
        Ok(WatchLink {
            movie_id: row.movie_id,
            link: row.link,
            title: row.title,
            source: row.source,
            requester: row.requester_id,
            recorded_at,
        })
    }
}
