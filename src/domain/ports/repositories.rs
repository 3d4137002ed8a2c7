//! Repository ports for the three pruned record families and the ledger.
//!
//! Every `record` implementation must run its inserts and the stale-delete
//! for each touched (requester, group-key) inside one transaction. Identical
//! rows are inserted idempotently; rows older than the group maximum are
//! removed, and timestamp ties all survive. A crash between insert and prune
//! leaves transient duplicates that the next settled write cleans up.

use async_trait::async_trait;

use crate::domain::errors::DomainResult;
use crate::domain::models::{HistoryEntry, Movie, QueryCount, SearchHit, WatchLink};

/// Storage for cached movie detail rows, grouped by (requester, movie id).
#[async_trait]
pub trait MovieRepository: Send + Sync {
    /// Insert-or-ignore the given rows, pruning each touched group.
    async fn record(&self, movies: &[Movie]) -> DomainResult<()>;

    /// All surviving rows for (movie id, requester), in insertion order.
    /// More than one row only appears transiently after a crashed prune.
    async fn find(&self, movie_id: &str, requester: &str) -> DomainResult<Vec<Movie>>;
}

/// Storage for cached metadata search rows, grouped by (requester, query).
#[async_trait]
pub trait SearchRepository: Send + Sync {
    async fn record(&self, hits: &[SearchHit]) -> DomainResult<()>;

    async fn find(&self, query: &str, requester: &str) -> DomainResult<Vec<SearchHit>>;

    /// Most recent distinct query texts for a requester, latest first.
    async fn recent_queries(
        &self,
        requester: &str,
        limit: u32,
    ) -> DomainResult<Vec<HistoryEntry>>;

    /// Number of distinct query texts cached for a requester.
    async fn distinct_query_count(&self, requester: &str) -> DomainResult<i64>;
}

/// Storage for cached watch-link rows, grouped by (requester, movie id).
#[async_trait]
pub trait LinkRepository: Send + Sync {
    async fn record(&self, links: &[WatchLink]) -> DomainResult<()>;

    async fn find(&self, movie_id: &str, requester: &str) -> DomainResult<Vec<WatchLink>>;

    /// Number of distinct movies a requester fetched links for.
    async fn distinct_movie_count(&self, requester: &str) -> DomainResult<i64>;
}

/// Append-only ledger of query events, used only for frequency stats.
#[async_trait]
pub trait LedgerRepository: Send + Sync {
    /// Record one query event. Called once per incoming query, before the
    /// cache is even consulted, and never pruned.
    async fn append(&self, query: &str, requester: &str) -> DomainResult<()>;

    /// Most frequent query texts for a requester, count descending.
    async fn top_queries(&self, requester: &str, limit: u32) -> DomainResult<Vec<QueryCount>>;
}
