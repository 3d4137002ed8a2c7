//! Read-only history and usage projections over the record store.

use std::sync::Arc;

use crate::domain::errors::DomainResult;
use crate::domain::models::{HistoryEntry, RequesterStats};
use crate::domain::ports::{LedgerRepository, LinkRepository, SearchRepository};

pub struct StatsService {
    searches: Arc<dyn SearchRepository>,
    links: Arc<dyn LinkRepository>,
    ledger: Arc<dyn LedgerRepository>,
}

impl StatsService {
    pub fn new(
        searches: Arc<dyn SearchRepository>,
        links: Arc<dyn LinkRepository>,
        ledger: Arc<dyn LedgerRepository>,
    ) -> Self {
        Self { searches, links, ledger }
    }

    /// Most recent distinct queries for a requester, latest first.
    pub async fn history(&self, requester: &str, limit: u32) -> DomainResult<Vec<HistoryEntry>> {
        self.searches.recent_queries(requester, limit).await
    }

    /// Aggregate usage figures for a requester.
    pub async fn stats(&self, requester: &str, top: u32) -> DomainResult<RequesterStats> {
        let distinct_searches = self.searches.distinct_query_count(requester).await?;
        let distinct_link_lookups = self.links.distinct_movie_count(requester).await?;
        let top_queries = self.ledger.top_queries(requester, top).await?;

        Ok(RequesterStats {
            distinct_searches,
            distinct_link_lookups,
            top_queries,
        })
    }
}
