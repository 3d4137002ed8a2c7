//! The fetch-or-cache lookup coordinator.
//!
//! Both lookup families run the same machine: consult the store, refresh on
//! hit, fetch-persist-prune on miss. All state lives in the store; nothing
//! is held between calls except the single-flight locks that deduplicate
//! concurrent identical misses.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{Movie, SearchHit, SearchSummary, WatchLink};
use crate::domain::ports::{
    LedgerRepository, LinkProvider, LinkRepository, MetadataProvider, MovieRepository,
    SearchRepository,
};

use super::flight::FlightMap;

pub struct LookupService {
    movies: Arc<dyn MovieRepository>,
    searches: Arc<dyn SearchRepository>,
    links: Arc<dyn LinkRepository>,
    ledger: Arc<dyn LedgerRepository>,
    metadata: Arc<dyn MetadataProvider>,
    link_provider: Arc<dyn LinkProvider>,
    link_query_suffix: String,
    flights: FlightMap,
}

impl LookupService {
    pub fn new(
        movies: Arc<dyn MovieRepository>,
        searches: Arc<dyn SearchRepository>,
        links: Arc<dyn LinkRepository>,
        ledger: Arc<dyn LedgerRepository>,
        metadata: Arc<dyn MetadataProvider>,
        link_provider: Arc<dyn LinkProvider>,
        link_query_suffix: impl Into<String>,
    ) -> Self {
        Self {
            movies,
            searches,
            links,
            ledger,
            metadata,
            link_provider,
            link_query_suffix: link_query_suffix.into(),
            flights: FlightMap::default(),
        }
    }

    /// Resolve a free-text movie search for one requester.
    ///
    /// The ledger is written first, unconditionally: it counts query events,
    /// not outcomes. A provider "nothing found" comes back as an empty vec.
    pub async fn resolve_search(
        &self,
        query: &str,
        requester: &str,
        at: DateTime<Utc>,
    ) -> DomainResult<Vec<SearchSummary>> {
        self.ledger.append(query, requester).await?;

        let cached = self.searches.find(query, requester).await?;
        if !cached.is_empty() {
            return self.refresh_search_hits(&cached, at).await;
        }

        let _guard = self.flights.acquire("search", requester, query).await;

        // Someone may have populated the cache while we waited on the lock.
        let cached = self.searches.find(query, requester).await?;
        if !cached.is_empty() {
            debug!(query, requester, "cache populated while waiting, skipping upstream");
            return self.refresh_search_hits(&cached, at).await;
        }

        info!(query, requester, "search cache miss, querying metadata provider");
        let results = self.metadata.search(query).await?;
        if results.is_empty() {
            debug!(query, requester, "metadata provider found nothing");
            return Ok(Vec::new());
        }

        let hits: Vec<SearchHit> = results
            .iter()
            .map(|m| SearchHit {
                query: query.to_string(),
                movie_id: m.movie_id.clone(),
                name: m.name.clone(),
                year: m.year,
                requester: requester.to_string(),
                recorded_at: at,
            })
            .collect();
        let movies: Vec<Movie> = results
            .into_iter()
            .map(|m| m.into_movie(requester, at))
            .collect();

        self.searches.record(&hits).await?;
        self.movies.record(&movies).await?;

        Ok(hits.iter().map(SearchHit::summary).collect())
    }

    /// Cache hit: re-insert the same rows under a fresh timestamp so the
    /// reaccessed query outlives insertion-time pruning, then answer from
    /// the refreshed rows.
    async fn refresh_search_hits(
        &self,
        cached: &[SearchHit],
        at: DateTime<Utc>,
    ) -> DomainResult<Vec<SearchSummary>> {
        debug!(
            query = cached[0].query.as_str(),
            requester = cached[0].requester.as_str(),
            "search cache hit, refreshing"
        );
        let refreshed: Vec<SearchHit> = cached.iter().map(|h| h.refreshed(at)).collect();
        self.searches.record(&refreshed).await?;
        Ok(refreshed.iter().map(SearchHit::summary).collect())
    }

    /// Resolve cached movie details.
    ///
    /// Details are only reachable through a prior search response, so an
    /// empty result is a caller protocol violation rather than missing
    /// data; it is logged as such and collapsed to `None` for rendering.
    pub async fn resolve_movie(
        &self,
        movie_id: &str,
        requester: &str,
    ) -> DomainResult<Option<Movie>> {
        let rows = self.movies.find(movie_id, requester).await?;
        let latest = rows.into_iter().max_by_key(|m| m.recorded_at);
        if latest.is_none() {
            warn!(
                movie_id,
                requester, "movie requested without a prior search (caller protocol violation)"
            );
        }
        Ok(latest)
    }

    /// Resolve watch links for a movie the requester has already searched.
    ///
    /// Absence of the movie row is a typed logic error; link-provider
    /// trouble propagates as an upstream failure.
    pub async fn resolve_links(
        &self,
        movie_id: &str,
        requester: &str,
        at: DateTime<Utc>,
    ) -> DomainResult<Vec<WatchLink>> {
        let cached = self.links.find(movie_id, requester).await?;
        if !cached.is_empty() {
            return self.refresh_links(&cached, at).await;
        }

        let _guard = self.flights.acquire("links", requester, movie_id).await;

        let cached = self.links.find(movie_id, requester).await?;
        if !cached.is_empty() {
            debug!(movie_id, requester, "cache populated while waiting, skipping upstream");
            return self.refresh_links(&cached, at).await;
        }

        let movie = self
            .movies
            .find(movie_id, requester)
            .await?
            .into_iter()
            .max_by_key(|m| m.recorded_at)
            .ok_or_else(|| DomainError::MovieNotCached {
                movie_id: movie_id.to_string(),
                requester: requester.to_string(),
            })?;

        let query = movie.link_query(&self.link_query_suffix);
        info!(movie_id, requester, query, "link cache miss, querying link provider");
        let results = self.link_provider.search(&query).await?;

        let rows: Vec<WatchLink> = results
            .into_iter()
            .map(|l| l.into_watch_link(movie_id, requester, at))
            .collect();
        self.links.record(&rows).await?;

        Ok(rows)
    }

    async fn refresh_links(
        &self,
        cached: &[WatchLink],
        at: DateTime<Utc>,
    ) -> DomainResult<Vec<WatchLink>> {
        debug!(
            movie_id = cached[0].movie_id.as_str(),
            requester = cached[0].requester.as_str(),
            "link cache hit, refreshing"
        );
        let refreshed: Vec<WatchLink> = cached.iter().map(|l| l.refreshed(at)).collect();
        self.links.record(&refreshed).await?;
        Ok(refreshed)
    }
}
