//! Upstream provider ports and their normalized result shapes.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::errors::DomainResult;
use crate::domain::models::{Movie, WatchLink};

/// A normalized metadata search result, not yet bound to a requester.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderMovie {
    pub movie_id: String,
    pub name: Option<String>,
    pub alternative_name: Option<String>,
    pub year: Option<i64>,
    pub country: Option<String>,
    pub imdb_rating: Option<f64>,
    pub kp_rating: Option<f64>,
    pub runtime: Option<i64>,
    pub description: Option<String>,
    pub genres: String,
    pub poster_url: Option<String>,
    pub kp_url: Option<String>,
    pub imdb_url: Option<String>,
}

impl ProviderMovie {
    /// Bind this provider result to a requester and timestamp.
    pub fn into_movie(self, requester: &str, at: DateTime<Utc>) -> Movie {
        Movie {
            movie_id: self.movie_id,
            name: self.name,
            alternative_name: self.alternative_name,
            year: self.year,
            country: self.country,
            imdb_rating: self.imdb_rating,
            kp_rating: self.kp_rating,
            runtime: self.runtime,
            description: self.description,
            genres: self.genres,
            poster_url: self.poster_url,
            kp_url: self.kp_url,
            imdb_url: self.imdb_url,
            requester: requester.to_string(),
            recorded_at: at,
        }
    }
}

/// A normalized link result, not yet bound to a movie or requester.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderLink {
    pub title: String,
    pub source: String,
    pub link: String,
}

impl ProviderLink {
    /// Bind this provider result to a movie, requester and timestamp.
    pub fn into_watch_link(self, movie_id: &str, requester: &str, at: DateTime<Utc>) -> WatchLink {
        WatchLink {
            movie_id: movie_id.to_string(),
            link: self.link,
            title: self.title,
            source: self.source,
            requester: requester.to_string(),
            recorded_at: at,
        }
    }
}

/// The metadata provider: free-text movie search.
///
/// "Nothing found" is a normal outcome and comes back as an empty vec;
/// only transport-level trouble surfaces as an error.
#[async_trait]
pub trait MetadataProvider: Send + Sync {
    async fn search(&self, query: &str) -> DomainResult<Vec<ProviderMovie>>;
}

/// The link-discovery provider: free-text search for watch links.
///
/// Unlike the metadata provider, a non-success response here is an error the
/// caller must handle — link discovery failing means infrastructure trouble,
/// not a missing movie.
#[async_trait]
pub trait LinkProvider: Send + Sync {
    async fn search(&self, query: &str) -> DomainResult<Vec<ProviderLink>>;
}
