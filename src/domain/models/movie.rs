//! Core domain records: movies, search hits, watch links, and the
//! read-model shapes derived from them.
//!
//! Every cached record carries the `(requester, key)` pair it is retained
//! under plus a `recorded_at` timestamp; retention keeps only the newest
//! write per group. The structs here are plain data, persistence lives in
//! the adapters.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A movie metadata record as cached for one requester.
///
/// Upstream fields are individually optional; the provider frequently
/// omits ratings, runtime or the alternative title. `genres` is stored
/// pre-joined since it is only ever rendered, never queried.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
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
    pub requester: String,
    pub recorded_at: DateTime<Utc>,
}

impl Movie {
    /// Best available display title.
    pub fn title(&self) -> &str {
        self.name
            .as_deref()
            .or(self.alternative_name.as_deref())
            .unwrap_or("(untitled)")
    }

    /// The free-text query sent to the link provider for this movie:
    /// title, then alternative title and year in parentheses when known,
    /// then the configured suffix.
    pub fn link_query(&self, suffix: &str) -> String {
        let mut parenthetical = Vec::new();
        if let Some(alt) = self.alternative_name.as_deref() {
            if !alt.is_empty() {
                parenthetical.push(alt.to_string());
            }
        }
        if let Some(year) = self.year {
            parenthetical.push(year.to_string());
        }

        let mut query = self.title().to_string();
        if !parenthetical.is_empty() {
            query.push_str(&format!(" ({})", parenthetical.join(", ")));
        }
        if !suffix.is_empty() {
            query.push(' ');
            query.push_str(suffix);
        }
        query
    }
}

/// One search result row, retained per `(requester, query)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub query: String,
    pub movie_id: String,
    pub name: Option<String>,
    pub year: Option<i64>,
    pub requester: String,
    pub recorded_at: DateTime<Utc>,
}

impl SearchHit {
    /// The same hit stamped with a new timestamp, for refresh-on-hit.
    pub fn refreshed(&self, at: DateTime<Utc>) -> Self {
        Self { recorded_at: at, ..self.clone() }
    }

    /// The caller-facing projection of this hit.
    pub fn summary(&self) -> SearchSummary {
        SearchSummary {
            movie_id: self.movie_id.clone(),
            name: self.name.clone(),
            year: self.year,
        }
    }
}

/// What a search answers with: enough to label a result and mint the
/// callback tokens that reach details and links.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchSummary {
    pub movie_id: String,
    pub name: Option<String>,
    pub year: Option<i64>,
}

impl SearchSummary {
    /// Display label, e.g. `The Matrix (1999)`.
    pub fn label(&self) -> String {
        let name = self.name.as_deref().unwrap_or("(untitled)");
        match self.year {
            Some(year) => format!("{name} ({year})"),
            None => name.to_string(),
        }
    }
}

/// One discovered watch link, retained per `(requester, movie)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchLink {
    pub movie_id: String,
    pub link: String,
    pub title: String,
    pub source: String,
    pub requester: String,
    pub recorded_at: DateTime<Utc>,
}

impl WatchLink {
    /// The same link stamped with a new timestamp, for refresh-on-hit.
    pub fn refreshed(&self, at: DateTime<Utc>) -> Self {
        Self { recorded_at: at, ..self.clone() }
    }
}

/// A distinct past query and when it was last seen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub query: String,
    pub last_seen: DateTime<Utc>,
}

/// How often one query text appears in the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryCount {
    pub query: String,
    pub count: i64,
}

/// Aggregate usage figures for one requester.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequesterStats {
    pub distinct_searches: i64,
    pub distinct_link_lookups: i64,
    pub top_queries: Vec<QueryCount>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movie() -> Movie {
        Movie {
            movie_id: "301".to_string(),
            name: Some("The Matrix".to_string()),
            alternative_name: Some("Матрица".to_string()),
            year: Some(1999),
            country: Some("USA".to_string()),
            imdb_rating: Some(8.7),
            kp_rating: Some(8.5),
            runtime: Some(136),
            description: None,
            genres: "sci-fi, action".to_string(),
            poster_url: None,
            kp_url: None,
            imdb_url: None,
            requester: "r1".to_string(),
            recorded_at: Utc::now(),
        }
    }

    #[test]
    fn title_falls_back_through_names() {
        let mut m = movie();
        assert_eq!(m.title(), "The Matrix");

        m.name = None;
        assert_eq!(m.title(), "Матрица");

        m.alternative_name = None;
        assert_eq!(m.title(), "(untitled)");
    }

    #[test]
    fn link_query_includes_known_parts() {
        let m = movie();
        assert_eq!(
            m.link_query("watch online"),
            "The Matrix (Матрица, 1999) watch online"
        );
    }

    #[test]
    fn link_query_omits_empty_parenthetical() {
        let mut m = movie();
        m.alternative_name = None;
        m.year = None;
        assert_eq!(m.link_query("watch online"), "The Matrix watch online");
    }

    #[test]
    fn link_query_without_suffix() {
        let mut m = movie();
        m.alternative_name = None;
        assert_eq!(m.link_query(""), "The Matrix (1999)");
    }

    #[test]
    fn refreshed_hit_changes_only_timestamp() {
        let hit = SearchHit {
            query: "matrix".to_string(),
            movie_id: "301".to_string(),
            name: Some("The Matrix".to_string()),
            year: Some(1999),
            requester: "r1".to_string(),
            recorded_at: Utc::now(),
        };
        let later = hit.recorded_at + chrono::Duration::seconds(30);

        let refreshed = hit.refreshed(later);
        assert_eq!(refreshed.recorded_at, later);
        assert_eq!(refreshed.query, hit.query);
        assert_eq!(refreshed.movie_id, hit.movie_id);
    }

    #[test]
    fn summary_label_renders_year() {
        let summary = SearchSummary {
            movie_id: "301".to_string(),
            name: Some("The Matrix".to_string()),
            year: Some(1999),
        };
        assert_eq!(summary.label(), "The Matrix (1999)");

        let bare = SearchSummary { movie_id: "302".to_string(), name: None, year: None };
        assert_eq!(bare.label(), "(untitled)");
    }
}
