//! Kinopoisk metadata provider.
//!
//! Calls the movie search endpoint and normalizes its payload into the
//! neutral [`ProviderMovie`] shape. A non-success status is treated as
//! "nothing found" — a movie the provider does not know about is a normal
//! outcome, not infrastructure trouble.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::KinopoiskConfig;
use crate::domain::ports::{MetadataProvider, ProviderMovie};

const PROVIDER_NAME: &str = "kinopoisk";

pub struct KinopoiskClient {
    http: Client,
    config: KinopoiskConfig,
}

impl KinopoiskClient {
    pub fn new(config: KinopoiskConfig) -> DomainResult<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| DomainError::upstream(PROVIDER_NAME, e))?;
        Ok(Self { http, config })
    }

    /// API key from config or the environment.
    fn api_key(&self) -> String {
        self.config
            .api_key
            .clone()
            .or_else(|| std::env::var("KINOPOISK_TOKEN").ok())
            .unwrap_or_default()
    }
}

#[async_trait]
impl MetadataProvider for KinopoiskClient {
    async fn search(&self, query: &str) -> DomainResult<Vec<ProviderMovie>> {
        let url = format!("{}/v1.4/movie/search", self.config.base_url);
        let limit = self.config.page_limit.to_string();
        let response = self
            .http
            .get(&url)
            .header("X-API-KEY", self.api_key())
            .header("accept", "application/json")
            .query(&[("query", query), ("page", "1"), ("limit", limit.as_str())])
            .send()
            .await
            .map_err(|e| DomainError::upstream(PROVIDER_NAME, e))?;

        let status = response.status();
        if !status.is_success() {
            // Not-found collapse: the human simply searched for something
            // the provider has no answer for (or we are being throttled).
            debug!(%status, query, "metadata provider returned non-success, treating as empty");
            return Ok(Vec::new());
        }

        let payload: SearchResponse = response
            .json()
            .await
            .map_err(|e| DomainError::upstream(PROVIDER_NAME, e))?;

        Ok(payload.docs.into_iter().filter_map(Doc::normalize).collect())
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    docs: Vec<Doc>,
}

/// One raw search result. Every field is optional at the wire level; only
/// entries with an id survive normalization.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Doc {
    #[serde(default)]
    id: Option<serde_json::Value>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    alternative_name: Option<String>,
    #[serde(default)]
    year: Option<i64>,
    #[serde(default)]
    countries: Vec<Named>,
    #[serde(default)]
    rating: Option<Rating>,
    #[serde(default)]
    movie_length: Option<i64>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    genres: Vec<Named>,
    #[serde(default)]
    poster: Option<Poster>,
    #[serde(default)]
    external_id: Option<ExternalId>,
}

#[derive(Debug, Deserialize)]
struct Named {
    #[serde(default)]
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Rating {
    #[serde(default)]
    imdb: Option<f64>,
    #[serde(default)]
    kp: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct Poster {
    #[serde(default)]
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ExternalId {
    #[serde(default)]
    imdb: Option<String>,
}

impl Doc {
    /// Entries without an id cannot be referenced later and are dropped
    /// silently; everything else maps missing fields to `None`.
    fn normalize(self) -> Option<ProviderMovie> {
        let movie_id = match self.id? {
            serde_json::Value::Number(n) => n.to_string(),
            serde_json::Value::String(s) if !s.is_empty() => s,
            _ => return None,
        };

        let imdb_id = self.external_id.and_then(|e| e.imdb);
        let genres: Vec<String> = self
            .genres
            .into_iter()
            .filter_map(|g| g.name)
            .collect();

        Some(ProviderMovie {
            kp_url: Some(format!("https://www.kinopoisk.ru/film/{movie_id}/")),
            imdb_url: imdb_id.map(|id| format!("https://www.imdb.com/title/{id}/")),
            movie_id,
            name: self.name,
            alternative_name: self.alternative_name,
            year: self.year,
            country: self.countries.into_iter().next().and_then(|c| c.name),
            imdb_rating: self.rating.as_ref().and_then(|r| r.imdb),
            kp_rating: self.rating.as_ref().and_then(|r| r.kp),
            runtime: self.movie_length,
            description: self.description,
            genres: genres.join(", "),
            poster_url: self.poster.and_then(|p| p.url),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn client_for(server: &mockito::ServerGuard) -> KinopoiskClient {
        KinopoiskClient::new(KinopoiskConfig {
            base_url: server.url(),
            api_key: Some("test-key".to_string()),
            ..KinopoiskConfig::default()
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_search_normalizes_full_payload() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/v1.4/movie/search")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("query".into(), "матрица".into()),
                Matcher::UrlEncoded("page".into(), "1".into()),
                Matcher::UrlEncoded("limit".into(), "5".into()),
            ]))
            .match_header("x-api-key", "test-key")
            .with_status(200)
            .with_body(
                serde_json::json!({
                    "docs": [{
                        "id": 301,
                        "name": "Матрица",
                        "alternativeName": "The Matrix",
                        "year": 1999,
                        "countries": [{"name": "США"}, {"name": "Австралия"}],
                        "rating": {"imdb": 8.7, "kp": 8.5},
                        "movieLength": 136,
                        "description": "Хакер узнаёт правду.",
                        "genres": [{"name": "фантастика"}, {"name": "боевик"}],
                        "poster": {"url": "https://example.com/poster.jpg"},
                        "externalId": {"imdb": "tt0133093"}
                    }]
                })
                .to_string(),
            )
            .create_async()
            .await;

        let results = client_for(&server).search("матрица").await.unwrap();
        mock.assert_async().await;

        assert_eq!(results.len(), 1);
        let movie = &results[0];
        assert_eq!(movie.movie_id, "301");
        assert_eq!(movie.name.as_deref(), Some("Матрица"));
        assert_eq!(movie.alternative_name.as_deref(), Some("The Matrix"));
        assert_eq!(movie.year, Some(1999));
        assert_eq!(movie.country.as_deref(), Some("США"));
        assert_eq!(movie.imdb_rating, Some(8.7));
        assert_eq!(movie.kp_rating, Some(8.5));
        assert_eq!(movie.runtime, Some(136));
        assert_eq!(movie.genres, "фантастика, боевик");
        assert_eq!(movie.kp_url.as_deref(), Some("https://www.kinopoisk.ru/film/301/"));
        assert_eq!(
            movie.imdb_url.as_deref(),
            Some("https://www.imdb.com/title/tt0133093/")
        );
    }

    #[tokio::test]
    async fn test_missing_optional_fields_become_none() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/v1.4/movie/search")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"docs": [{"id": 42}]}"#)
            .create_async()
            .await;

        let results = client_for(&server).search("obscure").await.unwrap();
        assert_eq!(results.len(), 1);
        let movie = &results[0];
        assert_eq!(movie.movie_id, "42");
        assert_eq!(movie.name, None);
        assert_eq!(movie.year, None);
        assert_eq!(movie.country, None);
        assert_eq!(movie.imdb_rating, None);
        assert_eq!(movie.genres, "");
        assert_eq!(movie.imdb_url, None);
        // The detail URL is derivable from the id alone.
        assert_eq!(movie.kp_url.as_deref(), Some("https://www.kinopoisk.ru/film/42/"));
    }

    #[tokio::test]
    async fn test_entries_without_id_are_dropped() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/v1.4/movie/search")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"docs": [{"name": "orphan"}, {"id": 7, "name": "kept"}]}"#)
            .create_async()
            .await;

        let results = client_for(&server).search("anything").await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].movie_id, "7");
    }

    #[tokio::test]
    async fn test_non_success_status_collapses_to_empty() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/v1.4/movie/search")
            .match_query(Matcher::Any)
            .with_status(403)
            .with_body(r#"{"message": "quota exceeded"}"#)
            .create_async()
            .await;

        let results = client_for(&server).search("матрица").await.unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_provider_is_an_error() {
        // Port 9 (discard) is about as unreachable as it gets.
        let client = KinopoiskClient::new(KinopoiskConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            api_key: Some("k".to_string()),
            timeout_secs: 1,
            ..KinopoiskConfig::default()
        })
        .unwrap();

        let err = client.search("матрица").await.unwrap_err();
        assert!(matches!(err, DomainError::Upstream { provider: "kinopoisk", .. }));
    }
}
