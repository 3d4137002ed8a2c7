//! SearchApi link-discovery provider.
//!
//! Runs a web search for watch links and normalizes the organic results.
//! Unlike the metadata provider, a non-success status here propagates as an
//! upstream failure: the movie is known to exist at this point, so a failed
//! link search means infrastructure trouble the caller should surface.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::SearchApiConfig;
use crate::domain::ports::{LinkProvider, ProviderLink};

const PROVIDER_NAME: &str = "searchapi";

pub struct SearchApiClient {
    http: Client,
    config: SearchApiConfig,
}

impl SearchApiClient {
    pub fn new(config: SearchApiConfig) -> DomainResult<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| DomainError::upstream(PROVIDER_NAME, e))?;
        Ok(Self { http, config })
    }

    fn api_key(&self) -> String {
        self.config
            .api_key
            .clone()
            .or_else(|| std::env::var("SEARCHAPI_TOKEN").ok())
            .unwrap_or_default()
    }
}

#[async_trait]
impl LinkProvider for SearchApiClient {
    async fn search(&self, query: &str) -> DomainResult<Vec<ProviderLink>> {
        let url = format!("{}/api/v1/search", self.config.base_url);
        let api_key = self.api_key();
        let response = self
            .http
            .get(&url)
            .query(&[
                ("engine", self.config.engine.as_str()),
                ("q", query),
                ("api_key", api_key.as_str()),
            ])
            .send()
            .await
            .map_err(|e| DomainError::upstream(PROVIDER_NAME, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DomainError::Upstream {
                provider: PROVIDER_NAME,
                message: format!("status {status}: {body}"),
            });
        }

        let payload: SearchResponse = response
            .json()
            .await
            .map_err(|e| DomainError::upstream(PROVIDER_NAME, e))?;

        Ok(payload
            .organic_results
            .into_iter()
            .filter_map(OrganicResult::normalize)
            .collect())
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    organic_results: Vec<OrganicResult>,
}

#[derive(Debug, Deserialize)]
struct OrganicResult {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    source: Option<String>,
    #[serde(default)]
    link: Option<String>,
}

impl OrganicResult {
    /// Results without a URL are useless and dropped silently. The source
    /// keeps only its leading label ("ivi.ru" becomes "ivi").
    fn normalize(self) -> Option<ProviderLink> {
        let link = self.link?;
        let source = self
            .source
            .unwrap_or_default()
            .split('.')
            .next()
            .unwrap_or_default()
            .to_string();
        Some(ProviderLink {
            title: self.title.unwrap_or_else(|| "No Title".to_string()),
            source,
            link,
        })
    }
}
