//! Configuration model for reelcache.

use serde::{Deserialize, Serialize};

/// Main configuration structure for reelcache.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// Database configuration
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Metadata provider (Kinopoisk) configuration
    #[serde(default)]
    pub kinopoisk: KinopoiskConfig,

    /// Link provider (SearchApi) configuration
    #[serde(default)]
    pub searchapi: SearchApiConfig,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct DatabaseConfig {
    /// Path to the `SQLite` database file
    #[serde(default = "default_database_path")]
    pub path: String,

    /// Maximum number of database connections in the pool
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_database_path() -> String {
    ".reelcache/reelcache.db".to_string()
}

const fn default_max_connections() -> u32 {
    5
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_database_path(),
            max_connections: default_max_connections(),
        }
    }
}

impl DatabaseConfig {
    /// Database URL in the form sqlx expects.
    pub fn url(&self) -> String {
        format!("sqlite:{}", self.path)
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Metadata provider configuration.
///
/// The API key is deliberately not defaulted; it is expected to arrive via
/// `REELCACHE_KINOPOISK__API_KEY` or the local config overlay.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct KinopoiskConfig {
    #[serde(default = "default_kinopoisk_base_url")]
    pub base_url: String,

    #[serde(default)]
    pub api_key: Option<String>,

    /// Maximum results requested per search.
    #[serde(default = "default_page_limit")]
    pub page_limit: u32,

    /// Request timeout in seconds. Single attempt, no retry: re-issuing a
    /// failed lookup is left to the human on the other end.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_kinopoisk_base_url() -> String {
    "https://api.kinopoisk.dev".to_string()
}

const fn default_page_limit() -> u32 {
    5
}

const fn default_timeout_secs() -> u64 {
    30
}

impl Default for KinopoiskConfig {
    fn default() -> Self {
        Self {
            base_url: default_kinopoisk_base_url(),
            api_key: None,
            page_limit: default_page_limit(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Link provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SearchApiConfig {
    #[serde(default = "default_searchapi_base_url")]
    pub base_url: String,

    #[serde(default)]
    pub api_key: Option<String>,

    /// Search engine passed to the provider.
    #[serde(default = "default_engine")]
    pub engine: String,

    /// Appended to the movie title when building the link query.
    #[serde(default = "default_query_suffix")]
    pub query_suffix: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_searchapi_base_url() -> String {
    "https://www.searchapi.io".to_string()
}

fn default_engine() -> String {
    "google".to_string()
}

fn default_query_suffix() -> String {
    "смотреть онлайн бесплатно".to_string()
}

impl Default for SearchApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_searchapi_base_url(),
            api_key: None,
            engine: default_engine(),
            query_suffix: default_query_suffix(),
            timeout_secs: default_timeout_secs(),
        }
    }
}
