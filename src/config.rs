//! Configuration loading with hierarchical merging.

use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use thiserror::Error;

use crate::domain::models::Config;

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Database path cannot be empty")]
    EmptyDatabasePath,

    #[error("Invalid max_connections: {0}. Must be at least 1")]
    InvalidMaxConnections(u32),

    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid page_limit: {0}. Must be between 1 and 50")]
    InvalidPageLimit(u32),

    #[error("Invalid timeout: {0}. Must be positive")]
    InvalidTimeout(u64),
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging.
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults
    /// 2. .reelcache/config.yaml (project config, created by init)
    /// 3. .reelcache/local.yaml (local overrides, optional)
    /// 4. Environment variables (REELCACHE_* prefix, highest priority)
    ///
    /// API keys normally arrive through step 4, e.g.
    /// `REELCACHE_KINOPOISK__API_KEY`.
    pub fn load() -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(".reelcache/config.yaml"))
            .merge(Yaml::file(".reelcache/local.yaml"))
            .merge(Env::prefixed("REELCACHE_").split("__"))
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: impl AsRef<std::path::Path>) -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path.as_ref()))
            .extract()
            .context(format!(
                "Failed to load config from {}",
                path.as_ref().display()
            ))?;

        Self::validate(&config)?;
        Ok(config)
    }

    fn validate(config: &Config) -> Result<(), ConfigError> {
        if config.database.path.trim().is_empty() {
            return Err(ConfigError::EmptyDatabasePath);
        }
        if config.database.max_connections < 1 {
            return Err(ConfigError::InvalidMaxConnections(
                config.database.max_connections,
            ));
        }
        if !["trace", "debug", "info", "warn", "error"]
            .contains(&config.logging.level.as_str())
        {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }
        if config.kinopoisk.page_limit == 0 || config.kinopoisk.page_limit > 50 {
            return Err(ConfigError::InvalidPageLimit(config.kinopoisk.page_limit));
        }
        for timeout in [config.kinopoisk.timeout_secs, config.searchapi.timeout_secs] {
            if timeout == 0 {
                return Err(ConfigError::InvalidTimeout(timeout));
            }
        }
        Ok(())
    }
}
