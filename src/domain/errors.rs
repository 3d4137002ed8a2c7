//! Domain errors for the reelcache lookup core.

use thiserror::Error;

/// Domain-level errors surfaced by the lookup core.
///
/// Expected absence (an unknown query, a movie the provider has never heard
/// of) is not an error: it collapses to an empty result at the service
/// boundary. Everything here indicates either infrastructure trouble or a
/// caller protocol violation.
#[derive(Debug, Error)]
pub enum DomainError {
    /// Detail or link resolution was invoked for a movie the requester never
    /// searched for. The callback protocol only hands out movie ids after a
    /// search response, so this is a caller bug, not missing data.
    #[error("Movie {movie_id} was never cached for requester {requester}")]
    MovieNotCached { movie_id: String, requester: String },

    #[error("Upstream provider {provider} failed: {message}")]
    Upstream {
        provider: &'static str,
        message: String,
    },

    #[error("Database error: {0}")]
    Database(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

pub type DomainResult<T> = Result<T, DomainError>;

impl DomainError {
    /// Build an upstream failure from a provider name and any error value.
    pub fn upstream(provider: &'static str, err: impl std::fmt::Display) -> Self {
        Self::Upstream {
            provider,
            message: err.to_string(),
        }
    }
}

impl From<sqlx::Error> for DomainError {
    fn from(err: sqlx::Error) -> Self {
        DomainError::Database(err.to_string())
    }
}

impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        DomainError::Serialization(err.to_string())
    }
}
