//! Domain models for the reelcache lookup core.

pub mod callback;
pub mod config;
pub mod movie;

pub use callback::CallbackAction;
pub use config::{Config, DatabaseConfig, KinopoiskConfig, LoggingConfig, SearchApiConfig};
pub use movie::{
    HistoryEntry, Movie, QueryCount, RequesterStats, SearchHit, SearchSummary, WatchLink,
};
