//! Reelcache - cached movie lookup core
//!
//! Reelcache sits between human movie lookups and two rate-limited upstream
//! providers: a metadata search API and a web-search API used to discover
//! watch links. It answers repeated queries from a local SQLite cache,
//! retains only the newest record per (requester, key), and keeps an
//! append-only ledger of query events for usage statistics.
//!
//! # Architecture
//!
//! - **Domain** (`domain`): models, error taxonomy, and async ports
//! - **Adapters** (`adapters`): SQLite repositories and provider HTTP clients
//! - **Services** (`services`): the fetch-or-cache coordinator and stats reader
//! - **CLI** (`cli`): thin transport glue over the services

pub mod adapters;
pub mod cli;
pub mod config;
pub mod domain;
pub mod services;

// Re-export commonly used types for convenience
pub use config::{ConfigError, ConfigLoader};
pub use domain::errors::{DomainError, DomainResult};
pub use domain::models::{
    CallbackAction, Config, HistoryEntry, Movie, QueryCount, RequesterStats, SearchHit,
    SearchSummary, WatchLink,
};
pub use services::{LookupService, StatsService};
