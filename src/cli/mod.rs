//! Command-line transport over the lookup core.
//!
//! Everything here is glue: argument parsing, wiring the shared pool and
//! services together, and rendering. Business rules live in `services`.

pub mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use sqlx::SqlitePool;
use std::sync::Arc;

use crate::adapters::providers::{KinopoiskClient, SearchApiClient};
use crate::adapters::sqlite::{
    initialize_database, PoolConfig, SqliteLedgerRepository, SqliteLinkRepository,
    SqliteMovieRepository, SqliteSearchRepository,
};
use crate::domain::models::Config;
use crate::services::{LookupService, StatsService};

#[derive(Parser)]
#[command(name = "reelcache", version, about = "Cached movie metadata and watch-link lookup")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output machine-readable JSON instead of tables
    #[arg(long, global = true)]
    pub json: bool,

    /// Pseudonymous requester identifier (supplied by the transport layer)
    #[arg(
        long,
        global = true,
        default_value = "local",
        env = "REELCACHE_REQUESTER"
    )]
    pub requester: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write the default config file and create the database
    Init(commands::init::InitArgs),
    /// Search for a movie by title
    Search(commands::search::SearchArgs),
    /// Show cached details for a movie from an earlier search
    Movie(commands::movie::MovieArgs),
    /// Find watch links for a movie from an earlier search
    Links(commands::links::LinksArgs),
    /// Dispatch a callback token of the form {kind}_{id}
    Open(commands::open::OpenArgs),
    /// Show your most recent queries
    History(commands::history::HistoryArgs),
    /// Show usage statistics
    Stats(commands::stats::StatsArgs),
}

/// Shared handles for one command invocation: config, the process-wide
/// pool, and the services wired over it. Built once at command start and
/// closed before exit.
pub struct AppContext {
    pub config: Config,
    pub pool: SqlitePool,
    pub lookup: LookupService,
    pub stats: StatsService,
}

impl AppContext {
    pub async fn init(config: Config) -> Result<Self> {
        let pool = initialize_database(
            &config.database.url(),
            Some(PoolConfig {
                max_connections: config.database.max_connections,
                ..PoolConfig::default()
            }),
        )
        .await?;

        let movies = Arc::new(SqliteMovieRepository::new(pool.clone()));
        let searches = Arc::new(SqliteSearchRepository::new(pool.clone()));
        let links = Arc::new(SqliteLinkRepository::new(pool.clone()));
        let ledger = Arc::new(SqliteLedgerRepository::new(pool.clone()));
        let metadata = Arc::new(KinopoiskClient::new(config.kinopoisk.clone())?);
        let link_provider = Arc::new(SearchApiClient::new(config.searchapi.clone())?);

        let lookup = LookupService::new(
            movies,
            searches.clone(),
            links.clone(),
            ledger.clone(),
            metadata,
            link_provider,
            config.searchapi.query_suffix.clone(),
        );
        let stats = StatsService::new(searches, links, ledger);

        Ok(Self { config, pool, lookup, stats })
    }

    pub async fn close(self) {
        self.pool.close().await;
    }
}

/// Print an error and exit non-zero.
pub fn handle_error(err: anyhow::Error, json: bool) -> ! {
    if json {
        eprintln!(
            "{}",
            serde_json::json!({ "error": format!("{err:#}") })
        );
    } else {
        eprintln!("Error: {err:#}");
    }
    std::process::exit(1);
}
