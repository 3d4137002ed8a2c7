//! Ports: async traits the adapters implement.

pub mod providers;
pub mod repositories;

pub use providers::{LinkProvider, MetadataProvider, ProviderLink, ProviderMovie};
pub use repositories::{
    LedgerRepository, LinkRepository, MovieRepository, SearchRepository,
};
