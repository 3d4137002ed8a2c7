//! Service layer: lookup coordination and reporting.

pub mod flight;
pub mod lookup_service;
pub mod stats_service;

pub use lookup_service::LookupService;
pub use stats_service::StatsService;
