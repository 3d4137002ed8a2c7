//! Subcommand implementations.

pub mod history;
pub mod init;
pub mod links;
pub mod movie;
pub mod open;
pub mod search;
pub mod stats;
