//! Adapters: concrete implementations of the domain ports.

pub mod providers;
pub mod sqlite;
