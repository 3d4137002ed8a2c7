//! HTTP adapters for the two upstream providers.

pub mod kinopoisk;
pub mod searchapi;

pub use kinopoisk::KinopoiskClient;
pub use searchapi::SearchApiClient;
