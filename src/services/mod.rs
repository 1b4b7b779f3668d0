// src/services/mod.rs

//! Fetching and extraction services.

mod extract;
mod fetch;

pub use extract::Extractor;
pub use fetch::Fetcher;
