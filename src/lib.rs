// src/lib.rs

//! curia-watch Library
//!
//! Change detection for the CURIA case-law portal: fetch, extract,
//! diff against the last stored snapshot, persist, notify.

pub mod diff;
pub mod error;
pub mod models;
pub mod notify;
pub mod pipeline;
pub mod services;
pub mod storage;
pub mod utils;
