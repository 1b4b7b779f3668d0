// src/models/mod.rs

//! Domain models for the watcher application.

mod config;
mod record;
mod report;
mod snapshot;

// Re-export all public types
pub use config::{Config, FieldSelector, HttpConfig, MailConfig, MailSettings, PageSchema, Source};
pub use record::{Record, RecordSet};
pub use report::{ChangeReport, ModifiedRecord};
pub use snapshot::Snapshot;
