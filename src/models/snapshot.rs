//! Persisted snapshot of a monitored page.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::RecordSet;

/// The last durably stored structured view of a monitored page.
///
/// Created on the first successful run for a source, read at the start of
/// every subsequent run, and atomically overwritten at the end of every run
/// that succeeds through extraction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Which monitored page this snapshot belongs to
    pub source_key: String,

    /// When the records were captured
    pub captured_at: DateTime<Utc>,

    /// The captured record set
    pub records: RecordSet,
}

impl Snapshot {
    /// Create a snapshot captured now.
    pub fn new(source_key: impl Into<String>, records: RecordSet) -> Self {
        Self {
            source_key: source_key.into(),
            captured_at: Utc::now(),
            records,
        }
    }
}
