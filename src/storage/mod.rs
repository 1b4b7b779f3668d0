// src/storage/mod.rs

//! Snapshot persistence.
//!
//! The core depends only on the [`SnapshotStore`] trait; the concrete
//! backing store (a directory of files, expected to live inside a
//! versioned file store) is a collaborator behind it.

pub mod local;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{RecordSet, Snapshot};

// Re-export for convenience
pub use local::LocalStore;

/// Abstract load/save interface for snapshots, one per source key.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Load the last snapshot for a source. `Ok(None)` when none exists
    /// yet — the expected state on first run.
    async fn load(&self, source_key: &str) -> Result<Option<Snapshot>>;

    /// Persist a new snapshot for a source, overwriting any prior one.
    /// The write is atomic with respect to process crashes.
    async fn save(&self, source_key: &str, records: &RecordSet) -> Result<Snapshot>;
}

/// Reduce a source key to a safe file stem: lowercase alphanumerics,
/// everything else mapped to `_`.
pub fn file_stem(source_key: &str) -> String {
    source_key
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_stem_sanitizes() {
        assert_eq!(file_stem("Court of Justice"), "court_of_justice");
        assert_eq!(file_stem("general_court"), "general_court");
        assert_eq!(file_stem("a/b..c"), "a_b__c");
    }
}
