//! Local filesystem snapshot store.
//!
//! ## Storage Layout
//!
//! ```text
//! {data_dir}/
//! ├── court_of_justice.json
//! └── general_court.json
//! ```
//!
//! One pretty-printed, key-sorted JSON file per source key, so snapshots
//! stay human-diffable inside a versioned file store. Writes go to a
//! temporary file first and are renamed into place, so a crash mid-write
//! never leaves a partial snapshot visible to a subsequent load.

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::models::{RecordSet, Snapshot};
use crate::storage::{SnapshotStore, file_stem};

/// Snapshot store backed by a local directory.
#[derive(Clone)]
pub struct LocalStore {
    data_dir: PathBuf,
}

impl LocalStore {
    /// Create a store rooted at the given directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Snapshot file path for a source key.
    pub fn path(&self, source_key: &str) -> PathBuf {
        self.data_dir.join(format!("{}.json", file_stem(source_key)))
    }

    /// Write bytes atomically (write to temp, then rename).
    async fn write_bytes(&self, path: &PathBuf, bytes: &[u8]) -> Result<()> {
        tokio::fs::create_dir_all(&self.data_dir).await?;

        let tmp = path.with_extension("tmp");
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        drop(file);

        tokio::fs::rename(&tmp, path).await?;
        Ok(())
    }
}

#[async_trait]
impl SnapshotStore for LocalStore {
    async fn load(&self, source_key: &str) -> Result<Option<Snapshot>> {
        let path = self.path(source_key);
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::from(e)),
        }
    }

    async fn save(&self, source_key: &str, records: &RecordSet) -> Result<Snapshot> {
        let snapshot = Snapshot::new(source_key, records.clone());
        let bytes = serde_json::to_vec_pretty(&snapshot)?;

        let path = self.path(source_key);
        self.write_bytes(&path, &bytes).await?;
        log::debug!(
            "snapshot for '{}' written to {} ({} records)",
            source_key,
            path.display(),
            records.len()
        );

        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Record;
    use tempfile::TempDir;

    fn sample_records() -> RecordSet {
        RecordSet::from_records(vec![
            Record::new("C-1/20")
                .with_field("description", "Judgment of the Court")
                .with_field("link", "https://example.com/c1"),
            Record::new("C-2/20").with_field("description", "Opinion"),
        ])
        .unwrap()
    }

    #[tokio::test]
    async fn save_then_load_round_trips() {
        let tmp = TempDir::new().unwrap();
        let store = LocalStore::new(tmp.path());
        let records = sample_records();

        let saved = store.save("court_of_justice", &records).await.unwrap();
        let loaded = store.load("court_of_justice").await.unwrap().unwrap();

        assert_eq!(loaded.records, records);
        assert_eq!(loaded.source_key, "court_of_justice");
        assert_eq!(loaded.captured_at, saved.captured_at);
    }

    #[tokio::test]
    async fn load_missing_snapshot_is_none() {
        let tmp = TempDir::new().unwrap();
        let store = LocalStore::new(tmp.path());

        let loaded = store.load("never_saved").await.unwrap();
        assert!(loaded.is_none());
    }

    #[tokio::test]
    async fn save_overwrites_prior_snapshot() {
        let tmp = TempDir::new().unwrap();
        let store = LocalStore::new(tmp.path());

        store.save("k", &sample_records()).await.unwrap();

        let updated =
            RecordSet::from_records(vec![Record::new("C-3/21").with_field("description", "New")])
                .unwrap();
        store.save("k", &updated).await.unwrap();

        let loaded = store.load("k").await.unwrap().unwrap();
        assert_eq!(loaded.records, updated);
    }

    #[tokio::test]
    async fn save_leaves_no_temp_file() {
        let tmp = TempDir::new().unwrap();
        let store = LocalStore::new(tmp.path());

        store.save("k", &sample_records()).await.unwrap();
        assert!(store.path("k").exists());
        assert!(!store.path("k").with_extension("tmp").exists());
    }

    #[tokio::test]
    async fn keys_are_sanitized_to_file_stems() {
        let tmp = TempDir::new().unwrap();
        let store = LocalStore::new(tmp.path());

        store.save("Court of Justice", &sample_records()).await.unwrap();
        assert!(tmp.path().join("court_of_justice.json").exists());
    }

    #[tokio::test]
    async fn snapshot_json_is_key_sorted() {
        let tmp = TempDir::new().unwrap();
        let store = LocalStore::new(tmp.path());

        store.save("k", &sample_records()).await.unwrap();
        let text = std::fs::read_to_string(store.path("k")).unwrap();

        // Records appear in id order, fields in name order
        let c1 = text.find("C-1/20").unwrap();
        let c2 = text.find("C-2/20").unwrap();
        assert!(c1 < c2);
        let desc = text.find("description").unwrap();
        let link = text.find("link").unwrap();
        assert!(desc < link);
    }
}
