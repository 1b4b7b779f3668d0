// src/pipeline/info.rs

//! Snapshot status reporting.

use crate::error::Result;
use crate::models::Config;
use crate::storage::SnapshotStore;

/// Log the stored snapshot status for every configured source.
pub async fn run_info(config: &Config, store: &dyn SnapshotStore) -> Result<()> {
    for source in &config.sources {
        match store.load(&source.key).await? {
            Some(snapshot) => log::info!(
                "{}: {} records, captured {}",
                source.key,
                snapshot.records.len(),
                snapshot.captured_at.format("%Y-%m-%d %H:%M:%S UTC")
            ),
            None => log::info!("{}: no snapshot yet", source.key),
        }
    }
    Ok(())
}
