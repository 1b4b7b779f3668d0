//! File-based mail handoff.
//!
//! Writes each rendered message as a JSON file into an outbox directory
//! where the external mail service picks it up. The actual SMTP transport
//! lives outside this crate.

use std::path::PathBuf;

use async_trait::async_trait;
use chrono::Utc;
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::notify::{MailTransport, OutboundMessage};

/// Mail transport that queues payloads into a directory.
#[derive(Clone)]
pub struct FileOutbox {
    dir: PathBuf,
}

impl FileOutbox {
    /// Create an outbox rooted at the given directory.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait]
impl MailTransport for FileOutbox {
    async fn send(&self, message: &OutboundMessage) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(message)
            .map_err(|e| AppError::notification(format!("payload serialization: {e}")))?;

        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| AppError::notification(format!("outbox: {e}")))?;

        let path = self
            .dir
            .join(format!("message-{}.json", Utc::now().timestamp_millis()));
        let tmp = path.with_extension("tmp");

        let write = async {
            let mut file = tokio::fs::File::create(&tmp).await?;
            file.write_all(&bytes).await?;
            file.flush().await?;
            drop(file);
            tokio::fs::rename(&tmp, &path).await
        };
        write
            .await
            .map_err(|e| AppError::notification(format!("outbox write: {e}")))?;

        log::info!("notification payload queued at {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample_message() -> OutboundMessage {
        OutboundMessage {
            from: "watcher@example.com".to_string(),
            to: vec!["a@example.com".to_string()],
            subject: "CURIA Website Update Alert - 2026-08-27".to_string(),
            body: "Changes detected\n".to_string(),
        }
    }

    #[tokio::test]
    async fn send_queues_a_readable_payload() {
        let tmp = TempDir::new().unwrap();
        let outbox = FileOutbox::new(tmp.path().join("outbox"));

        let message = sample_message();
        outbox.send(&message).await.unwrap();

        let entries: Vec<_> = std::fs::read_dir(tmp.path().join("outbox"))
            .unwrap()
            .map(|e| e.unwrap().path())
            .collect();
        assert_eq!(entries.len(), 1);

        let restored: OutboundMessage =
            serde_json::from_slice(&std::fs::read(&entries[0]).unwrap()).unwrap();
        assert_eq!(restored, message);
    }

    #[tokio::test]
    async fn send_creates_missing_outbox_dir() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("deep").join("outbox");
        let outbox = FileOutbox::new(&dir);

        outbox.send(&sample_message()).await.unwrap();
        assert!(dir.exists());
    }
}
