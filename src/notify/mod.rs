// src/notify/mod.rs

//! Notification rendering and dispatch.
//!
//! The notifier turns change reports into one plain-text message and hands
//! it to a [`MailTransport`] collaborator. It sends nothing when every
//! report is empty, and treats first-run baseline captures as
//! not-noteworthy: the diff engine reports them honestly as added, the
//! policy of staying quiet about them lives here.

pub mod outbox;

use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::{ChangeReport, MailSettings, ModifiedRecord, Record};

// Re-export for convenience
pub use outbox::FileOutbox;

/// A rendered notification payload, ready for the external mail service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundMessage {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub body: String,
}

/// External mail-sending collaborator.
#[async_trait]
pub trait MailTransport: Send + Sync {
    /// Hand a message off for delivery.
    async fn send(&self, message: &OutboundMessage) -> Result<()>;
}

/// One source's change report, paired with what the notification needs
/// to say about where it came from.
#[derive(Debug, Clone)]
pub struct SourceReport {
    pub name: String,
    pub url: String,
    pub report: ChangeReport,
}

/// Renders change reports and dispatches them via a mail transport.
pub struct Notifier<'a> {
    transport: &'a dyn MailTransport,
    settings: &'a MailSettings,
    subject_prefix: &'a str,
}

impl<'a> Notifier<'a> {
    pub fn new(
        transport: &'a dyn MailTransport,
        settings: &'a MailSettings,
        subject_prefix: &'a str,
    ) -> Self {
        Self {
            transport,
            settings,
            subject_prefix,
        }
    }

    /// Dispatch one notification covering all noteworthy reports.
    ///
    /// No-ops (and dispatches nothing) when every report is empty or an
    /// initial baseline capture.
    pub async fn notify(&self, reports: &[SourceReport]) -> Result<()> {
        let mut noteworthy = Vec::new();
        for sr in reports {
            if sr.report.initial {
                log::info!(
                    "{}: baseline snapshot captured ({} records), not notifying",
                    sr.name,
                    sr.report.added.len()
                );
            } else if sr.report.is_empty() {
                log::debug!("{}: no changes, nothing to notify", sr.name);
            } else {
                noteworthy.push(sr);
            }
        }

        if noteworthy.is_empty() {
            log::info!("no updates to send");
            return Ok(());
        }

        let message = self.render(&noteworthy)?;
        self.transport.send(&message).await?;
        log::info!(
            "notification handed off for {} recipient(s)",
            message.to.len()
        );
        Ok(())
    }

    /// Build the outbound message for a non-empty set of reports.
    fn render(&self, reports: &[&SourceReport]) -> Result<OutboundMessage> {
        let from = self
            .settings
            .sender
            .clone()
            .ok_or_else(|| AppError::notification("EMAIL_SENDER is not set"))?;

        if self.settings.recipients.is_empty() {
            return Err(AppError::notification("EMAIL_RECEIVERS is not set"));
        }
        if !self.settings.credential_set {
            log::warn!("EMAIL_PASSWORD is not set; the mail transport may reject the handoff");
        }

        Ok(OutboundMessage {
            from,
            to: self.settings.recipients.clone(),
            subject: format!("{} - {}", self.subject_prefix, Utc::now().format("%Y-%m-%d")),
            body: render_body(reports),
        })
    }
}

/// Render the plain-text message body. Deterministic for identical reports.
pub fn render_body(reports: &[&SourceReport]) -> String {
    let mut body = String::from("Changes detected on CURIA pages:\n");

    for sr in reports {
        body.push_str(&format!("\n=== {} ===\n", sr.name));

        if !sr.report.added.is_empty() {
            body.push_str("\nAdded:\n");
            for record in &sr.report.added {
                body.push_str(&format!("  + {}\n", record_line(record)));
            }
        }

        if !sr.report.removed.is_empty() {
            body.push_str("\nRemoved:\n");
            for record in &sr.report.removed {
                body.push_str(&format!("  - {}\n", record_line(record)));
            }
        }

        if !sr.report.modified.is_empty() {
            body.push_str("\nModified:\n");
            for entry in &sr.report.modified {
                body.push_str(&format!("  * {}\n", modified_lines(entry)));
            }
        }

        body.push_str(&format!("\nCheck the website: {}\n", sr.url));
    }

    body
}

fn record_line(record: &Record) -> String {
    if record.fields.is_empty() {
        return record.id.clone();
    }
    let fields: Vec<String> = record
        .fields
        .iter()
        .map(|(name, value)| format!("{name}: {value}"))
        .collect();
    format!("{}  [{}]", record.id, fields.join("; "))
}

fn modified_lines(entry: &ModifiedRecord) -> String {
    let mut lines = vec![format!(
        "{} (changed: {})",
        entry.new.id,
        entry
            .changed_fields
            .iter()
            .cloned()
            .collect::<Vec<_>>()
            .join(", ")
    )];
    for name in &entry.changed_fields {
        lines.push(format!(
            "      {name}: \"{}\" -> \"{}\"",
            entry.old.field(name).unwrap_or(""),
            entry.new.field(name).unwrap_or("")
        ));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::diff;
    use crate::models::RecordSet;
    use std::sync::Mutex;

    /// Transport that records every handoff.
    #[derive(Default)]
    struct RecordingTransport {
        sent: Mutex<Vec<OutboundMessage>>,
    }

    #[async_trait]
    impl MailTransport for RecordingTransport {
        async fn send(&self, message: &OutboundMessage) -> Result<()> {
            self.sent.lock().unwrap().push(message.clone());
            Ok(())
        }
    }

    fn settings() -> MailSettings {
        MailSettings {
            sender: Some("watcher@example.com".to_string()),
            recipients: vec!["a@example.com".to_string(), "b@example.com".to_string()],
            credential_set: true,
        }
    }

    fn record(id: &str, status: &str) -> Record {
        Record::new(id).with_field("status", status)
    }

    fn source_report(report: ChangeReport) -> SourceReport {
        SourceReport {
            name: "Court of Justice".to_string(),
            url: "https://curia.europa.eu/en/content/juris/c2_juris.htm".to_string(),
            report,
        }
    }

    #[tokio::test]
    async fn empty_reports_dispatch_nothing() {
        let transport = RecordingTransport::default();
        let settings = settings();
        let notifier = Notifier::new(&transport, &settings, "Alert");

        let reports = vec![source_report(ChangeReport::default())];
        notifier.notify(&reports).await.unwrap();

        assert!(transport.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn initial_reports_dispatch_nothing() {
        let transport = RecordingTransport::default();
        let settings = settings();
        let notifier = Notifier::new(&transport, &settings, "Alert");

        let new = RecordSet::from_records(vec![record("C-1/20", "pending")]).unwrap();
        let reports = vec![source_report(diff(None, &new))];
        notifier.notify(&reports).await.unwrap();

        assert!(transport.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn changes_dispatch_one_message() {
        let transport = RecordingTransport::default();
        let settings = settings();
        let notifier = Notifier::new(&transport, &settings, "CURIA Website Update Alert");

        let old = RecordSet::from_records(vec![record("C-1/20", "pending")]).unwrap();
        let new = RecordSet::from_records(vec![
            record("C-1/20", "decided"),
            record("C-2/21", "lodged"),
        ])
        .unwrap();
        let reports = vec![source_report(diff(Some(&old), &new))];

        notifier.notify(&reports).await.unwrap();

        let sent = transport.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);

        let message = &sent[0];
        assert_eq!(message.from, "watcher@example.com");
        assert_eq!(message.to.len(), 2);
        assert!(message.subject.starts_with("CURIA Website Update Alert - "));
        assert!(message.body.contains("+ C-2/21"));
        assert!(message.body.contains("C-1/20 (changed: status)"));
        assert!(message.body.contains("\"pending\" -> \"decided\""));
        assert!(message.body.contains("Check the website"));
    }

    #[tokio::test]
    async fn missing_sender_is_a_notification_error() {
        let transport = RecordingTransport::default();
        let settings = MailSettings {
            sender: None,
            ..settings()
        };
        let notifier = Notifier::new(&transport, &settings, "Alert");

        let new = RecordSet::from_records(vec![record("C-1/20", "pending")]).unwrap();
        let old = RecordSet::new();
        let reports = vec![source_report(diff(Some(&old), &new))];

        let err = notifier.notify(&reports).await.unwrap_err();
        assert!(matches!(err, AppError::Notification(_)));
        assert!(transport.sent.lock().unwrap().is_empty());
    }

    #[test]
    fn render_body_is_deterministic() {
        let old = RecordSet::from_records(vec![record("C-1/20", "pending")]).unwrap();
        let new = RecordSet::from_records(vec![record("C-1/20", "decided")]).unwrap();
        let sr = source_report(diff(Some(&old), &new));

        let first = render_body(&[&sr]);
        let second = render_body(&[&sr]);
        assert_eq!(first, second);
    }

    #[test]
    fn render_body_lists_removed_records() {
        let old = RecordSet::from_records(vec![record("C-1/20", "pending")]).unwrap();
        let new = RecordSet::new();
        let sr = source_report(diff(Some(&old), &new));

        let body = render_body(&[&sr]);
        assert!(body.contains("Removed:"));
        assert!(body.contains("- C-1/20"));
    }
}
