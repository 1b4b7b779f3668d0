// src/pipeline/watch.rs

//! The watch run: fetch, extract, diff, persist, notify.

use crate::diff::diff;
use crate::error::{AppError, Result};
use crate::models::{Config, MailSettings, RecordSet, Source};
use crate::notify::{MailTransport, Notifier, SourceReport};
use crate::services::{Extractor, Fetcher};
use crate::storage::SnapshotStore;

/// Run one watch cycle over the configured sources.
///
/// `source_key` narrows the run to a single source. Sources are processed
/// sequentially.
///
/// Fetching and extraction complete for every selected source before any
/// snapshot is touched, so a network or layout failure aborts the run with
/// all prior snapshots still authoritative. A notification failure is a
/// lost alert, not lost state: it is logged and the run still succeeds.
pub async fn run_watch(
    config: &Config,
    store: &dyn SnapshotStore,
    transport: &dyn MailTransport,
    settings: &MailSettings,
    source_key: Option<&str>,
) -> Result<()> {
    let sources = select_sources(config, source_key)?;

    let fetcher = Fetcher::new(&config.http)?;
    let extractor = Extractor::new(&config.schema)?;

    // Phase 1: fetch and extract everything, no snapshot mutation yet.
    let mut extracted: Vec<(&Source, RecordSet)> = Vec::new();
    for source in sources {
        log::info!("checking {} ({})", source.name, source.url);
        let html = fetcher.fetch(&source.url).await?;
        let records = extractor.extract(&html, &source.url)?;
        log::info!("{}: extracted {} records", source.name, records.len());
        extracted.push((source, records));
    }

    // Phase 2: diff against the prior snapshot and persist the new one.
    let mut reports = Vec::new();
    for (source, records) in extracted {
        let report = sync_source(store, source, &records).await?;
        reports.push(report);
    }

    // Phase 3: notify. The snapshots are already durable, so a transport
    // failure only costs the alert.
    let notifier = Notifier::new(transport, settings, &config.mail.subject);
    if let Err(e) = notifier.notify(&reports).await {
        log::warn!("notification failed (snapshots already updated): {e}");
    }

    Ok(())
}

/// Diff one source's fresh records against its stored snapshot and persist
/// the new snapshot.
pub async fn sync_source(
    store: &dyn SnapshotStore,
    source: &Source,
    records: &RecordSet,
) -> Result<SourceReport> {
    let previous = store.load(&source.key).await?;
    let report = diff(previous.as_ref().map(|s| &s.records), records);

    if report.initial {
        log::info!(
            "{}: first run, capturing baseline of {} records",
            source.name,
            records.len()
        );
    } else if report.is_empty() {
        log::info!("{}: no changes", source.name);
    } else {
        log::info!(
            "{}: {} added, {} removed, {} modified",
            source.name,
            report.added.len(),
            report.removed.len(),
            report.modified.len()
        );
    }

    store.save(&source.key, records).await?;

    Ok(SourceReport {
        name: source.name.clone(),
        url: source.url.clone(),
        report,
    })
}

fn select_sources<'a>(config: &'a Config, source_key: Option<&str>) -> Result<Vec<&'a Source>> {
    match source_key {
        Some(key) => {
            let source = config
                .source(key)
                .ok_or_else(|| AppError::config(format!("unknown source '{key}'")))?;
            Ok(vec![source])
        }
        None => Ok(config.sources.iter().collect()),
    }
}
