// src/diff.rs

//! Diff engine.
//!
//! Compares the freshly extracted record set against the previous snapshot
//! and produces a [`ChangeReport`]. Pure, no I/O; both inputs are borrowed
//! and never mutated. Records are keyed by id, so reordering on the page
//! never registers as a change.

use std::collections::BTreeSet;

use crate::models::{ChangeReport, ModifiedRecord, Record, RecordSet};

/// Compute the change report between the previous and current record sets.
///
/// `old = None` means first run for this source: everything in `new` is
/// reported as added and the report is flagged `initial` so the notifier
/// can treat it as baseline capture rather than news.
///
/// All output collections come out sorted ascending by id.
pub fn diff(old: Option<&RecordSet>, new: &RecordSet) -> ChangeReport {
    let Some(old) = old else {
        return ChangeReport {
            added: new.iter().cloned().collect(),
            removed: Vec::new(),
            modified: Vec::new(),
            initial: true,
        };
    };

    let mut added = Vec::new();
    let mut modified = Vec::new();

    for record in new.iter() {
        match old.get(&record.id) {
            None => added.push(record.clone()),
            Some(prev) => {
                let changed = changed_fields(prev, record);
                if !changed.is_empty() {
                    modified.push(ModifiedRecord {
                        old: prev.clone(),
                        new: record.clone(),
                        changed_fields: changed,
                    });
                }
            }
        }
    }

    let removed = old
        .iter()
        .filter(|r| !new.contains(&r.id))
        .cloned()
        .collect();

    ChangeReport {
        added,
        removed,
        modified,
        initial: false,
    }
}

/// Names of fields whose values differ between two records, including
/// fields present on only one side.
fn changed_fields(old: &Record, new: &Record) -> BTreeSet<String> {
    old.fields
        .keys()
        .chain(new.fields.keys())
        .filter(|name| old.fields.get(*name) != new.fields.get(*name))
        .cloned()
        .collect()
}
