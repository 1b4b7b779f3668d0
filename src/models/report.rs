//! Change report produced by the diff engine.

use std::collections::BTreeSet;

use crate::models::Record;

/// A record present in both snapshots whose field values differ.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModifiedRecord {
    pub old: Record,
    pub new: Record,
    /// Names of the fields whose values differ
    pub changed_fields: BTreeSet<String>,
}

/// Structured result of comparing two record sets. Transient, never persisted.
///
/// All three collections are sorted ascending by id, so identical inputs
/// produce byte-identical notification text.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChangeReport {
    /// Records whose id is absent from the old set
    pub added: Vec<Record>,

    /// Records whose id is absent from the new set
    pub removed: Vec<Record>,

    /// Records present in both sets with differing field values
    pub modified: Vec<ModifiedRecord>,

    /// True when there was no prior snapshot: `added` is the whole initial
    /// population, which the notifier treats as baseline, not news
    pub initial: bool,
}

impl ChangeReport {
    /// True iff added, removed, and modified are all empty.
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.modified.is_empty()
    }

    /// Total number of changed records.
    pub fn change_count(&self) -> usize {
        self.added.len() + self.removed.len() + self.modified.len()
    }
}
