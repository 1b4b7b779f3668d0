//! Record and RecordSet data structures.
//!
//! A [`Record`] is one trackable unit of content on a monitored page (a
//! case entry). A [`RecordSet`] is the unique-by-id collection extracted
//! from one fetch; the unique-id invariant is enforced at construction.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// One trackable content item, identified by a stable natural key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Stable identifier taken from page content (e.g. an official case number)
    pub id: String,

    /// Named field values; BTreeMap keeps serialization key-sorted
    #[serde(default)]
    pub fields: BTreeMap<String, String>,
}

impl Record {
    /// Create a record with no fields.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Builder-style field assignment.
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Look up a field value.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }
}

/// Unordered set of records keyed by id. No two records share an id.
///
/// Serializes as a flat, id-sorted array of records so persisted
/// snapshots stay human-diffable; deserialization re-checks uniqueness.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<Record>", into = "Vec<Record>")]
pub struct RecordSet {
    records: BTreeMap<String, Record>,
}

impl RecordSet {
    /// Create an empty record set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a record set, rejecting duplicate ids.
    pub fn from_records(records: impl IntoIterator<Item = Record>) -> Result<Self> {
        let mut set = Self::new();
        for record in records {
            set.insert(record)?;
        }
        Ok(set)
    }

    /// Insert a record. Fails if a record with the same id is present.
    pub fn insert(&mut self, record: Record) -> Result<()> {
        if record.id.is_empty() {
            return Err(AppError::validation("record id must not be empty"));
        }
        if self.records.contains_key(&record.id) {
            return Err(AppError::validation(format!(
                "duplicate record id '{}'",
                record.id
            )));
        }
        self.records.insert(record.id.clone(), record);
        Ok(())
    }

    /// Look up a record by id.
    pub fn get(&self, id: &str) -> Option<&Record> {
        self.records.get(id)
    }

    /// Whether a record with this id is present.
    pub fn contains(&self, id: &str) -> bool {
        self.records.contains_key(id)
    }

    /// Iterate records in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = &Record> {
        self.records.values()
    }

    /// Iterate ids in ascending order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.records.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl TryFrom<Vec<Record>> for RecordSet {
    type Error = AppError;

    fn try_from(records: Vec<Record>) -> Result<Self> {
        Self::from_records(records)
    }
}

impl From<RecordSet> for Vec<Record> {
    fn from(set: RecordSet) -> Self {
        set.records.into_values().collect()
    }
}
