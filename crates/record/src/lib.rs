//! Pipeline records and the downstream command seam.
//!
//! A [`Record`] is the unit of data flowing through the pipeline: an ordered
//! multimap of named values. Commands read the record they are given, build
//! fresh output records, and hand them to the next stage through the
//! [`Command`] trait. The pipeline itself (wiring, retry, timeouts) lives
//! outside this workspace; only the seam is defined here.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Well-known record field names shared across pipeline commands.
pub mod fields {
    /// Primary identifier of a record.
    pub const ID: &str = "id";
    /// Byte payload attached to a record, e.g. an XML document body.
    pub const ATTACHMENT_BODY: &str = "_attachment_body";
    /// MIME type of the attached payload.
    pub const ATTACHMENT_MIME_TYPE: &str = "_attachment_mimetype";
}

/// An ordered multimap of named values flowing through the pipeline.
///
/// `put` appends, preserving earlier values of the same field; `replace`
/// overwrites. Readers never observe an input record being mutated: commands
/// emit new records downstream instead.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    fields: BTreeMap<String, Vec<Value>>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a value to a field, keeping existing values.
    pub fn put(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.fields
            .entry(name.into())
            .or_default()
            .push(value.into());
    }

    /// Replaces all values of a field with a single value.
    pub fn replace(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(name.into(), vec![value.into()]);
    }

    /// The first value of a field, if any.
    pub fn first(&self, name: &str) -> Option<&Value> {
        self.fields.get(name).and_then(|values| values.first())
    }

    /// All values of a field, empty for an absent field.
    pub fn get(&self, name: &str) -> &[Value] {
        self.fields
            .get(name)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn remove(&mut self, name: &str) -> Option<Vec<Value>> {
        self.fields.remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterates fields in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Value])> {
        self.fields
            .iter()
            .map(|(name, values)| (name.as_str(), values.as_slice()))
    }
}

/// A pipeline stage that consumes records.
///
/// Returning `false` tells the caller to halt the pipeline after the current
/// record.
pub trait Command: Send {
    fn process(&mut self, record: Record) -> bool;
}

// Blanket implementation for Box<dyn Command>
impl Command for Box<dyn Command> {
    fn process(&mut self, record: Record) -> bool {
        (**self).process(record)
    }
}

/// A stage that stores every record it receives. Useful as a pipeline tail
/// and in tests.
#[derive(Debug, Default)]
pub struct Collector {
    records: Vec<Record>,
}

impl Collector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn into_records(self) -> Vec<Record> {
        self.records
    }
}

impl Command for Collector {
    fn process(&mut self, record: Record) -> bool {
        self.records.push(record);
        true
    }
}
