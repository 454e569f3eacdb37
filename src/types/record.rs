//! Decoded field maps.
//!
//! A [`Record`] is the decoded form of one ticket, user, or queue: an ordered
//! mapping from field name to value. Order matters on the wire (the server
//! expects `id` first in submitted content), so the map preserves insertion
//! order rather than sorting keys.
//!
//! Records are value objects: constructed fresh per response, never mutated
//! by the adapter after construction, and owned solely by the caller.
//!
//! # Examples
//!
//! ```
//! use rt_rest::types::Record;
//!
//! let mut ticket = Record::new();
//! ticket.insert("Subject", "printer on fire");
//! ticket.insert("Requestors", vec!["a@example.org".to_string(), "b@example.org".to_string()]);
//!
//! assert_eq!(ticket.get_scalar("Subject"), Some("printer on fire"));
//! assert_eq!(ticket.get_list("Requestors").map(<[String]>::len), Some(2));
//! ```

use serde::{Deserialize, Serialize};

/// A single field value: a scalar string, or an ordered list of strings for
/// the known multi-valued fields (`Requestors`, `Cc`, `AdminCc`).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// A plain string value.
    Scalar(String),
    /// An ordered list of values.
    List(Vec<String>),
}

impl FieldValue {
    /// The scalar value, if this is a scalar.
    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            FieldValue::Scalar(s) => Some(s),
            FieldValue::List(_) => None,
        }
    }

    /// The list of values, if this is a list.
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            FieldValue::Scalar(_) => None,
            FieldValue::List(items) => Some(items),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Scalar(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Scalar(value)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(value: Vec<String>) -> Self {
        FieldValue::List(value)
    }
}

/// An ordered field map for one ticket, user, or queue.
///
/// Field names keep the case the server returned (user records are the
/// exception: their decode path lowercases keys). Inserting an existing key
/// replaces the value in place, keeping the key's original position.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    fields: Vec<(String, FieldValue)>,
}

impl Record {
    /// Create an empty record.
    pub fn new() -> Self {
        Record { fields: Vec::new() }
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the record has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Insert a field, replacing the value in place if the key exists.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<FieldValue>) {
        let key = key.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some((_, v)) => *v = value,
            None => self.fields.push((key, value)),
        }
    }

    /// Look up a field by exact key.
    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.fields.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Look up a scalar field by exact key.
    pub fn get_scalar(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(FieldValue::as_scalar)
    }

    /// Look up a list field by exact key.
    pub fn get_list(&self, key: &str) -> Option<&[String]> {
        self.get(key).and_then(FieldValue::as_list)
    }

    /// Whether a field with this exact key exists.
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Remove a field by exact key, returning its value.
    pub fn remove(&mut self, key: &str) -> Option<FieldValue> {
        let idx = self.fields.iter().position(|(k, _)| k == key)?;
        Some(self.fields.remove(idx).1)
    }

    /// Remove a field matching the key case-insensitively, returning it.
    ///
    /// RT tolerates caller-supplied key casing (`admincc` vs `AdminCc`), so
    /// fields that need special handling are matched the same way.
    pub fn remove_ignore_case(&mut self, key: &str) -> Option<(String, FieldValue)> {
        let idx = self
            .fields
            .iter()
            .position(|(k, _)| k.eq_ignore_ascii_case(key))?;
        Some(self.fields.remove(idx))
    }

    /// Replace a field's value, keeping its position. No-op if absent.
    pub(crate) fn replace_value(&mut self, key: &str, value: FieldValue) {
        if let Some((_, v)) = self.fields.iter_mut().find(|(k, _)| k == key) {
            *v = value;
        }
    }

    /// Iterate fields in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// The normalized `id` field, when present as a scalar.
    pub fn id(&self) -> Option<&str> {
        self.get_scalar("id")
    }
}

impl FromIterator<(String, FieldValue)> for Record {
    fn from_iter<I: IntoIterator<Item = (String, FieldValue)>>(iter: I) -> Self {
        let mut record = Record::new();
        for (k, v) in iter {
            record.insert(k, v);
        }
        record
    }
}
