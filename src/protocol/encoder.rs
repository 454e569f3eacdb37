//! Record-to-content encoding.
//!
//! Write endpoints accept a `content` form field holding `Key: value` lines.
//! The encoder is the inverse of the decoder's structural parse: list values
//! join with `", "`, embedded newlines become continuation lines, and keys
//! get the capitalization the server expects.

use crate::types::{FieldValue, Record};

/// The kind of entity a content blob addresses.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntityKind {
    Ticket,
    User,
    Queue,
}

impl EntityKind {
    /// The path segment and `id` prefix for this entity kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Ticket => "ticket",
            EntityKind::User => "user",
            EntityKind::Queue => "queue",
        }
    }
}

/// Normalize a caller-supplied field name for submission.
///
/// Callers arrive with both human-style (`subject`) and API-style
/// (`Subject`, `CF.{Site}`) keys. A key starting with a lowercase ASCII
/// letter gets its first letter capitalized; anything else passes through.
/// The literal key `id` is exempt; the server wants it lowercase.
///
/// # Examples
///
/// ```
/// use rt_rest::protocol::normalize_key;
///
/// assert_eq!(normalize_key("subject"), "Subject");
/// assert_eq!(normalize_key("Subject"), "Subject");
/// assert_eq!(normalize_key("CF.{Site}"), "CF.{Site}");
/// assert_eq!(normalize_key("id"), "id");
/// ```
pub fn normalize_key(key: &str) -> String {
    if key == "id" {
        return key.to_string();
    }
    match key.chars().next() {
        Some(first) if first.is_ascii_lowercase() => {
            let mut out = String::with_capacity(key.len());
            out.push(first.to_ascii_uppercase());
            out.push_str(&key[first.len_utf8()..]);
            out
        }
        _ => key.to_string(),
    }
}

fn encode_value(value: &FieldValue) -> String {
    match value {
        // Continuation lines need a leading space or the server treats the
        // next line as a new field.
        FieldValue::Scalar(s) => s.replace('\n', "\n "),
        FieldValue::List(items) => items.join(", "),
    }
}

/// Serialize a field map into the content blob the server accepts.
///
/// A synthetic `id` of shape `<entity>/<id>` is inserted first; a
/// caller-supplied `id` overrides the value but keeps that first position.
/// Output lines follow map insertion order. No field validation happens
/// here; callers check mandatory fields before composing.
pub fn compose_content(entity: EntityKind, id: &str, attrs: &Record) -> String {
    let mut merged = Record::new();
    merged.insert("id", format!("{}/{}", entity.as_str(), id));
    for (key, value) in attrs.iter() {
        merged.insert(key, value.clone());
    }

    merged
        .iter()
        .map(|(key, value)| format!("{}: {}", normalize_key(key), encode_value(value)))
        .collect::<Vec<_>>()
        .join("\n")
}
