//! Transaction-log decoding.
//!
//! The history endpoint has two renderings. Short format is one line per
//! transaction:
//!
//! ```text
//! 11: Ticket created by dan
//! 12: Comments added by dan
//! ```
//!
//! Long format is a sequence of record-shaped items separated by `--` lines,
//! each with an `Attachments` sub-listing that needs its own parse. In both
//! formats, comment transactions are filtered out unless explicitly
//! requested.

use crate::protocol::decoder::{decode_record, KeyCase};
use crate::types::{Attachment, HistoryEntry};
use once_cell::sync::Lazy;
use regex::Regex;

/// `<id>: <description>`, one short-format transaction.
static SHORT_ENTRY_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d+): (.*)$").unwrap());

/// `<id>: <name>`, one attachment listing line.
static ATTACHMENT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d+):\s*(.*)$").unwrap());

/// `<name> (<size>)`, an attachment name with trailing size.
static NAME_SIZE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(.*?)\s*\((.*?)\)").unwrap());

/// Decode a short-format history body.
///
/// Lines not shaped like transactions are skipped. Comment transactions are
/// recognizable only by their description prefix in this format.
pub fn decode_short_history(body: &str, comments: bool) -> Vec<HistoryEntry> {
    body.lines()
        .filter_map(|line| {
            let caps = SHORT_ENTRY_RE.captures(line)?;
            let description = caps[2].to_string();
            if !comments && description.starts_with("Comments") {
                return None;
            }
            Some(HistoryEntry::Short {
                id: caps[1].to_string(),
                description,
            })
        })
        .collect()
}

/// Decode a long-format history body.
///
/// Items split on `--` separator lines; each item decodes like a record with
/// lowercased keys. The `attachments` field is re-parsed into structured
/// entries, one per listing line.
pub fn decode_long_history(body: &str, comments: bool) -> Vec<HistoryEntry> {
    body.split("\n--\n")
        .filter_map(|item| {
            let mut fields = decode_record(item, KeyCase::Lower)?;
            if fields.is_empty() {
                return None;
            }
            if !comments {
                let is_comment = fields
                    .get_scalar("type")
                    .is_some_and(|t| t.contains("Comment"));
                if is_comment {
                    return None;
                }
            }

            let attachments = fields
                .remove("attachments")
                .and_then(|value| value.as_scalar().map(parse_attachments))
                .unwrap_or_default();

            Some(HistoryEntry::Long {
                fields,
                attachments,
            })
        })
        .collect()
}

fn parse_attachments(listing: &str) -> Vec<Attachment> {
    listing
        .lines()
        .filter_map(|line| {
            let caps = ATTACHMENT_RE.captures(line.trim())?;
            let id = caps[1].to_string();
            let rest = caps[2].to_string();
            match NAME_SIZE_RE.captures(&rest) {
                Some(ns) => Some(Attachment {
                    id,
                    name: ns[1].to_string(),
                    size: Some(ns[2].to_string()),
                }),
                None => Some(Attachment {
                    id,
                    name: rest,
                    size: None,
                }),
            }
        })
        .collect()
}
