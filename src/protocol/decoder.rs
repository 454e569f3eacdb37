//! Body-to-record decoding.
//!
//! RT's record bodies are almost RFC2822, but not quite: custom-field names
//! may contain spaces, address lists arrive folded across indented
//! continuation lines with stray blank lines in between, and the `id` field
//! carries a `type/number` prefix. Naive header parsing mis-reads all of
//! these, so decoding runs a pipeline of repair passes before the structural
//! parse:
//!
//! 1. [`underscore_custom_fields`]: `CF.{Has Space}` becomes `CF.{Has_Space}`
//! 2. [`collapse_blank_lines`]: blank-line runs become single newlines
//! 3. [`flatten_address_lists`]: folded `Requestors`/`Cc`/`AdminCc` blocks
//!    become one comma-space-separated line
//! 4. structural parse: `Name: value` lines with folded continuations
//! 5. post-passes: address fields split into lists and `id` stripped to the
//!    bare identifier
//!
//! Each stage is a pure, total function: every input terminates, pathological
//! or not.

use crate::types::{FieldValue, Record};
use once_cell::sync::Lazy;
use regex::Regex;

/// Fields whose values are comma-separated address lists.
pub(crate) const ADDRESS_FIELDS: [&str; 3] = ["Requestors", "Cc", "AdminCc"];

/// A custom-field name still containing a whitespace run.
static CF_SPACE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"CF\.\{([\w_ ]*)( +)([\w ]*)\}").unwrap());

/// A run of blank (or whitespace-only) lines.
static BLANK_RUN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n(?:[ \t]*\n)+").unwrap());

/// The server's "entity absent" marker, e.g. `# Ticket 5 does not exist.`
static NOT_FOUND_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^# .*does not exist\.").unwrap());

/// How to treat field-name casing during the structural parse.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum KeyCase {
    /// Keep names exactly as the server returned them (tickets, queues).
    #[default]
    Preserve,
    /// Lowercase names (user records).
    Lower,
}

/// Collapse whitespace runs inside `CF.{...}` names to single underscores.
///
/// One pass collapses one run per name; a name with several fragments needs
/// several passes, so the pass repeats until no run remains. Each pass
/// strictly reduces the whitespace inside braces, which bounds the loop.
///
/// # Examples
///
/// ```
/// use rt_rest::protocol::underscore_custom_fields;
///
/// assert_eq!(underscore_custom_fields("CF.{Has Space}: x"), "CF.{Has_Space}: x");
/// assert_eq!(underscore_custom_fields("CF.{A B C}: x"), "CF.{A_B_C}: x");
/// ```
pub fn underscore_custom_fields(input: &str) -> String {
    let mut text = input.to_string();
    while CF_SPACE_RE.is_match(&text) {
        text = CF_SPACE_RE
            .replace_all(&text, "CF.{${1}_${3}}")
            .into_owned();
    }
    text
}

/// Collapse runs of blank lines into single newlines.
///
/// Downstream header-style parsing would otherwise read a blank line as a
/// message boundary and stop early. Trailing horizontal whitespace on blank
/// lines is consumed; indentation of following continuation lines is not.
pub(crate) fn collapse_blank_lines(input: &str) -> String {
    BLANK_RUN_RE.replace_all(input, "\n").into_owned()
}

/// Join folded address-list fields into single comma-space-separated lines.
///
/// The server sometimes folds `Requestors`, `Cc`, and `AdminCc` across
/// several indented continuation lines with trailing commas in arbitrary
/// places. Every such block (folded or not) is rewritten as
/// `Field: a, b, c` so the structural parse sees one well-formed line.
pub(crate) fn flatten_address_lists(input: &str) -> String {
    let mut out: Vec<String> = Vec::new();
    let mut lines = input.lines().peekable();

    while let Some(line) = lines.next() {
        let field = ADDRESS_FIELDS
            .iter()
            .find(|f| line.len() > f.len() && line.starts_with(*f) && line[f.len()..].starts_with(':'));
        let Some(field) = field else {
            out.push(line.to_string());
            continue;
        };

        let mut raw = line[field.len() + 1..].trim().to_string();
        while let Some(next) = lines.peek() {
            if next.starts_with(' ') || next.starts_with('\t') {
                raw.push(' ');
                raw.push_str(next.trim());
                lines.next();
            } else {
                break;
            }
        }

        let joined = raw
            .split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .collect::<Vec<_>>()
            .join(", ");
        out.push(format!("{field}: {joined}"));
    }

    let mut text = out.join("\n");
    if input.ends_with('\n') {
        text.push('\n');
    }
    text
}

/// Structural parse: `Name: value` lines with RFC2822-style folding.
///
/// A line beginning with whitespace continues the previous value. The
/// continuation is rejoined with a newline after stripping the single
/// leading space the encoder adds, so multi-line scalars survive an
/// encode→decode round trip. Comment lines (`#`) and stray colon-free lines
/// carry no field data and are skipped.
fn parse_fields(input: &str, key_case: KeyCase) -> Record {
    let mut record = Record::new();
    let mut current: Option<(String, String)> = None;

    let mut flush = |entry: &mut Option<(String, String)>, record: &mut Record| {
        if let Some((key, value)) = entry.take() {
            record.insert(key, value);
        }
    };

    for line in input.lines() {
        if line.starts_with(' ') || line.starts_with('\t') {
            if let Some((_, value)) = current.as_mut() {
                value.push('\n');
                value.push_str(&line[1..]);
            }
            continue;
        }

        if line.trim().is_empty() {
            continue;
        }

        if line.starts_with('#') {
            tracing::debug!(line, "skipping comment line in record body");
            continue;
        }

        match line.split_once(':') {
            Some((name, value)) => {
                flush(&mut current, &mut record);
                let name = match key_case {
                    KeyCase::Preserve => name.trim().to_string(),
                    KeyCase::Lower => name.trim().to_lowercase(),
                };
                current = Some((name, value.trim_start().to_string()));
            }
            None => {
                tracing::debug!(line, "skipping line without field separator");
            }
        }
    }
    flush(&mut current, &mut record);

    record
}

/// Split the known multi-valued fields into ordered lists.
fn split_address_lists(record: &mut Record) {
    for field in ADDRESS_FIELDS {
        if let Some(value) = record.get_scalar(field) {
            let items: Vec<String> = value
                .split(',')
                .map(str::trim)
                .filter(|entry| !entry.is_empty())
                .map(str::to_string)
                .collect();
            record.replace_value(field, FieldValue::List(items));
        }
    }
}

/// Rewrite `id: type/number` to the bare trailing identifier.
fn normalize_id(record: &mut Record) {
    let Some(id) = record.get_scalar("id") else {
        return;
    };
    if let Some((_, bare)) = id.rsplit_once('/') {
        let bare = bare.to_string();
        record.replace_value("id", FieldValue::Scalar(bare));
    }
}

/// Decode a status-line-free body into a record.
///
/// Returns `None` when the body is the server's "entity does not exist"
/// marker. Decoding never fails otherwise: unknown constructs are skipped,
/// not errors.
///
/// # Examples
///
/// ```
/// use rt_rest::protocol::{decode_record, KeyCase};
///
/// let record = decode_record("id: ticket/1\nSubject: test\n", KeyCase::Preserve).unwrap();
/// assert_eq!(record.get_scalar("id"), Some("1"));
/// assert_eq!(record.get_scalar("Subject"), Some("test"));
///
/// assert!(decode_record("# Ticket 5 does not exist.\n", KeyCase::Preserve).is_none());
/// ```
pub fn decode_record(body: &str, key_case: KeyCase) -> Option<Record> {
    if NOT_FOUND_RE.is_match(body) {
        return None;
    }

    let repaired = underscore_custom_fields(body);
    let repaired = collapse_blank_lines(&repaired);
    let repaired = flatten_address_lists(&repaired);

    let mut record = parse_fields(&repaired, key_case);
    split_address_lists(&mut record);
    normalize_id(&mut record);
    Some(record)
}
