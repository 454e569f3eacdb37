//! Ticket transaction-log entries.

use crate::types::record::Record;
use serde::{Deserialize, Serialize};

/// Which rendering of the transaction log to request.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum HistoryFormat {
    /// One line per transaction: id and description.
    #[default]
    Short,
    /// Full field map per transaction, including attachment listings.
    Long,
}

impl HistoryFormat {
    /// The single-letter `format` query parameter value.
    pub fn query_param(&self) -> &'static str {
        match self {
            HistoryFormat::Short => "s",
            HistoryFormat::Long => "l",
        }
    }
}

/// An attachment referenced by a long-format transaction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub id: String,
    pub name: String,
    /// Human-readable size, e.g. `"20b"`, when the server includes one.
    pub size: Option<String>,
}

/// One decoded transaction-log entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum HistoryEntry {
    /// Short-format entry: transaction id and its one-line description.
    Short { id: String, description: String },
    /// Long-format entry: the full field map (keys lowercased) plus the
    /// parsed attachment list.
    Long {
        fields: Record,
        attachments: Vec<Attachment>,
    },
}

impl HistoryEntry {
    /// The transaction id, whichever format this entry came from.
    pub fn id(&self) -> Option<&str> {
        match self {
            HistoryEntry::Short { id, .. } => Some(id),
            HistoryEntry::Long { fields, .. } => fields.get_scalar("id"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_query_param() {
        assert_eq!(HistoryFormat::Short.query_param(), "s");
        assert_eq!(HistoryFormat::Long.query_param(), "l");
    }

    #[test]
    fn test_entry_id_both_formats() {
        let short = HistoryEntry::Short {
            id: "11".to_string(),
            description: "Ticket created by dan".to_string(),
        };
        assert_eq!(short.id(), Some("11"));

        let mut fields = Record::new();
        fields.insert("id", "92");
        let long = HistoryEntry::Long {
            fields,
            attachments: vec![],
        };
        assert_eq!(long.id(), Some("92"));
    }
}
