//! Ticket operations.

use crate::client::dispatch::{dispatch_write, WriteOutcome};
use crate::client::fetch::RtClient;
use crate::error::{Result, RtError};
use crate::protocol::decoder::{decode_record, KeyCase};
use crate::protocol::encoder::{compose_content, EntityKind};
use crate::protocol::history::{decode_long_history, decode_short_history};
use crate::traits::Transport;
use crate::types::{HistoryEntry, HistoryFormat, Record};

/// Fields a ticket create must carry before any network round trip.
const REQUIRED_CREATE_FIELDS: [&str; 3] = ["id", "Subject", "Queue"];

/// Options for [`RtClient::ticket_search`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchOpts {
    /// Sort order, e.g. `+id`.
    pub order_by: String,
    /// Request full records (`format=l`) instead of id/subject rows.
    pub verbose: bool,
}

impl Default for SearchOpts {
    fn default() -> Self {
        SearchOpts {
            order_by: "+id".to_string(),
            verbose: false,
        }
    }
}

/// Options for [`RtClient::ticket_history`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HistoryOpts {
    pub format: HistoryFormat,
    /// Include comment transactions, excluded by default.
    pub comments: bool,
}

impl<T: Transport> RtClient<T> {
    /// Fetch one ticket's metadata. `Ok(None)` when the ticket does not exist.
    pub async fn ticket_show(&self, id: &str) -> Result<Option<Record>> {
        let envelope = self.get_envelope(&format!("/ticket/{id}/show"), &[]).await?;
        match envelope.body {
            Some(body) => Ok(decode_record(&body, KeyCase::Preserve)),
            None => Ok(None),
        }
    }

    /// Create a ticket and return it whole.
    ///
    /// `AdminCc` cannot be set at creation (the endpoint takes one value per
    /// multi-valued field per request), so it is stripped here and applied
    /// through a follow-up update once the ticket exists.
    pub async fn ticket_create(&self, attrs: &Record) -> Result<Record> {
        let mut merged = Record::new();
        merged.insert("id", "ticket/new");
        for (key, value) in attrs.iter() {
            merged.insert(key, value.clone());
        }

        let missing: Vec<String> = REQUIRED_CREATE_FIELDS
            .into_iter()
            .filter(|field| !merged.contains_key(field))
            .map(str::to_string)
            .collect();
        if !missing.is_empty() {
            return Err(RtError::MissingAttributes { missing });
        }

        let admin_cc = merged.remove_ignore_case("AdminCc").map(|(_, value)| value);

        let content = compose_content(EntityKind::Ticket, "new", &merged);
        let body = self.post_content("/ticket/new", &content).await?;

        match dispatch_write(&body)? {
            WriteOutcome::TicketCreated(id) => {
                if let Some(value) = admin_cc {
                    let mut followup = Record::new();
                    followup.insert("AdminCc", value);
                    self.ticket_update(&id, &followup).await?;
                }
                self.ticket_show(&id).await?.ok_or_else(|| {
                    RtError::UnhandledResponse(format!("ticket {id} absent after create"))
                })
            }
            _ => Err(RtError::UnhandledResponse(body.trim().to_string())),
        }
    }

    /// Update a ticket and return its new state.
    pub async fn ticket_update(&self, id: &str, attrs: &Record) -> Result<Record> {
        let content = compose_content(EntityKind::Ticket, id, attrs);
        let body = self
            .post_content(&format!("/ticket/{id}/edit"), &content)
            .await?;

        match dispatch_write(&body)? {
            WriteOutcome::TicketUpdated(id) => {
                self.ticket_show(&id).await?.ok_or_else(|| {
                    RtError::UnhandledResponse(format!("ticket {id} absent after update"))
                })
            }
            _ => Err(RtError::UnhandledResponse(body.trim().to_string())),
        }
    }

    /// Search tickets with an RT query string.
    ///
    /// Non-verbose results carry just `id` and `Subject`; verbose results are
    /// full records. No matches is an empty vec, not an error.
    pub async fn ticket_search(&self, query: &str, opts: &SearchOpts) -> Result<Vec<Record>> {
        let format = if opts.verbose { "l" } else { "s" };
        let envelope = self
            .get_envelope(
                "/search/ticket",
                &[
                    ("query", query),
                    ("format", format),
                    ("orderby", &opts.order_by),
                ],
            )
            .await?;

        let Some(body) = envelope.body else {
            return Ok(Vec::new());
        };
        if body.starts_with("No matching results.") {
            return Ok(Vec::new());
        }

        if opts.verbose {
            Ok(body
                .split("\n--\n\n")
                .filter_map(|chunk| decode_record(chunk, KeyCase::Preserve))
                .filter(|record| !record.is_empty())
                .collect())
        } else {
            Ok(body
                .lines()
                .filter_map(|line| {
                    let (id, subject) = line.split_once(": ")?;
                    if id.is_empty() || !id.chars().all(|c| c.is_ascii_digit()) {
                        return None;
                    }
                    let mut record = Record::new();
                    record.insert("id", id);
                    record.insert("Subject", subject);
                    Some(record)
                })
                .collect())
        }
    }

    /// Fetch a ticket's transaction log.
    pub async fn ticket_history(&self, id: &str, opts: &HistoryOpts) -> Result<Vec<HistoryEntry>> {
        let envelope = self
            .get_envelope(
                &format!("/ticket/{id}/history"),
                &[("format", opts.format.query_param())],
            )
            .await?;

        let Some(body) = envelope.body else {
            return Ok(Vec::new());
        };
        Ok(match opts.format {
            HistoryFormat::Short => decode_short_history(&body, opts.comments),
            HistoryFormat::Long => decode_long_history(&body, opts.comments),
        })
    }
}
