//! Write-response dispatch.
//!
//! Every write endpoint answers with a leading `# <message>` line. Outcome
//! classification is a small state machine over those patterns; the
//! fall-through is always an error, never a success: an unrecognized
//! response must surface rather than mask protocol drift.

use crate::error::{Result, RtError};
use once_cell::sync::Lazy;
use regex::Regex;

static TICKET_CREATED_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^# Ticket (\d+) created").unwrap());
static TICKET_UPDATED_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^# Ticket (\d+) updated").unwrap());
static LINKS_UPDATED_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^# Links for ticket (\d+) updated").unwrap());
static USER_CREATED_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^# User (.+) created").unwrap());
static USER_UPDATED_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^# User (.+) updated").unwrap());
static UNAUTHORIZED_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^# You are not allowed to modify").unwrap());
static SYNTAX_ERROR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^# Syntax error").unwrap());
static COULD_NOT_CREATE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^# Could not create").unwrap());

/// A successfully classified write response.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum WriteOutcome {
    TicketCreated(String),
    TicketUpdated(String),
    LinksUpdated(String),
    UserCreated(String),
    UserUpdated(String),
}

/// Classify the body of a write response.
pub(crate) fn dispatch_write(body: &str) -> Result<WriteOutcome> {
    if let Some(caps) = TICKET_CREATED_RE.captures(body) {
        return Ok(WriteOutcome::TicketCreated(caps[1].to_string()));
    }
    if let Some(caps) = TICKET_UPDATED_RE.captures(body) {
        return Ok(WriteOutcome::TicketUpdated(caps[1].to_string()));
    }
    if let Some(caps) = LINKS_UPDATED_RE.captures(body) {
        return Ok(WriteOutcome::LinksUpdated(caps[1].to_string()));
    }
    if let Some(caps) = USER_CREATED_RE.captures(body) {
        return Ok(WriteOutcome::UserCreated(caps[1].to_string()));
    }
    if let Some(caps) = USER_UPDATED_RE.captures(body) {
        return Ok(WriteOutcome::UserUpdated(caps[1].to_string()));
    }
    if UNAUTHORIZED_RE.is_match(body) {
        return Err(RtError::Unauthorized(body.trim().to_string()));
    }
    if SYNTAX_ERROR_RE.is_match(body) {
        return Err(RtError::Syntax(body.trim().to_string()));
    }
    if COULD_NOT_CREATE_RE.is_match(body) {
        return Err(RtError::BadRequest(body.trim().to_string()));
    }
    Err(RtError::UnhandledResponse(body.trim().to_string()))
}
