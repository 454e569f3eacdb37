//! Response envelope splitting.
//!
//! Every RT response body starts with a fabricated status line:
//!
//! ```text
//! RT/3.8.7 200 Ok
//!
//! <body>
//! ```
//!
//! The splitter separates that line from the remainder and detects the
//! authentication-failure marker. It never touches the real HTTP status;
//! RT answers 200 regardless of outcome, so the fabricated line and the body
//! text are the only truth channel.

use crate::error::{Result, RtError};
use once_cell::sync::Lazy;
use regex::Regex;

/// `RT/<major>.<minor>.<patch> <code> <text>` at the start of a response.
static STATUS_LINE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^RT/\d+\.\d+\.\d+\s+(\d{3})\s+([^\n]*)(?:\n|$)").unwrap());

/// The marker RT emits when the session cookie is missing or stale.
const CREDENTIALS_REQUIRED: &str = "401 Credentials required";

/// A split response: fabricated status line plus optional body remainder.
///
/// Produced once per HTTP exchange and discarded after decoding. `body` is
/// `None` when the remainder was empty after trimming, because absence and "empty
/// but present" mean different things downstream ("entity has no content"
/// vs. "entity not found").
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Envelope {
    /// The fabricated status code, e.g. `200`.
    pub code: u16,
    /// The fabricated status text, e.g. `Ok`.
    pub message: String,
    /// The remainder after the status line and blank separator.
    pub body: Option<String>,
}

/// Split a raw response body into its envelope parts.
///
/// Returns [`RtError::Unauthenticated`] when the status line or the leading
/// body line carries the `401 Credentials required` marker, and
/// [`RtError::UnhandledResponse`] when no status line is present at all.
///
/// # Examples
///
/// ```
/// use rt_rest::protocol::split_envelope;
///
/// let envelope = split_envelope("RT/3.8.7 200 Ok\n\nid: ticket/1\n").unwrap();
/// assert_eq!(envelope.code, 200);
/// assert_eq!(envelope.message, "Ok");
/// assert_eq!(envelope.body.as_deref(), Some("id: ticket/1\n"));
/// ```
pub fn split_envelope(raw: &str) -> Result<Envelope> {
    let caps = STATUS_LINE_RE
        .captures(raw)
        .ok_or_else(|| RtError::UnhandledResponse(raw.trim().to_string()))?;

    let code: u16 = caps[1]
        .parse()
        .map_err(|_| RtError::UnhandledResponse(raw.trim().to_string()))?;
    let message = caps[2].trim().to_string();

    if format!("{code} {message}").contains(CREDENTIALS_REQUIRED) {
        return Err(RtError::Unauthenticated);
    }

    let remainder = raw[caps.get(0).unwrap().end()..].trim_start();
    if remainder.starts_with(CREDENTIALS_REQUIRED) {
        return Err(RtError::Unauthenticated);
    }

    let body = if remainder.is_empty() {
        None
    } else {
        Some(remainder.to_string())
    };

    Ok(Envelope {
        code,
        message,
        body,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_basic() {
        let envelope = split_envelope("RT/3.8.7 200 Ok\n\nid: ticket/1\nSubject: test\n").unwrap();
        assert_eq!(envelope.code, 200);
        assert_eq!(envelope.message, "Ok");
        assert_eq!(envelope.body.as_deref(), Some("id: ticket/1\nSubject: test\n"));
    }

    #[test]
    fn test_empty_remainder_is_absent_body() {
        let envelope = split_envelope("RT/3.8.7 200 Ok\n\n").unwrap();
        assert_eq!(envelope.body, None);

        let envelope = split_envelope("RT/3.8.7 200 Ok\n").unwrap();
        assert_eq!(envelope.body, None);
    }

    #[test]
    fn test_status_line_credentials_marker() {
        let err = split_envelope("RT/3.8.7 401 Credentials required\n").unwrap_err();
        assert!(matches!(err, RtError::Unauthenticated));
    }

    #[test]
    fn test_body_credentials_marker() {
        let err = split_envelope("RT/3.8.7 200 Ok\n\n401 Credentials required\n").unwrap_err();
        assert!(matches!(err, RtError::Unauthenticated));
    }

    #[test]
    fn test_missing_status_line() {
        let err = split_envelope("<html>login page</html>").unwrap_err();
        assert!(matches!(err, RtError::UnhandledResponse(_)));
    }

    #[test]
    fn test_comment_body_preserved() {
        let envelope = split_envelope("RT/3.8.7 200 Ok\n\n# Ticket 5 does not exist.\n").unwrap();
        assert_eq!(envelope.body.as_deref(), Some("# Ticket 5 does not exist.\n"));
    }
}
