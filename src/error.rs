//! Error types for RT REST operations.
//!
//! The [`Result`] type alias provides a shorthand for operations that may fail.
//!
//! # Error Categories
//!
//! | Category | Variants | Meaning |
//! |----------|----------|---------|
//! | Session | `Unauthenticated` | Session cookie invalid, fatal to the session |
//! | Permission | `Unauthorized` | Operation not permitted on the entity |
//! | Request | `Syntax`, `BadRequest`, `MissingAttributes` | Malformed request content |
//! | Protocol | `UnhandledResponse` | Server text matched no known pattern |
//! | Transport | `Http`, `Config` | The HTTP collaborator failed |
//!
//! Absent entities are *not* errors: lookups return `Ok(None)` so callers can
//! distinguish "operation failed" from "entity does not exist".
//!
//! No variant is retried internally. Transient-network retry is a transport
//! concern outside this crate.

use thiserror::Error;

/// Result type for RT REST operations.
pub type Result<T> = std::result::Result<T, RtError>;

/// Errors that can occur when talking to an RT server.
///
/// Variants carrying a `String` hold the raw server text that triggered them,
/// since the text body is the only diagnostic channel the protocol offers.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum RtError {
    /// The session is not authenticated.
    ///
    /// RT signals this with a `401 Credentials required` marker inside an
    /// otherwise successful-looking response. Fatal to the current session;
    /// callers must re-login.
    #[error("invalid username or password")]
    Unauthenticated,

    /// The server refused to modify the entity (`not allowed to modify`).
    #[error("not permitted: {0}")]
    Unauthorized(String),

    /// The server reported a syntax error in submitted content.
    #[error("syntax error: {0}")]
    Syntax(String),

    /// The server could not create the entity from the submitted content.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Mandatory fields were missing before a create was attempted.
    ///
    /// Raised locally, before any network round trip.
    #[error("needs attributes: {}", .missing.join(", "))]
    MissingAttributes {
        /// Names of the missing mandatory fields.
        missing: Vec<String>,
    },

    /// The server returned text matching no known response pattern.
    ///
    /// Deliberately never coerced into a success value, so protocol drift
    /// surfaces instead of being silently swallowed.
    #[error("unhandled server response: {0}")]
    UnhandledResponse(String),

    /// The HTTP transport failed (connection, timeout, non-text body).
    #[error("HTTP error: {0}")]
    Http(String),

    /// Invalid client configuration (unparseable server URL, etc.).
    #[error("configuration error: {0}")]
    Config(String),
}
