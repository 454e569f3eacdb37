//! Abstraction over the HTTP transport.
//!
//! The adapter never talks HTTP directly: every operation goes through the
//! [`Transport`] trait, which hides connection setup, the session cookie, and
//! TLS. Correctness signals live entirely in the returned text bodies, so the
//! trait deals in raw strings and never exposes HTTP status codes.

use crate::error::Result;
use async_trait::async_trait;

/// Abstraction for the HTTP collaborator.
///
/// Implementations must persist the session cookie established by [`login`]
/// across subsequent calls, and resolve `path` against the server's
/// `REST/1.0` base. The production implementation is
/// [`ReqwestTransport`](crate::client::ReqwestTransport); tests substitute an
/// in-memory fake.
///
/// [`login`]: Transport::login
#[async_trait]
pub trait Transport: Send + Sync {
    /// Perform a GET against the REST base and return the raw response body.
    async fn get(&self, path: &str, query: &[(&str, &str)]) -> Result<String>;

    /// POST a form against the REST base and return the raw response body.
    async fn post(&self, path: &str, form: &[(&str, &str)]) -> Result<String>;

    /// Submit the login form at the server root to establish the session
    /// cookie.
    ///
    /// RT has no real authentication endpoint: the only way in is the same
    /// HTML form humans fill out, and the server answers 200 whether or not
    /// the credentials were good. Success is only observable later, when a
    /// request comes back without the `401 Credentials required` marker.
    async fn login(&self, username: &str, password: &str) -> Result<()>;
}
