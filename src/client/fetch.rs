//! The RT client.
//!
//! [`RtClient`] wraps a [`Transport`] and drives the wire-format adapter:
//! every public operation is one or more strictly sequential round trips,
//! each response split through the envelope parser before decoding. The
//! client holds no state of its own: the session cookie lives in the
//! transport, and every decoded entity is owned by the caller.

use crate::client::config::ClientConfig;
use crate::client::network::ReqwestTransport;
use crate::error::{Result, RtError};
use crate::protocol::envelope::{split_envelope, Envelope};
use crate::traits::Transport;
use std::sync::Arc;

/// Client for an RT server's REST 1.0 interface.
///
/// Generic over its transport so tests can substitute an in-memory fake;
/// production code uses [`RtClient::connect`], which wires up
/// [`ReqwestTransport`] and performs the login handshake.
#[derive(Clone)]
pub struct RtClient<T: Transport> {
    transport: Arc<T>,
}

impl RtClient<ReqwestTransport> {
    /// Log in and verify the session.
    ///
    /// RT never reports login failure directly; the probe request is what
    /// detects bad credentials, surfaced as [`RtError::Unauthenticated`].
    pub async fn connect(config: ClientConfig) -> Result<Self> {
        let transport = ReqwestTransport::new(&config)?;
        transport.login(&config.username, &config.password).await?;

        let client = RtClient::with_transport(transport);
        if !client.authenticated().await? {
            return Err(RtError::Unauthenticated);
        }
        Ok(client)
    }
}

impl<T: Transport> RtClient<T> {
    /// Wrap an existing transport. No login is performed.
    pub fn with_transport(transport: T) -> Self {
        RtClient {
            transport: Arc::new(transport),
        }
    }

    /// The underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Whether the current session is authenticated.
    ///
    /// Probes a ticket fetch and maps the `401 Credentials required` marker
    /// to `Ok(false)`. An unauthenticated session is an answer here, not a
    /// failure.
    pub async fn authenticated(&self) -> Result<bool> {
        match self.ticket_show("1").await {
            Ok(_) => Ok(true),
            Err(RtError::Unauthenticated) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// GET and split the response envelope.
    pub(crate) async fn get_envelope(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<Envelope> {
        tracing::debug!(path, "GET");
        let raw = self.transport.get(path, query).await?;
        split_envelope(&raw)
    }

    /// POST a content blob and return the response body.
    ///
    /// Write responses always carry a `# <message>` body; an empty one is
    /// unclassifiable and reported as such.
    pub(crate) async fn post_content(&self, path: &str, content: &str) -> Result<String> {
        tracing::debug!(path, "POST");
        let raw = self.transport.post(path, &[("content", content)]).await?;
        let envelope = split_envelope(&raw)?;
        envelope
            .body
            .ok_or_else(|| RtError::UnhandledResponse("empty write response".to_string()))
    }
}
