//! Client adapter for Request Tracker's REST 1.0 interface.
//!
//! RT's "REST" interface is an ad-hoc hybrid: HTTP POST/GET carrying a
//! fabricated status line followed by a loosely RFC2822-shaped text body,
//! with enough quirks (custom-field names containing spaces, folded
//! multi-line values, comma-wrapped address lists, one-value-per-request
//! multi-valued fields) that naive parsing is unsafe. This crate is the
//! wire-format adapter over that protocol:
//!
//! - [`protocol::split_envelope`] separates the fabricated status line from
//!   the body and detects authentication failure;
//! - [`protocol::decode_record`] repairs and parses record bodies into
//!   ordered field maps;
//! - [`protocol::compose_content`] serializes field maps back into the exact
//!   text the server accepts;
//! - [`client::RtClient`] drives the entity operations, including the link
//!   reconciler that converges multi-valued relations through bounded
//!   sequences of single-valued writes.
//!
//! HTTP itself (cookies, TLS, timeouts) stays behind the [`Transport`]
//! trait; the adapter reads and writes nothing but text bodies.
//!
//! # Example
//!
//! ```no_run
//! use rt_rest::{ClientConfig, RtClient};
//!
//! # async fn demo() -> rt_rest::Result<()> {
//! let client = RtClient::connect(ClientConfig::new(
//!     "http://rt.example.org",
//!     "admin",
//!     "password",
//! ))
//! .await?;
//!
//! if let Some(ticket) = client.ticket_show("1").await? {
//!     println!("{:?}", ticket.get_scalar("Subject"));
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod error;
pub mod protocol;
pub mod traits;
pub mod types;

pub use client::{ClientConfig, HistoryOpts, RelationMap, ReqwestTransport, RtClient, SearchOpts};
pub use error::{Result, RtError};
pub use traits::Transport;
pub use types::{
    Attachment, FieldValue, HistoryEntry, HistoryFormat, LinkSet, Record, RelationType,
};
