//! User operations.
//!
//! User ids can be numeric (`28`) or textual (`john`). User records decode
//! with lowercased keys.

use crate::client::dispatch::{dispatch_write, WriteOutcome};
use crate::client::fetch::RtClient;
use crate::error::{Result, RtError};
use crate::protocol::decoder::{decode_record, KeyCase};
use crate::protocol::encoder::{compose_content, EntityKind};
use crate::traits::Transport;
use crate::types::Record;

impl<T: Transport> RtClient<T> {
    /// Fetch one user. `Ok(None)` when no such user exists.
    pub async fn user_show(&self, id: &str) -> Result<Option<Record>> {
        let envelope = self.get_envelope(&format!("/user/{id}"), &[]).await?;
        let Some(body) = envelope.body else {
            return Ok(None);
        };
        if body.contains("No user named") {
            return Ok(None);
        }
        Ok(decode_record(&body, KeyCase::Lower))
    }

    /// Create a user and return it whole.
    pub async fn user_create(&self, attrs: &Record) -> Result<Record> {
        let content = compose_content(EntityKind::User, "new", attrs);
        let body = self.post_content("/user/new", &content).await?;

        match dispatch_write(&body)? {
            WriteOutcome::UserCreated(id) => self.user_show(&id).await?.ok_or_else(|| {
                RtError::UnhandledResponse(format!("user {id} absent after create"))
            }),
            _ => Err(RtError::UnhandledResponse(body.trim().to_string())),
        }
    }

    /// Update a user and return their new state.
    pub async fn user_update(&self, id: &str, attrs: &Record) -> Result<Record> {
        let content = compose_content(EntityKind::User, id, attrs);
        let body = self
            .post_content(&format!("/user/{id}/edit"), &content)
            .await?;

        match dispatch_write(&body)? {
            WriteOutcome::UserUpdated(id) => self.user_show(&id).await?.ok_or_else(|| {
                RtError::UnhandledResponse(format!("user {id} absent after update"))
            }),
            _ => Err(RtError::UnhandledResponse(body.trim().to_string())),
        }
    }
}
