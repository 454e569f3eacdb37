//! Queue operations.

use crate::client::fetch::RtClient;
use crate::error::Result;
use crate::protocol::decoder::{decode_record, KeyCase};
use crate::traits::Transport;
use crate::types::Record;

impl<T: Transport> RtClient<T> {
    /// Fetch one queue by numeric or textual id. `Ok(None)` when no such
    /// queue exists.
    pub async fn queue_show(&self, id: &str) -> Result<Option<Record>> {
        let envelope = self.get_envelope(&format!("/queue/{id}"), &[]).await?;
        let Some(body) = envelope.body else {
            return Ok(None);
        };
        if body.contains("No queue named") {
            return Ok(None);
        }
        Ok(decode_record(&body, KeyCase::Preserve))
    }
}
