//! Link-set reconciliation.
//!
//! The edit endpoint for ticket links accepts one value per relation type per
//! request, and it *accumulates*: each write advances a relation's
//! server-side value list by one entry rather than replacing it. There is no
//! batch or patch primitive. Reconciliation is therefore explicit:
//!
//! 1. fetch the current state;
//! 2. derive the desired state (deep copy, then union or prune);
//! 3. for adds, clear the existing links first (writes append, so skipping
//!    the clear can duplicate server-side entries);
//! 4. issue `tries` identical writes of the full desired state, where
//!    `tries` is the largest per-relation target count, the number of
//!    requests the accumulate-on-write behavior needs to converge;
//! 5. re-fetch and return the authoritative result. The request alone never
//!    proves success; the server's text responses are the only truth channel.
//!
//! An interrupted sequence leaves whatever partial state the completed
//! requests produced; re-running converges because current and desired are
//! recomputed from scratch every time.

use crate::client::dispatch::{dispatch_write, WriteOutcome};
use crate::client::fetch::RtClient;
use crate::error::{Result, RtError};
use crate::protocol::decoder::{decode_record, KeyCase};
use crate::protocol::encoder::{compose_content, EntityKind};
use crate::traits::Transport;
use crate::types::{FieldValue, LinkSet, RelationType};
use std::collections::BTreeMap;

/// Targets per relation, as callers hand them to add/remove.
pub type RelationMap = BTreeMap<RelationType, Vec<String>>;

/// Reduce RT's internal link URIs to bare ticket ids.
///
/// Local targets arrive as `fsck.com-<instance>/ticket/<id>`; external URIs
/// pass through untouched.
fn strip_internal_scheme(target: &str) -> String {
    if target.starts_with("fsck.com-") {
        target.rsplit('/').next().unwrap_or(target).to_string()
    } else {
        target.to_string()
    }
}

impl<T: Transport> RtClient<T> {
    /// Fetch a ticket's current link state. `Ok(None)` when the ticket does
    /// not exist.
    pub async fn ticket_links_show(&self, id: &str) -> Result<Option<LinkSet>> {
        let envelope = self
            .get_envelope(&format!("/ticket/{id}/links/show"), &[])
            .await?;
        let Some(body) = envelope.body else {
            return Ok(None);
        };
        let Some(record) = decode_record(&body, KeyCase::Preserve) else {
            return Ok(None);
        };

        let mut links = LinkSet::new(record.id().unwrap_or(id));
        for (key, value) in record.iter() {
            if key == "id" {
                continue;
            }
            let Some(relation) = RelationType::from_name(key) else {
                tracing::warn!(field = key, "unknown relation in links response");
                continue;
            };
            let raw = match value {
                FieldValue::Scalar(s) => s.clone(),
                FieldValue::List(items) => items.join(", "),
            };
            let targets = raw
                .split(',')
                .map(str::trim)
                .filter(|target| !target.is_empty())
                .map(strip_internal_scheme)
                .collect();
            links.relations.insert(relation, targets);
        }
        Ok(Some(links))
    }

    /// Add links on a ticket and return the resulting link state.
    ///
    /// Already-present targets are kept once (set union, existing order
    /// preserved). `Ok(None)` when the ticket does not exist.
    pub async fn ticket_links_add(
        &self,
        id: &str,
        additions: &RelationMap,
    ) -> Result<Option<LinkSet>> {
        let Some(current) = self.ticket_links_show(id).await? else {
            return Ok(None);
        };

        let mut desired = current.clone();
        for (&relation, targets) in additions {
            for target in targets {
                desired.add_target(relation, target.clone());
            }
        }

        // Writes append server-side, so the existing links are cleared before
        // the full desired set goes out.
        self.ticket_links_remove(id, &current.relations).await?;

        let tries = desired.max_relation_len();
        self.write_links(id, &desired, tries).await?;

        self.ticket_links_show(id).await
    }

    /// Remove links from a ticket and return the resulting link state.
    ///
    /// Removing an absent target is a no-op. An empty `removals` map
    /// short-circuits the write loop entirely. `Ok(None)` when the ticket
    /// does not exist.
    pub async fn ticket_links_remove(
        &self,
        id: &str,
        removals: &RelationMap,
    ) -> Result<Option<LinkSet>> {
        let Some(current) = self.ticket_links_show(id).await? else {
            return Ok(None);
        };

        let mut desired = current.clone();
        for (&relation, targets) in removals {
            for target in targets {
                desired.remove_target(relation, target);
            }
        }

        let tries = removals.values().map(Vec::len).max().unwrap_or(0);
        self.write_links(id, &desired, tries).await?;

        self.ticket_links_show(id).await
    }

    /// Issue `tries` identical writes of the full desired state.
    async fn write_links(&self, id: &str, desired: &LinkSet, tries: usize) -> Result<()> {
        for attempt in 0..tries {
            let content = compose_content(EntityKind::Ticket, id, &desired.to_record());
            let body = self
                .post_content(&format!("/ticket/{id}/links"), &content)
                .await?;
            match dispatch_write(&body)? {
                WriteOutcome::LinksUpdated(_) => {
                    tracing::debug!(ticket = id, attempt, tries, "links write accepted");
                }
                _ => return Err(RtError::UnhandledResponse(body.trim().to_string())),
            }
        }
        Ok(())
    }
}
