//! Ticket link relations.
//!
//! RT models ticket-to-ticket (and ticket-to-URL) relationships as six named
//! relation types. A [`LinkSet`] is one ticket's complete relationship state:
//! the owning ticket id plus an ordered set of opaque targets per relation.
//!
//! Within one relation, targets are unique. Insertion order carries no
//! meaning on the server, but is kept stable within one reconciliation run so
//! the write sequence is deterministic.

use crate::types::record::Record;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A kind of ticket-to-ticket link.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RelationType {
    MemberOf,
    Members,
    RefersTo,
    ReferredToBy,
    DependsOn,
    DependedOnBy,
}

impl RelationType {
    /// All relation types, in wire order.
    pub const ALL: [RelationType; 6] = [
        RelationType::MemberOf,
        RelationType::Members,
        RelationType::RefersTo,
        RelationType::ReferredToBy,
        RelationType::DependsOn,
        RelationType::DependedOnBy,
    ];

    /// The field name used on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            RelationType::MemberOf => "MemberOf",
            RelationType::Members => "Members",
            RelationType::RefersTo => "RefersTo",
            RelationType::ReferredToBy => "ReferredToBy",
            RelationType::DependsOn => "DependsOn",
            RelationType::DependedOnBy => "DependedOnBy",
        }
    }

    /// Parse a wire field name. Unknown names yield `None`.
    pub fn from_name(name: &str) -> Option<RelationType> {
        RelationType::ALL.into_iter().find(|r| r.as_str() == name)
    }
}

/// One ticket's complete link state.
///
/// Targets are opaque: bare ticket ids (`"6"`) or external URIs
/// (`"http://example.org/"`). The decoder strips RT's internal
/// `fsck.com-` URI scheme down to the bare id before targets land here.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkSet {
    /// The owning ticket id, already stripped of its `ticket/` prefix.
    pub id: String,
    /// Targets per relation type, in decode order.
    pub relations: BTreeMap<RelationType, Vec<String>>,
}

impl LinkSet {
    /// Create an empty link set for a ticket.
    pub fn new(id: impl Into<String>) -> Self {
        LinkSet {
            id: id.into(),
            relations: BTreeMap::new(),
        }
    }

    /// Targets for one relation (empty slice if the relation is absent).
    pub fn targets(&self, relation: RelationType) -> &[String] {
        self.relations
            .get(&relation)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Append a target to a relation unless already present.
    pub fn add_target(&mut self, relation: RelationType, target: impl Into<String>) {
        let target = target.into();
        let entry = self.relations.entry(relation).or_default();
        if !entry.contains(&target) {
            entry.push(target);
        }
    }

    /// Remove a target from a relation. Removing an absent target is a no-op.
    pub fn remove_target(&mut self, relation: RelationType, target: &str) {
        if let Some(entry) = self.relations.get_mut(&relation) {
            entry.retain(|t| t != target);
        }
    }

    /// The largest target count across all relations present.
    ///
    /// This is the reconciler's write bound: one edit request advances each
    /// relation's server-side value list by exactly one entry, so reaching a
    /// state with `n` targets in some relation takes `n` requests.
    pub fn max_relation_len(&self) -> usize {
        self.relations.values().map(Vec::len).max().unwrap_or(0)
    }

    /// Render as a field map for content encoding.
    ///
    /// Relations left empty are included as empty lists; an empty value line
    /// is what clears a relation server-side.
    pub fn to_record(&self) -> Record {
        let mut record = Record::new();
        for (relation, targets) in &self.relations {
            record.insert(relation.as_str(), targets.clone());
        }
        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relation_type_round_trip() {
        for relation in RelationType::ALL {
            assert_eq!(RelationType::from_name(relation.as_str()), Some(relation));
        }
        assert_eq!(RelationType::from_name("HasMember"), None);
    }

    #[test]
    fn test_add_target_dedupes() {
        let mut links = LinkSet::new("1");
        links.add_target(RelationType::DependsOn, "10");
        links.add_target(RelationType::DependsOn, "11");
        links.add_target(RelationType::DependsOn, "10");
        assert_eq!(links.targets(RelationType::DependsOn), ["10", "11"]);
    }

    #[test]
    fn test_remove_absent_target_is_noop() {
        let mut links = LinkSet::new("1");
        links.add_target(RelationType::RefersTo, "http://example.org/");
        links.remove_target(RelationType::RefersTo, "http://other.example/");
        links.remove_target(RelationType::DependsOn, "10");
        assert_eq!(links.targets(RelationType::RefersTo).len(), 1);
    }

    #[test]
    fn test_max_relation_len() {
        let mut links = LinkSet::new("1");
        assert_eq!(links.max_relation_len(), 0);
        links.add_target(RelationType::DependsOn, "10");
        links.add_target(RelationType::DependsOn, "11");
        links.add_target(RelationType::RefersTo, "http://example.org/");
        assert_eq!(links.max_relation_len(), 2);
    }

    #[test]
    fn test_to_record_keeps_empty_relations() {
        let mut links = LinkSet::new("1");
        links.relations.insert(RelationType::DependsOn, vec![]);
        links.add_target(RelationType::RefersTo, "6");

        let record = links.to_record();
        assert_eq!(record.get_list("DependsOn"), Some(&[][..]));
        assert_eq!(
            record.get_list("RefersTo"),
            Some(&["6".to_string()][..])
        );
    }
}
