//! Value types produced and consumed by the wire-format adapter.

pub mod history;
pub mod links;
pub mod record;

pub use history::{Attachment, HistoryEntry, HistoryFormat};
pub use links::{LinkSet, RelationType};
pub use record::{FieldValue, Record};
