//! Persistence collaborators.
//!
//! The engine never owns storage. It talks to the host through
//! [`RecordStore`] (content records) and [`LayoutStore`] (a node's ordered
//! sections). [`MemoryStore`] and [`FileStore`] are ready-made implementations.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::{MemoryStore, StoreSnapshot};

use blockwright_fields::{FieldValue, RecordId, RecordRef, RevisionId};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::ids::NodeId;
use crate::layout::Section;

/// Durable reference to a created record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaterializedRef {
    pub record_id: RecordId,
    pub revision_id: RevisionId,
    pub label: String,
}

impl MaterializedRef {
    /// The `{target_id, target_revision_id}` pair stored in a parent's reference list.
    pub fn as_record_ref(&self) -> RecordRef {
        RecordRef {
            target_id: self.record_id,
            target_revision_id: self.revision_id,
        }
    }
}

/// A fully coerced record handed to [`RecordStore::create`].
#[derive(Debug, Clone, PartialEq)]
pub struct NewRecord {
    pub type_name: String,
    /// Stable key from the block spec, used for lookup and import idempotency.
    pub key: Option<String>,
    /// Administrative label.
    pub info: Option<String>,
    pub reusable: bool,
    /// Coerced fields in input order.
    pub fields: IndexMap<String, FieldValue>,
}

/// A persisted record as returned by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordHandle {
    #[serde(rename = "type")]
    pub type_name: String,
    pub record_id: RecordId,
    pub revision_id: RevisionId,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(default)]
    pub reusable: bool,
    #[serde(default)]
    pub fields: IndexMap<String, FieldValue>,
}

impl RecordHandle {
    pub fn to_ref(&self) -> MaterializedRef {
        MaterializedRef {
            record_id: self.record_id,
            revision_id: self.revision_id,
            label: self.label.clone(),
        }
    }
}

/// Record persistence.
///
/// `create` must be atomic: a failed call leaves nothing visible to later reads.
pub trait RecordStore {
    /// Persist a new record and return its ids and label.
    fn create(&self, record: NewRecord) -> Result<MaterializedRef>;

    /// Load a record by id. `Ok(None)` when it does not exist.
    fn load(&self, id: RecordId) -> Result<Option<RecordHandle>>;

    /// Load a record by the stable key it was created with.
    fn find_by_key(&self, key: &str) -> Result<Option<RecordHandle>>;

    /// Remove a record. Used to undo a partially committed run.
    fn delete(&self, id: RecordId) -> Result<()>;
}

/// Layout field persistence for nodes.
pub trait LayoutStore {
    /// Current sections of `node`, in render order.
    ///
    /// Fails with `NoLayoutField` when the node has no layout capability.
    fn load_layout(&self, node: NodeId) -> Result<Vec<Section>>;

    /// Replace the sections of `node` in a single write.
    fn save_layout(&self, node: NodeId, sections: &[Section]) -> Result<()>;
}
