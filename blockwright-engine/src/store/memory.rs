use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use blockwright_fields::{RecordId, RevisionId};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{LayoutStore, MaterializedRef, NewRecord, RecordHandle, RecordStore};
use crate::error::{EngineError, Result};
use crate::ids::NodeId;
use crate::layout::Section;

/// Serializable state of a [`MemoryStore`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreSnapshot {
    next_record: u64,
    next_revision: u64,
    #[serde(default)]
    records: BTreeMap<RecordId, RecordHandle>,
    #[serde(default)]
    layouts: BTreeMap<NodeId, Vec<Section>>,
}

impl Default for StoreSnapshot {
    fn default() -> Self {
        Self {
            next_record: 1,
            next_revision: 1,
            records: BTreeMap::new(),
            layouts: BTreeMap::new(),
        }
    }
}

/// In-memory record and layout store.
///
/// Record and revision ids are assigned from separate monotonic counters
/// starting at 1. Only nodes registered with [`MemoryStore::add_node`] have a
/// layout field.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<StoreSnapshot>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_snapshot(snapshot: StoreSnapshot) -> Self {
        Self {
            state: Mutex::new(snapshot),
        }
    }

    /// Copy of the current state, for persistence.
    pub fn snapshot(&self) -> Result<StoreSnapshot> {
        Ok(self.lock()?.clone())
    }

    /// Give `node` an empty layout field. Existing layouts are kept.
    pub fn add_node(&self, node: NodeId) -> Result<()> {
        self.lock()?.layouts.entry(node).or_default();
        Ok(())
    }

    /// Registered nodes, ascending.
    pub fn nodes(&self) -> Result<Vec<NodeId>> {
        Ok(self.lock()?.layouts.keys().copied().collect())
    }

    /// All records, ordered by id.
    pub fn records(&self) -> Result<Vec<RecordHandle>> {
        Ok(self.lock()?.records.values().cloned().collect())
    }

    fn lock(&self) -> Result<MutexGuard<'_, StoreSnapshot>> {
        self.state
            .lock()
            .map_err(|_| EngineError::storage("memory store lock poisoned"))
    }
}

impl RecordStore for MemoryStore {
    fn create(&self, record: NewRecord) -> Result<MaterializedRef> {
        let mut state = self.lock()?;
        let record_id = RecordId(state.next_record);
        let revision_id = RevisionId(state.next_revision);
        state.next_record += 1;
        state.next_revision += 1;

        let label = record
            .info
            .filter(|info| !info.is_empty())
            .unwrap_or_else(|| format!("{} {}", record.type_name, record_id));
        let handle = RecordHandle {
            type_name: record.type_name,
            record_id,
            revision_id,
            label,
            key: record.key,
            reusable: record.reusable,
            fields: record.fields,
        };
        let created = handle.to_ref();
        state.records.insert(record_id, handle);
        debug!(record = %record_id, revision = %revision_id, "stored record");
        Ok(created)
    }

    fn load(&self, id: RecordId) -> Result<Option<RecordHandle>> {
        Ok(self.lock()?.records.get(&id).cloned())
    }

    fn find_by_key(&self, key: &str) -> Result<Option<RecordHandle>> {
        Ok(self
            .lock()?
            .records
            .values()
            .find(|r| r.key.as_deref() == Some(key))
            .cloned())
    }

    fn delete(&self, id: RecordId) -> Result<()> {
        match self.lock()?.records.remove(&id) {
            Some(_) => Ok(()),
            None => Err(EngineError::NotFound {
                resource: "record",
                id: id.to_string(),
            }),
        }
    }
}

impl LayoutStore for MemoryStore {
    fn load_layout(&self, node: NodeId) -> Result<Vec<Section>> {
        self.lock()?
            .layouts
            .get(&node)
            .cloned()
            .ok_or(EngineError::NoLayoutField { node })
    }

    fn save_layout(&self, node: NodeId, sections: &[Section]) -> Result<()> {
        let mut state = self.lock()?;
        let layout = state
            .layouts
            .get_mut(&node)
            .ok_or(EngineError::NoLayoutField { node })?;
        *layout = sections.to_vec();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blockwright_fields::FieldValue;
    use indexmap::IndexMap;

    fn text(key: Option<&str>, info: Option<&str>) -> NewRecord {
        let mut fields = IndexMap::new();
        fields.insert(
            "title".to_string(),
            FieldValue::PlainText {
                value: "Hello".into(),
            },
        );
        NewRecord {
            type_name: "text".into(),
            key: key.map(String::from),
            info: info.map(String::from),
            reusable: false,
            fields,
        }
    }

    #[test]
    fn test_ids_are_monotonic() {
        let store = MemoryStore::new();
        let a = store.create(text(None, None)).unwrap();
        let b = store.create(text(None, None)).unwrap();
        assert_eq!(a.record_id, RecordId(1));
        assert_eq!(b.record_id, RecordId(2));
        assert_eq!(b.revision_id, RevisionId(2));
    }

    #[test]
    fn test_label_falls_back_to_type_and_id() {
        let store = MemoryStore::new();
        assert_eq!(store.create(text(None, None)).unwrap().label, "text 1");
        assert_eq!(
            store.create(text(None, Some("Intro"))).unwrap().label,
            "Intro"
        );
    }

    #[test]
    fn test_find_by_key_and_delete() {
        let store = MemoryStore::new();
        let created = store.create(text(Some("intro"), None)).unwrap();
        let found = store.find_by_key("intro").unwrap().unwrap();
        assert_eq!(found.record_id, created.record_id);

        store.delete(created.record_id).unwrap();
        assert!(store.load(created.record_id).unwrap().is_none());
        assert!(matches!(
            store.delete(created.record_id),
            Err(EngineError::NotFound { resource: "record", .. })
        ));
    }

    #[test]
    fn test_unregistered_node_has_no_layout() {
        let store = MemoryStore::new();
        assert!(matches!(
            store.load_layout(NodeId(3)),
            Err(EngineError::NoLayoutField { node: NodeId(3) })
        ));
        assert!(store.save_layout(NodeId(3), &[]).is_err());

        store.add_node(NodeId(3)).unwrap();
        assert!(store.load_layout(NodeId(3)).unwrap().is_empty());
    }

    #[test]
    fn test_snapshot_survives_json() {
        let store = MemoryStore::new();
        store.add_node(NodeId(1)).unwrap();
        store.create(text(Some("intro"), None)).unwrap();

        let json = serde_json::to_string(&store.snapshot().unwrap()).unwrap();
        let restored = MemoryStore::from_snapshot(serde_json::from_str(&json).unwrap());
        assert_eq!(restored.nodes().unwrap(), vec![NodeId(1)]);
        assert!(restored.find_by_key("intro").unwrap().is_some());
        assert_eq!(
            restored.create(text(None, None)).unwrap().record_id,
            RecordId(2)
        );
    }
}
