//! Page-level modal instance descriptors.
//!
//! A page hosting entity modals keeps a list of its open windows so that
//! minimized windows survive a reload independently of draft contents. The
//! list lives in the same key/value store as drafts, under
//! `<namespace>-modal-instances`, with the same best-effort semantics.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use cms_core::entity_kind::EntityKind;
use cms_core::types::{ModalId, ModalMode, Payload};

use crate::kv::{KeyValueStore, StoreError};

/// One open (possibly minimized) modal window on a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModalInstanceDescriptor {
    pub id: ModalId,
    pub mode: ModalMode,
    pub minimized: bool,
    /// Entity data the window was opened with (edit mode), if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Payload>,
}

impl ModalInstanceDescriptor {
    pub fn new(id: ModalId, mode: ModalMode) -> Self {
        Self {
            id,
            mode,
            minimized: false,
            data: None,
        }
    }

    pub fn with_data(mut self, data: Payload) -> Self {
        self.data = Some(data);
        self
    }
}

/// Persisted descriptor list for one entity kind's page.
#[derive(Clone)]
pub struct InstanceRegistry {
    kv: Arc<dyn KeyValueStore>,
    kind: EntityKind,
}

impl InstanceRegistry {
    pub fn new(kv: Arc<dyn KeyValueStore>, kind: EntityKind) -> Self {
        Self { kv, kind }
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    /// Stored descriptors; absent or corrupt lists read as empty.
    pub fn load(&self) -> Vec<ModalInstanceDescriptor> {
        let key = self.kind.instances_key();
        let raw = match self.kv.get_item(&key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                tracing::warn!(error = %e, key = %key, "Failed to read modal instances");
                return Vec::new();
            }
        };
        serde_json::from_str(&raw).unwrap_or_else(|e| {
            tracing::warn!(error = %e, key = %key, "Ignoring corrupt modal instance list");
            Vec::new()
        })
    }

    /// Replace the stored list. An empty list removes the key.
    pub fn save(&self, instances: &[ModalInstanceDescriptor]) {
        let key = self.kind.instances_key();
        let result = if instances.is_empty() {
            self.kv.remove_item(&key)
        } else {
            serde_json::to_string(instances)
                .map_err(StoreError::from)
                .and_then(|json| self.kv.set_item(&key, &json))
        };
        if let Err(e) = result {
            tracing::warn!(error = %e, key = %key, "Failed to save modal instances");
        }
    }
}

impl std::fmt::Debug for InstanceRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InstanceRegistry")
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv::MemoryStore;
    use serde_json::json;

    #[test]
    fn save_and_load_round_trip() {
        let kv = Arc::new(MemoryStore::new());
        let registry = InstanceRegistry::new(kv.clone(), EntityKind::Partners);

        let mut minimized = ModalInstanceDescriptor::new(ModalId::new("a"), ModalMode::Create);
        minimized.minimized = true;
        let edit = ModalInstanceDescriptor::new(ModalId::new("b"), ModalMode::Edit)
            .with_data(json!({"_id": "x1"}).as_object().cloned().unwrap());

        registry.save(&[minimized.clone(), edit.clone()]);
        assert!(kv.get_item("partners-modal-instances").unwrap().is_some());
        assert_eq!(registry.load(), vec![minimized, edit]);
    }

    #[test]
    fn empty_save_removes_key() {
        let kv = Arc::new(MemoryStore::new());
        let registry = InstanceRegistry::new(kv.clone(), EntityKind::News);
        registry.save(&[ModalInstanceDescriptor::new(ModalId::new("a"), ModalMode::Create)]);
        registry.save(&[]);
        assert!(kv.is_empty());
        assert!(registry.load().is_empty());
    }

    #[test]
    fn corrupt_list_reads_as_empty() {
        let kv = Arc::new(MemoryStore::new());
        kv.set_item("news-modal-instances", "{oops").unwrap();
        let registry = InstanceRegistry::new(kv, EntityKind::News);
        assert!(registry.load().is_empty());
    }

    #[test]
    fn descriptor_json_shape() {
        let d = ModalInstanceDescriptor::new(ModalId::new("a"), ModalMode::Edit);
        let v = serde_json::to_value(&d).unwrap();
        assert_eq!(v, json!({"id": "a", "mode": "edit", "minimized": false}));
    }
}
