//! Namespaced draft CRUD over a [`KeyValueStore`].
//!
//! Every operation is best-effort. Storage and parse failures are logged
//! and treated as "no data"; nothing here returns an error, because losing
//! a draft must never interrupt an editing session. The server remains the
//! source of truth for persisted entities.

use std::sync::Arc;

use cms_core::config::DraftConfig;
use cms_core::entity_kind::EntityKind;
use cms_core::types::{ModalId, Payload, Timestamp};

use crate::kv::{KeyValueStore, StoreError};
use crate::record::DraftRecord;
use crate::summary::DraftSummary;

/// Shared handle to the draft space of one browser-tab-like session.
///
/// Cloning is cheap and every clone sees the same backing store.
#[derive(Clone)]
pub struct DraftStore {
    kv: Arc<dyn KeyValueStore>,
    config: DraftConfig,
}

impl DraftStore {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self::with_config(kv, DraftConfig::default())
    }

    pub fn with_config(kv: Arc<dyn KeyValueStore>, config: DraftConfig) -> Self {
        Self { kv, config }
    }

    pub fn config(&self) -> &DraftConfig {
        &self.config
    }

    /// The underlying key/value store, shared with page-level registries.
    pub fn kv(&self) -> Arc<dyn KeyValueStore> {
        Arc::clone(&self.kv)
    }

    /// Upsert the draft for `(namespace, modal_id)` stamped with the current time.
    pub fn save_draft(
        &self,
        modal_id: &ModalId,
        payload: &Payload,
        is_edit: bool,
        namespace: EntityKind,
    ) -> DraftRecord {
        self.save_draft_at(modal_id, payload, is_edit, namespace, chrono::Utc::now())
    }

    /// Upsert with an explicit timestamp.
    pub fn save_draft_at(
        &self,
        modal_id: &ModalId,
        payload: &Payload,
        is_edit: bool,
        namespace: EntityKind,
        saved_at: Timestamp,
    ) -> DraftRecord {
        let record = DraftRecord {
            modal_id: modal_id.clone(),
            namespace,
            payload: payload.clone(),
            saved_at,
            is_edit,
        };
        let key = namespace.draft_key(modal_id);

        let result = serde_json::to_string(&record)
            .map_err(StoreError::from)
            .and_then(|json| self.kv.set_item(&key, &json));
        match result {
            Ok(()) => {
                tracing::debug!(%modal_id, %namespace, is_edit, "Draft saved");
            }
            Err(e) => {
                tracing::warn!(error = %e, %modal_id, %namespace, "Failed to save draft");
            }
        }
        record
    }

    /// Load the draft for `(namespace, modal_id)`.
    ///
    /// Absent, unreadable and corrupt entries all yield `None`.
    pub fn load_draft(&self, modal_id: &ModalId, namespace: EntityKind) -> Option<DraftRecord> {
        let key = namespace.draft_key(modal_id);
        self.read_record(&key)
    }

    /// Delete the draft for `(namespace, modal_id)`. Absent drafts are ignored.
    pub fn delete_draft(&self, modal_id: &ModalId, namespace: EntityKind) {
        let key = namespace.draft_key(modal_id);
        match self.kv.remove_item(&key) {
            Ok(()) => tracing::debug!(%modal_id, %namespace, "Draft deleted"),
            Err(e) => {
                tracing::warn!(error = %e, %modal_id, %namespace, "Failed to delete draft");
            }
        }
    }

    /// All drafts in `namespace`, or across every namespace when `None`,
    /// most recently saved first.
    pub fn get_all_drafts(&self, namespace: Option<EntityKind>) -> Vec<DraftRecord> {
        let keys = match self.kv.keys() {
            Ok(keys) => keys,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to enumerate draft keys");
                return Vec::new();
            }
        };

        let prefixes: Vec<String> = match namespace {
            Some(kind) => vec![kind.draft_prefix()],
            None => EntityKind::ALL.iter().map(|k| k.draft_prefix()).collect(),
        };

        let mut records: Vec<DraftRecord> = keys
            .iter()
            .filter(|key| prefixes.iter().any(|p| key.starts_with(p.as_str())))
            .filter_map(|key| self.read_record(key))
            .collect();

        records.sort_by(|a, b| b.saved_at.cmp(&a.saved_at));
        records
    }

    /// Listing projection of `record` using this store's truncation limits.
    pub fn get_draft_summary(&self, record: &DraftRecord) -> DraftSummary {
        DraftSummary::from_record(record, &self.config)
    }

    fn read_record(&self, key: &str) -> Option<DraftRecord> {
        let raw = match self.kv.get_item(key) {
            Ok(raw) => raw?,
            Err(e) => {
                tracing::warn!(error = %e, key, "Failed to read draft");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!(error = %e, key, "Ignoring corrupt draft entry");
                None
            }
        }
    }
}

impl std::fmt::Debug for DraftStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DraftStore")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
