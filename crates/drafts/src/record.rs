use serde::{Deserialize, Serialize};

use cms_core::entity_kind::EntityKind;
use cms_core::types::{ModalId, ModalMode, Payload, Timestamp};

/// One persisted, unsubmitted snapshot of an in-progress entity edit.
///
/// At most one record exists per `(namespace, modal_id)`; saving again
/// overwrites it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftRecord {
    pub modal_id: ModalId,
    pub namespace: EntityKind,
    pub payload: Payload,
    pub saved_at: Timestamp,
    /// `true` when the draft edits an existing server record.
    pub is_edit: bool,
}

impl DraftRecord {
    pub fn mode(&self) -> ModalMode {
        ModalMode::from_is_edit(self.is_edit)
    }
}
