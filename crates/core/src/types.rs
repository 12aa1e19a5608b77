use std::fmt;

use serde::{Deserialize, Serialize};

use crate::entity_kind::EntityKind;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// In-progress entity field values, keyed by field name.
pub type Payload = serde_json::Map<String, serde_json::Value>;

/// Field carrying the server-assigned identity of a persisted entity.
pub const SERVER_ID_FIELD: &str = "_id";

/// Identifier of one open or restorable modal window instance.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModalId(String);

impl ModalId {
    /// Wrap a caller-supplied id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a fresh id of the form `<kind>-modal-<epoch millis>-<uuid>`.
    pub fn generate(kind: EntityKind) -> Self {
        Self(format!(
            "{}-modal-{}-{}",
            kind.namespace(),
            chrono::Utc::now().timestamp_millis(),
            uuid::Uuid::new_v4()
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ModalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ModalId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ModalId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Whether a modal edits an existing server record or creates a new one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModalMode {
    Create,
    Edit,
}

impl ModalMode {
    pub fn from_is_edit(is_edit: bool) -> Self {
        if is_edit {
            Self::Edit
        } else {
            Self::Create
        }
    }

    pub fn is_edit(self) -> bool {
        matches!(self, Self::Edit)
    }
}

/// Returns the non-empty server id carried by a payload, if any.
pub fn server_id(payload: &Payload) -> Option<&str> {
    payload
        .get(SERVER_ID_FIELD)
        .and_then(serde_json::Value::as_str)
        .filter(|id| !id.trim().is_empty())
}
