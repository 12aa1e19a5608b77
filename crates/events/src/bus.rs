//! In-process event bus backed by a `tokio::sync::broadcast` channel.
//!
//! [`EventBus`] is the publish/subscribe hub for [`ModalEvent`]s. It is
//! designed to be shared via `Arc<EventBus>` between the windows of a page
//! and the page's modal tray.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use cms_core::entity_kind::EntityKind;
use cms_core::types::ModalId;

// ---------------------------------------------------------------------------
// ModalEvent
// ---------------------------------------------------------------------------

/// What happened to a modal window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModalEventKind {
    Opened,
    Minimized,
    Restored,
    Closed,
    DraftSaved,
    Published,
    PublishFailed,
}

impl ModalEventKind {
    /// Dot-separated event name, e.g. `"modal.minimized"`.
    pub fn name(self) -> &'static str {
        match self {
            Self::Opened => "modal.opened",
            Self::Minimized => "modal.minimized",
            Self::Restored => "modal.restored",
            Self::Closed => "modal.closed",
            Self::DraftSaved => "modal.draft_saved",
            Self::Published => "modal.published",
            Self::PublishFailed => "modal.publish_failed",
        }
    }
}

/// A lifecycle event of one modal window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModalEvent {
    pub kind: ModalEventKind,
    pub modal_id: ModalId,
    pub namespace: EntityKind,

    /// Free-form detail, e.g. the error message of a failed publish.
    pub payload: serde_json::Value,

    /// When the event was created (UTC).
    pub timestamp: DateTime<Utc>,
}

impl ModalEvent {
    pub fn new(kind: ModalEventKind, modal_id: ModalId, namespace: EntityKind) -> Self {
        Self {
            kind,
            modal_id,
            namespace,
            payload: serde_json::Value::Object(Default::default()),
            timestamp: Utc::now(),
        }
    }

    /// Set the JSON payload for the event.
    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = payload;
        self
    }
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 256;

/// In-process fan-out event bus.
///
/// ```rust
/// use cms_core::entity_kind::EntityKind;
/// use cms_core::types::ModalId;
/// use cms_events::bus::{EventBus, ModalEvent, ModalEventKind};
///
/// let bus = EventBus::default();
/// let mut rx = bus.subscribe();
///
/// bus.publish(ModalEvent::new(
///     ModalEventKind::Minimized,
///     ModalId::new("news-modal-1"),
///     EntityKind::News,
/// ));
/// ```
pub struct EventBus {
    sender: broadcast::Sender<ModalEvent>,
}

impl EventBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// When the buffer is full, the oldest un-consumed messages are dropped
    /// and slow receivers will observe a `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all current subscribers.
    ///
    /// If there are no active subscribers the event is silently dropped.
    pub fn publish(&self, event: ModalEvent) {
        tracing::trace!(kind = event.kind.name(), modal_id = %event.modal_id, "Publishing modal event");
        // A SendError only means there are zero receivers.
        let _ = self.sender.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ModalEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
