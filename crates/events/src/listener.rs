//! Synchronous lifecycle callbacks from a window to its host page.
//!
//! A window fires these from inside the corresponding user action, before
//! the action returns. The host typically uses them to keep its own modal
//! instance list in sync.

use std::sync::Arc;

use cms_core::entity_kind::EntityKind;
use cms_core::types::{ModalId, Timestamp};

use crate::bus::{EventBus, ModalEvent, ModalEventKind};

/// Lifecycle callbacks. Every method defaults to a no-op.
pub trait WindowListener: Send + Sync {
    fn on_open(&self, _modal_id: &ModalId, _namespace: EntityKind) {}

    fn on_minimize(&self, _modal_id: &ModalId, _namespace: EntityKind) {}

    fn on_restore(&self, _modal_id: &ModalId, _namespace: EntityKind) {}

    fn on_close(&self, _modal_id: &ModalId, _namespace: EntityKind) {}

    fn on_draft_saved(&self, _modal_id: &ModalId, _namespace: EntityKind, _saved_at: Timestamp) {}

    fn on_published(&self, _modal_id: &ModalId, _namespace: EntityKind) {}

    fn on_publish_failed(&self, _modal_id: &ModalId, _namespace: EntityKind, _message: &str) {}
}

/// Listener that ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopListener;

impl WindowListener for NoopListener {}

/// Listener that republishes every callback as a [`ModalEvent`].
#[derive(Clone)]
pub struct BusListener {
    bus: Arc<EventBus>,
}

impl BusListener {
    pub fn new(bus: Arc<EventBus>) -> Self {
        Self { bus }
    }

    fn emit(&self, kind: ModalEventKind, modal_id: &ModalId, namespace: EntityKind) {
        self.bus
            .publish(ModalEvent::new(kind, modal_id.clone(), namespace));
    }
}

impl WindowListener for BusListener {
    fn on_open(&self, modal_id: &ModalId, namespace: EntityKind) {
        self.emit(ModalEventKind::Opened, modal_id, namespace);
    }

    fn on_minimize(&self, modal_id: &ModalId, namespace: EntityKind) {
        self.emit(ModalEventKind::Minimized, modal_id, namespace);
    }

    fn on_restore(&self, modal_id: &ModalId, namespace: EntityKind) {
        self.emit(ModalEventKind::Restored, modal_id, namespace);
    }

    fn on_close(&self, modal_id: &ModalId, namespace: EntityKind) {
        self.emit(ModalEventKind::Closed, modal_id, namespace);
    }

    fn on_draft_saved(&self, modal_id: &ModalId, namespace: EntityKind, saved_at: Timestamp) {
        self.bus.publish(
            ModalEvent::new(ModalEventKind::DraftSaved, modal_id.clone(), namespace)
                .with_payload(serde_json::json!({ "savedAt": saved_at })),
        );
    }

    fn on_published(&self, modal_id: &ModalId, namespace: EntityKind) {
        self.emit(ModalEventKind::Published, modal_id, namespace);
    }

    fn on_publish_failed(&self, modal_id: &ModalId, namespace: EntityKind, message: &str) {
        self.bus.publish(
            ModalEvent::new(ModalEventKind::PublishFailed, modal_id.clone(), namespace)
                .with_payload(serde_json::json!({ "message": message })),
        );
    }
}
