//! Page-level tray of minimized windows and orphaned drafts.
//!
//! The tray combines two sources for one [`EntityKind`]:
//!
//! - the page's [`ModalInstanceDescriptor`] list, persisted through an
//!   [`InstanceRegistry`];
//! - the drafts in the [`DraftStore`] that no descriptor refers to
//!   ("orphaned" drafts, typically left over from a previous page load).
//!
//! Every mutation writes the descriptor list back immediately.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use tokio::sync::broadcast;

use cms_core::entity_kind::EntityKind;
use cms_core::error::CoreError;
use cms_core::types::{server_id, ModalId, ModalMode, Payload};
use cms_drafts::{DraftRecord, DraftStore, DraftSummary, InstanceRegistry, ModalInstanceDescriptor};
use cms_events::{ModalEvent, ModalEventKind};

pub struct ModalTray {
    kind: EntityKind,
    drafts: DraftStore,
    registry: InstanceRegistry,
    instances: Vec<ModalInstanceDescriptor>,
}

impl ModalTray {
    /// Load the tray for `kind` from the draft store's key/value backend.
    pub fn load(drafts: DraftStore, kind: EntityKind) -> Self {
        let registry = InstanceRegistry::new(drafts.kv(), kind);
        let instances = registry.load();
        Self {
            kind,
            drafts,
            registry,
            instances,
        }
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    pub fn instances(&self) -> &[ModalInstanceDescriptor] {
        &self.instances
    }

    pub fn instance(&self, modal_id: &ModalId) -> Option<&ModalInstanceDescriptor> {
        self.instances.iter().find(|d| &d.id == modal_id)
    }

    pub fn minimized_instances(&self) -> Vec<&ModalInstanceDescriptor> {
        self.instances.iter().filter(|d| d.minimized).collect()
    }

    /// Drafts of this kind with no descriptor, most recent first.
    pub fn orphaned_drafts(&self) -> Vec<DraftRecord> {
        let open: HashSet<&ModalId> = self.instances.iter().map(|d| &d.id).collect();
        self.drafts
            .get_all_drafts(Some(self.kind))
            .into_iter()
            .filter(|record| !open.contains(&record.modal_id))
            .collect()
    }

    pub fn orphaned_summaries(&self) -> Vec<DraftSummary> {
        self.orphaned_drafts()
            .iter()
            .map(|record| self.drafts.get_draft_summary(record))
            .collect()
    }

    /// The tray renders nothing when it has nothing to list.
    pub fn is_visible(&self) -> bool {
        !self.minimized_instances().is_empty() || !self.orphaned_drafts().is_empty()
    }

    // -- opening --------------------------------------------------------------

    /// Track a fresh create-mode window.
    pub fn open_create(&mut self) -> ModalId {
        let id = ModalId::generate(self.kind);
        self.push(ModalInstanceDescriptor::new(id.clone(), ModalMode::Create));
        id
    }

    /// Track an edit-mode window for an existing record.
    pub fn open_edit(&mut self, data: Payload) -> ModalId {
        let id = ModalId::generate(self.kind);
        self.push(ModalInstanceDescriptor::new(id.clone(), ModalMode::Edit).with_data(data));
        id
    }

    /// Bind a new, non-minimized descriptor to an orphaned draft.
    ///
    /// A create-mode window picks the draft up itself on mount. Edit-mode
    /// windows do not, so the draft payload travels as descriptor data.
    pub fn open_draft(&mut self, modal_id: &ModalId) -> Result<ModalInstanceDescriptor, CoreError> {
        if self.instance(modal_id).is_some() {
            return Err(CoreError::Conflict(format!(
                "Modal {modal_id} is already open"
            )));
        }
        let record = self
            .drafts
            .load_draft(modal_id, self.kind)
            .ok_or_else(|| CoreError::NotFound {
                entity: "draft",
                id: modal_id.to_string(),
            })?;

        let mut descriptor = ModalInstanceDescriptor::new(record.modal_id.clone(), record.mode());
        if record.is_edit {
            descriptor = descriptor.with_data(record.payload);
        }
        self.push(descriptor.clone());
        Ok(descriptor)
    }

    // -- per-instance actions -------------------------------------------------

    /// Flip a minimized descriptor back to open.
    pub fn restore(&mut self, modal_id: &ModalId) -> Result<(), CoreError> {
        self.set_minimized(modal_id, false)
    }

    pub fn minimize(&mut self, modal_id: &ModalId) -> Result<(), CoreError> {
        self.set_minimized(modal_id, true)
    }

    /// Forget a descriptor. Its draft, if any, becomes orphaned.
    pub fn remove(&mut self, modal_id: &ModalId) -> bool {
        let before = self.instances.len();
        self.instances.retain(|d| &d.id != modal_id);
        let removed = self.instances.len() != before;
        if removed {
            self.persist();
        }
        removed
    }

    /// Explicit user delete: drop the draft and any descriptor for it.
    pub fn delete_draft(&mut self, modal_id: &ModalId) {
        self.drafts.delete_draft(modal_id, self.kind);
        self.remove(modal_id);
    }

    // -- bulk actions ---------------------------------------------------------

    /// Discard everything never associated with a server record.
    ///
    /// "Unsaved" means no `_id` in the draft payload and none in the
    /// descriptor data. A schema that never exposes `_id` to the client is
    /// therefore always classified as unsaved. Returns the number of
    /// distinct modal ids cleared.
    pub fn clear_unsaved(&mut self) -> usize {
        let drafts = self.drafts.get_all_drafts(Some(self.kind));
        let draft_has_id = |id: &ModalId| {
            drafts
                .iter()
                .find(|r| &r.modal_id == id)
                .is_some_and(|r| server_id(&r.payload).is_some())
        };

        // Classify everything first; a tracked window is saved when either
        // its descriptor data or its draft carries an `_id`.
        let tracked: HashSet<&ModalId> = self.instances.iter().map(|d| &d.id).collect();
        let mut unsaved: HashSet<ModalId> = self
            .instances
            .iter()
            .filter(|d| d.data.as_ref().and_then(server_id).is_none() && !draft_has_id(&d.id))
            .map(|d| d.id.clone())
            .collect();
        unsaved.extend(
            drafts
                .iter()
                .filter(|r| !tracked.contains(&r.modal_id) && server_id(&r.payload).is_none())
                .map(|r| r.modal_id.clone()),
        );

        for id in &unsaved {
            self.drafts.delete_draft(id, self.kind);
        }
        self.instances.retain(|d| !unsaved.contains(&d.id));

        self.persist();
        tracing::info!(namespace = %self.kind, cleared = unsaved.len(), "Cleared unsaved drafts");
        unsaved.len()
    }

    /// Discard every draft and descriptor of this kind.
    pub fn clear_all(&mut self) -> usize {
        let mut cleared: HashSet<ModalId> = self.instances.drain(..).map(|d| d.id).collect();
        for record in self.drafts.get_all_drafts(Some(self.kind)) {
            cleared.insert(record.modal_id);
        }
        for id in &cleared {
            self.drafts.delete_draft(id, self.kind);
        }

        self.persist();
        tracing::info!(namespace = %self.kind, cleared = cleared.len(), "Cleared all drafts");
        cleared.len()
    }

    // -- event sync -----------------------------------------------------------

    /// Mirror a window lifecycle event into the descriptor list.
    ///
    /// Events for other kinds or for untracked windows are ignored. Returns
    /// whether the list changed.
    pub fn apply_event(&mut self, event: &ModalEvent) -> bool {
        if event.namespace != self.kind {
            return false;
        }
        match event.kind {
            ModalEventKind::Minimized => self.set_minimized(&event.modal_id, true).is_ok(),
            ModalEventKind::Restored => self.set_minimized(&event.modal_id, false).is_ok(),
            ModalEventKind::Closed | ModalEventKind::Published => self.remove(&event.modal_id),
            ModalEventKind::Opened | ModalEventKind::DraftSaved | ModalEventKind::PublishFailed => {
                false
            }
        }
    }

    /// Apply bus events to a shared tray until the bus closes.
    pub async fn run_sync(tray: Arc<Mutex<ModalTray>>, mut receiver: broadcast::Receiver<ModalEvent>) {
        loop {
            match receiver.recv().await {
                Ok(event) => {
                    let mut tray = tray.lock().unwrap_or_else(|e| e.into_inner());
                    tray.apply_event(&event);
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(skipped = n, "Modal tray lagged, reloading instances");
                    let mut tray = tray.lock().unwrap_or_else(|e| e.into_inner());
                    tray.instances = tray.registry.load();
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::debug!("Event bus closed, tray sync stopping");
                    break;
                }
            }
        }
    }

    // -- internals ------------------------------------------------------------

    fn push(&mut self, descriptor: ModalInstanceDescriptor) {
        tracing::debug!(namespace = %self.kind, modal_id = %descriptor.id, mode = ?descriptor.mode, "Tracking modal");
        self.instances.push(descriptor);
        self.persist();
    }

    fn set_minimized(&mut self, modal_id: &ModalId, minimized: bool) -> Result<(), CoreError> {
        let descriptor = self
            .instances
            .iter_mut()
            .find(|d| &d.id == modal_id)
            .ok_or_else(|| CoreError::NotFound {
                entity: "modal instance",
                id: modal_id.to_string(),
            })?;
        if descriptor.minimized != minimized {
            descriptor.minimized = minimized;
            self.persist();
        }
        Ok(())
    }

    fn persist(&self) {
        self.registry.save(&self.instances);
    }
}

impl std::fmt::Debug for ModalTray {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModalTray")
            .field("kind", &self.kind)
            .field("instances", &self.instances)
            .finish_non_exhaustive()
    }
}
