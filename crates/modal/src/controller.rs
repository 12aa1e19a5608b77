//! Per-content-type modal controller.
//!
//! [`EntityModalController`] binds a [`FloatingWindow`] to one
//! [`EntityKind`]'s schema and to the page's real persistence call, an
//! [`EntitySaver`]. It owns the window's mount/unmount cycle: the host feeds
//! it [`ModalProps`] through [`refresh`](EntityModalController::refresh)
//! whenever they change.
//!
//! Submission contract:
//!
//! - on success the draft is deleted, `on_published` fires, then `on_close`
//!   fires exactly once and the window unmounts;
//! - on failure the error is logged, `on_publish_failed` fires and the same
//!   error is returned. The window and its draft stay intact so the user can
//!   resubmit. There is no automatic retry.

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tokio::task::JoinHandle;

use cms_core::entity_kind::EntityKind;
use cms_core::payload::{resolve_initial_payload, PayloadSource};
use cms_core::sanitize::{empty_payload, sanitize_kind};
use cms_core::types::{ModalId, ModalMode, Payload};
use cms_drafts::{DraftRecord, DraftStore, ModalInstanceDescriptor};
use cms_events::WindowListener;

use crate::error::{SubmitError, WindowError};
use crate::window::{DraftBinding, FloatingWindow, WindowOptions};

// ---------------------------------------------------------------------------
// Saver
// ---------------------------------------------------------------------------

/// A file uploaded alongside the entity (cover image, report PDF, ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// The page's persistence call.
///
/// Implemented for any `Fn(Payload, Option<Attachment>) -> impl Future`
/// returning `Result<(), SubmitError>`, so tests and hosts can pass a
/// closure.
#[async_trait]
pub trait EntitySaver: Send + Sync {
    async fn save(&self, payload: Payload, attachment: Option<Attachment>)
        -> Result<(), SubmitError>;
}

#[async_trait]
impl<F, Fut> EntitySaver for F
where
    F: Fn(Payload, Option<Attachment>) -> Fut + Send + Sync,
    Fut: Future<Output = Result<(), SubmitError>> + Send + 'static,
{
    async fn save(
        &self,
        payload: Payload,
        attachment: Option<Attachment>,
    ) -> Result<(), SubmitError> {
        (self)(payload, attachment).await
    }
}

// ---------------------------------------------------------------------------
// Props
// ---------------------------------------------------------------------------

/// Inputs supplied by the host page.
#[derive(Debug, Clone, PartialEq)]
pub struct ModalProps {
    pub kind: EntityKind,
    pub is_open: bool,
    /// Raw server record when editing; sanitized before use.
    pub entity_data: Option<Value>,
    pub is_edit: bool,
    pub minimized: bool,
    /// Stable id; generated once by the controller when absent.
    pub modal_id: Option<ModalId>,
}

impl ModalProps {
    /// An open create-mode modal.
    pub fn create(kind: EntityKind) -> Self {
        Self {
            kind,
            is_open: true,
            entity_data: None,
            is_edit: false,
            minimized: false,
            modal_id: None,
        }
    }

    /// An open edit-mode modal for an existing record.
    pub fn edit(kind: EntityKind, entity_data: Value) -> Self {
        Self {
            entity_data: Some(entity_data),
            is_edit: true,
            ..Self::create(kind)
        }
    }

    /// Props for a window the tray tracks.
    pub fn from_descriptor(kind: EntityKind, descriptor: &ModalInstanceDescriptor) -> Self {
        Self {
            kind,
            is_open: true,
            entity_data: descriptor.data.clone().map(Value::Object),
            is_edit: descriptor.mode.is_edit(),
            minimized: descriptor.minimized,
            modal_id: Some(descriptor.id.clone()),
        }
    }

    pub fn with_modal_id(mut self, modal_id: ModalId) -> Self {
        self.modal_id = Some(modal_id);
        self
    }

    pub fn minimized(mut self, minimized: bool) -> Self {
        self.minimized = minimized;
        self
    }

    pub fn mode(&self) -> ModalMode {
        ModalMode::from_is_edit(self.is_edit)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerPhase {
    LoadingInitial,
    Ready,
}

// ---------------------------------------------------------------------------
// Submission
// ---------------------------------------------------------------------------

/// Everything a submit needs, detachable from the controller.
#[derive(Clone)]
struct Submission {
    modal_id: ModalId,
    kind: EntityKind,
    drafts: DraftStore,
    saver: Arc<dyn EntitySaver>,
    listener: Arc<dyn WindowListener>,
}

impl Submission {
    async fn run(&self, payload: Payload, attachment: Option<Attachment>) -> Result<(), SubmitError> {
        match self.saver.save(payload, attachment).await {
            Ok(()) => {
                self.drafts.delete_draft(&self.modal_id, self.kind);
                tracing::info!(modal_id = %self.modal_id, namespace = %self.kind, "Entity saved");
                self.listener.on_published(&self.modal_id, self.kind);
                Ok(())
            }
            Err(e) => {
                tracing::error!(
                    modal_id = %self.modal_id,
                    namespace = %self.kind,
                    error = %e,
                    "Entity save failed"
                );
                self.listener
                    .on_publish_failed(&self.modal_id, self.kind, &e.message);
                Err(e)
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Controller
// ---------------------------------------------------------------------------

pub struct EntityModalController {
    kind: EntityKind,
    modal_id: ModalId,
    drafts: DraftStore,
    saver: Arc<dyn EntitySaver>,
    listener: Arc<dyn WindowListener>,
    props: ModalProps,
    /// Sanitized copy of the last non-empty `entity_data`.
    cached: Option<Payload>,
    phase: ControllerPhase,
    window: Option<FloatingWindow>,
}

impl EntityModalController {
    /// Create a controller and apply the initial props.
    ///
    /// The modal id is fixed here: the one in `props`, or a generated one.
    pub fn new(
        props: ModalProps,
        drafts: DraftStore,
        saver: Arc<dyn EntitySaver>,
        listener: Arc<dyn WindowListener>,
    ) -> Self {
        let kind = props.kind;
        let modal_id = props
            .modal_id
            .clone()
            .unwrap_or_else(|| ModalId::generate(kind));

        let mut controller = Self {
            kind,
            modal_id,
            drafts,
            saver,
            listener,
            props: ModalProps {
                is_open: false,
                ..props.clone()
            },
            cached: None,
            phase: ControllerPhase::LoadingInitial,
            window: None,
        };
        controller.refresh(props);
        controller
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    pub fn modal_id(&self) -> &ModalId {
        &self.modal_id
    }

    pub fn mode(&self) -> ModalMode {
        self.props.mode()
    }

    pub fn phase(&self) -> ControllerPhase {
        self.phase
    }

    pub fn props(&self) -> &ModalProps {
        &self.props
    }

    pub fn window(&self) -> Option<&FloatingWindow> {
        self.window.as_ref()
    }

    pub fn window_mut(&mut self) -> Option<&mut FloatingWindow> {
        self.window.as_mut()
    }

    /// Coerce raw entity data into this kind's canonical shape.
    pub fn sanitize(&self, raw: &Value) -> Option<Payload> {
        sanitize_kind(self.kind, raw)
    }

    /// Apply new props from the host.
    ///
    /// Closing (`is_open == false`) unmounts the window without firing
    /// `on_close`; a mode change remounts it. While mounted, new non-empty
    /// entity data replaces the working payload and `minimized` is synced.
    pub fn refresh(&mut self, props: ModalProps) {
        let explicit = props.entity_data.as_ref().and_then(|raw| self.sanitize(raw));
        if let Some(p) = &explicit {
            self.cached = Some(p.clone());
        }

        let mode_changed = props.is_edit != self.props.is_edit;
        let data_changed = props.entity_data != self.props.entity_data;
        self.props = ModalProps {
            kind: self.kind,
            modal_id: Some(self.modal_id.clone()),
            ..props
        };

        if (!self.props.is_open || mode_changed) && self.window.take().is_some() {
            tracing::debug!(modal_id = %self.modal_id, "Window unmounted");
        }

        if self.props.is_open {
            match self.window.as_mut() {
                Some(window) => {
                    window.sync_minimized(self.props.minimized);
                    if data_changed {
                        if let Some(p) = explicit {
                            window.set_initial_draft(p);
                        }
                    }
                }
                None => {
                    let (payload, source) = self.initial_payload(explicit.as_ref());
                    tracing::debug!(modal_id = %self.modal_id, source = ?source, "Mounting window");
                    // Explicit and cached data outrank the draft.
                    let resume = matches!(source, PayloadSource::Draft | PayloadSource::Empty);
                    let options = WindowOptions::new(payload, self.drafts.config().autosave_interval())
                        .minimized(self.props.minimized)
                        .resume_draft(resume);
                    let binding = DraftBinding::new(
                        self.drafts.clone(),
                        self.modal_id.clone(),
                        self.kind,
                        self.props.mode(),
                    );
                    self.window = Some(FloatingWindow::mount(
                        options,
                        binding,
                        Arc::clone(&self.listener),
                    ));
                }
            }
        }

        self.phase = ControllerPhase::Ready;
    }

    /// Resolve the working payload: explicit > cached > sanitized draft.
    ///
    /// Falls back to the kind's empty payload so every declared field is
    /// present.
    pub fn initial_payload(&self, explicit: Option<&Payload>) -> (Payload, PayloadSource) {
        let draft = self
            .drafts
            .load_draft(&self.modal_id, self.kind)
            .and_then(|record| self.sanitize(&Value::Object(record.payload)));

        match resolve_initial_payload(explicit, self.cached.as_ref(), draft.as_ref()) {
            (_, PayloadSource::Empty) => (empty_payload(self.kind), PayloadSource::Empty),
            resolved => resolved,
        }
    }

    /// Forward a payload verbatim to the draft store.
    pub fn handle_save_draft(&self, payload: &Payload) -> DraftRecord {
        self.drafts
            .save_draft(&self.modal_id, payload, self.props.is_edit, self.kind)
    }

    // -- window delegation ----------------------------------------------------

    pub fn minimize(&mut self) -> Result<DraftRecord, WindowError> {
        let record = self.mounted_mut()?.minimize()?;
        self.props.minimized = true;
        Ok(record)
    }

    pub fn restore(&mut self) -> Result<(), WindowError> {
        self.mounted_mut()?.restore()?;
        self.props.minimized = false;
        Ok(())
    }

    /// User closed the window.
    pub fn close(&mut self) -> Result<(), WindowError> {
        let window = self.window.take().ok_or(WindowError::NotMounted)?;
        window.close();
        self.props.is_open = false;
        Ok(())
    }

    // -- submission -----------------------------------------------------------

    /// Submit the mounted window's working payload.
    pub async fn handle_send(&mut self, attachment: Option<Attachment>) -> Result<(), SubmitError> {
        let payload = match self.window.as_ref() {
            Some(window) => window.payload(),
            None => return Err(SubmitError::new(WindowError::NotMounted.to_string())),
        };
        self.handle_send_payload(payload, attachment).await
    }

    /// Submit `payload` through the saver.
    pub async fn handle_send_payload(
        &mut self,
        payload: Payload,
        attachment: Option<Attachment>,
    ) -> Result<(), SubmitError> {
        self.submission().run(payload, attachment).await?;

        // Fences off autosave before deleting again, whatever the mode.
        match self.window.take() {
            Some(window) => window.close_published(),
            None => self.listener.on_close(&self.modal_id, self.kind),
        }
        self.props.is_open = false;
        Ok(())
    }

    /// Submit in the background and unmount immediately.
    ///
    /// The working payload is saved as a draft first, so a failed submit can
    /// be recovered from the tray. The task runs to completion even if the
    /// controller is dropped. Must be called within a tokio runtime.
    pub fn spawn_send(
        &mut self,
        attachment: Option<Attachment>,
    ) -> Result<JoinHandle<Result<(), SubmitError>>, WindowError> {
        let window = self.window.take().ok_or(WindowError::NotMounted)?;
        window.save_draft_now();
        let payload = window.payload();
        drop(window);
        self.props.is_open = false;

        let submission = self.submission();
        Ok(tokio::spawn(async move {
            submission.run(payload, attachment).await?;
            submission
                .listener
                .on_close(&submission.modal_id, submission.kind);
            Ok(())
        }))
    }

    fn submission(&self) -> Submission {
        Submission {
            modal_id: self.modal_id.clone(),
            kind: self.kind,
            drafts: self.drafts.clone(),
            saver: Arc::clone(&self.saver),
            listener: Arc::clone(&self.listener),
        }
    }

    fn mounted_mut(&mut self) -> Result<&mut FloatingWindow, WindowError> {
        self.window.as_mut().ok_or(WindowError::NotMounted)
    }
}

impl std::fmt::Debug for EntityModalController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntityModalController")
            .field("kind", &self.kind)
            .field("modal_id", &self.modal_id)
            .field("phase", &self.phase)
            .field("window", &self.window)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use cms_drafts::MemoryStore;
    use cms_events::NoopListener;
    use serde_json::json;

    fn store() -> DraftStore {
        DraftStore::new(Arc::new(MemoryStore::new()))
    }

    fn ok_saver() -> Arc<dyn EntitySaver> {
        Arc::new(|_: Payload, _: Option<Attachment>| async { Ok::<(), SubmitError>(()) })
    }

    fn controller(props: ModalProps, drafts: &DraftStore) -> EntityModalController {
        EntityModalController::new(props, drafts.clone(), ok_saver(), Arc::new(NoopListener))
    }

    #[tokio::test]
    async fn generates_stable_modal_id() {
        let drafts = store();
        let mut c = controller(ModalProps::create(EntityKind::Partners), &drafts);
        let id = c.modal_id().clone();
        assert!(id.as_str().starts_with("partners-modal-"));
        assert_eq!(c.phase(), ControllerPhase::Ready);

        c.refresh(ModalProps::create(EntityKind::Partners).minimized(true));
        assert_eq!(c.modal_id(), &id);
    }

    #[tokio::test]
    async fn edit_mode_seeds_from_sanitized_entity_data() {
        let drafts = store();
        let c = controller(
            ModalProps::edit(
                EntityKind::News,
                json!({"_id": "n1", "title": "plain string", "bogus": true}),
            ),
            &drafts,
        );
        let payload = c.window().unwrap().payload();
        assert_eq!(payload["_id"], json!("n1"));
        assert_eq!(payload["title"], json!({"en": "", "per": "", "ps": ""}));
        assert_eq!(payload["status"], json!("draft"));
        assert!(!payload.contains_key("bogus"));
    }

    #[tokio::test]
    async fn create_mode_without_anything_gets_empty_schema() {
        let drafts = store();
        let c = controller(ModalProps::create(EntityKind::Faqs), &drafts);
        let payload = c.window().unwrap().payload();
        assert_eq!(payload, empty_payload(EntityKind::Faqs));
    }

    #[tokio::test]
    async fn draft_is_used_when_no_entity_data() {
        let drafts = store();
        let id = ModalId::new("news-modal-1");
        let saved = json!({"title": {"en": "from draft"}});
        drafts.save_draft(&id, saved.as_object().unwrap(), true, EntityKind::News);

        let c = controller(
            ModalProps {
                is_edit: true,
                ..ModalProps::create(EntityKind::News)
            }
            .with_modal_id(id),
            &drafts,
        );
        let (payload, source) = c.initial_payload(None);
        assert_eq!(source, PayloadSource::Draft);
        assert_eq!(payload["title"]["en"], json!("from draft"));
    }

    #[tokio::test]
    async fn malformed_create_draft_is_sanitized_on_open() {
        let drafts = store();
        let id = ModalId::new("news-modal-7");
        let saved = json!({"title": "plain string", "status": 7, "junk": true});
        drafts.save_draft(&id, saved.as_object().unwrap(), false, EntityKind::News);

        let c = controller(ModalProps::create(EntityKind::News).with_modal_id(id), &drafts);
        let payload = c.window().unwrap().payload();
        assert_eq!(payload["title"], json!({"en": "", "per": "", "ps": ""}));
        assert_eq!(payload["status"], json!("draft"));
        assert!(!payload.contains_key("junk"));
    }

    #[tokio::test]
    async fn explicit_create_data_beats_draft() {
        let drafts = store();
        let id = ModalId::new("news-modal-8");
        let saved = json!({"title": {"en": "from draft", "per": "", "ps": ""}});
        drafts.save_draft(&id, saved.as_object().unwrap(), false, EntityKind::News);

        let props = ModalProps {
            entity_data: Some(json!({"title": {"en": "explicit", "per": "", "ps": ""}})),
            ..ModalProps::create(EntityKind::News)
        };
        let c = controller(props.with_modal_id(id), &drafts);
        let payload = c.window().unwrap().payload();
        assert_eq!(payload["title"]["en"], json!("explicit"));
    }

    #[tokio::test]
    async fn cached_copy_outlives_entity_data_prop() {
        let drafts = store();
        let mut c = controller(ModalProps::edit(EntityKind::Jobs, json!({"_id": "j1"})), &drafts);

        c.refresh(ModalProps {
            is_open: false,
            ..c.props().clone()
        });
        assert!(c.window().is_none());

        c.refresh(ModalProps {
            entity_data: None,
            is_open: true,
            ..c.props().clone()
        });
        assert_eq!(c.window().unwrap().payload()["_id"], json!("j1"));
    }

    #[tokio::test]
    async fn new_entity_data_replaces_working_payload() {
        let drafts = store();
        let mut c = controller(ModalProps::edit(EntityKind::Team, json!({"_id": "t1"})), &drafts);
        c.refresh(ModalProps::edit(EntityKind::Team, json!({"_id": "t2"})));
        assert_eq!(c.window().unwrap().payload()["_id"], json!("t2"));
    }

    #[tokio::test]
    async fn handle_save_draft_forwards_verbatim() {
        let drafts = store();
        let c = controller(ModalProps::create(EntityKind::Rfqs), &drafts);
        let payload = json!({"anything": [1, 2]}).as_object().cloned().unwrap();
        c.handle_save_draft(&payload);

        let loaded = drafts.load_draft(c.modal_id(), EntityKind::Rfqs).unwrap();
        assert_eq!(loaded.payload, payload);
        assert!(!loaded.is_edit);
    }

    #[tokio::test]
    async fn delegation_requires_mounted_window() {
        let drafts = store();
        let mut c = controller(ModalProps::create(EntityKind::Gallery), &drafts);
        c.close().unwrap();
        assert_matches!(c.minimize(), Err(WindowError::NotMounted));
        assert_matches!(c.close(), Err(WindowError::NotMounted));
        assert!(c.handle_send(None).await.is_err());
    }

    #[tokio::test]
    async fn mode_change_remounts() {
        let drafts = store();
        let mut c = controller(ModalProps::create(EntityKind::Reports), &drafts);
        c.refresh(ModalProps::edit(EntityKind::Reports, json!({"_id": "r1"})));
        let window = c.window().unwrap();
        assert_eq!(window.mode(), ModalMode::Edit);
        assert_eq!(window.payload()["_id"], json!("r1"));
    }
}
