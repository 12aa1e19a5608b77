//! A single draggable, minimizable, maximizable floating window.
//!
//! [`FloatingWindow`] is an orchestration shell: it owns the visual state
//! machine, the working payload of the form it hosts, and the autosave
//! timer. Persistence goes through its [`DraftBinding`]; submission is the
//! controller's job.
//!
//! Constructing a window mounts it; dropping it unmounts it. Minimizing
//! keeps the window (and its working payload) alive, which is what
//! distinguishes "minimized" from "closed".

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use cms_core::entity_kind::EntityKind;
use cms_core::payload::overlay;
use cms_core::sanitize::sanitize_kind;
use cms_core::types::{ModalId, ModalMode, Payload, Timestamp};
use cms_drafts::{DraftRecord, DraftStore};
use cms_events::WindowListener;

use crate::autosave::AutosaveTimer;
use crate::error::WindowError;
use crate::state::{Position, WindowPhase, WindowState};

// ---------------------------------------------------------------------------
// DraftBinding
// ---------------------------------------------------------------------------

/// One window's draft slot: a [`DraftStore`] bound to a namespace, modal id
/// and mode.
#[derive(Debug, Clone)]
pub struct DraftBinding {
    store: DraftStore,
    modal_id: ModalId,
    kind: EntityKind,
    mode: ModalMode,
}

impl DraftBinding {
    pub fn new(store: DraftStore, modal_id: ModalId, kind: EntityKind, mode: ModalMode) -> Self {
        Self {
            store,
            modal_id,
            kind,
            mode,
        }
    }

    pub fn modal_id(&self) -> &ModalId {
        &self.modal_id
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    pub fn mode(&self) -> ModalMode {
        self.mode
    }

    pub fn save(&self, payload: &Payload) -> DraftRecord {
        self.store
            .save_draft(&self.modal_id, payload, self.mode.is_edit(), self.kind)
    }

    pub fn load(&self) -> Option<DraftRecord> {
        self.store.load_draft(&self.modal_id, self.kind)
    }

    pub fn delete(&self) {
        self.store.delete_draft(&self.modal_id, self.kind);
    }
}

// ---------------------------------------------------------------------------
// WindowOptions
// ---------------------------------------------------------------------------

/// Mount-time parameters of a window.
#[derive(Debug, Clone)]
pub struct WindowOptions {
    pub initial_minimized: bool,
    /// Seed for the working payload, already resolved by the controller.
    pub initial_payload: Payload,
    pub autosave_interval: Duration,
    /// Merge an existing create-mode draft on mount. Off when the caller
    /// already resolved a higher-precedence payload.
    pub resume_draft: bool,
}

impl WindowOptions {
    pub fn new(initial_payload: Payload, autosave_interval: Duration) -> Self {
        Self {
            initial_minimized: false,
            initial_payload,
            autosave_interval,
            resume_draft: true,
        }
    }

    pub fn minimized(mut self, minimized: bool) -> Self {
        self.initial_minimized = minimized;
        self
    }

    pub fn resume_draft(mut self, resume: bool) -> Self {
        self.resume_draft = resume;
        self
    }
}

// ---------------------------------------------------------------------------
// FloatingWindow
// ---------------------------------------------------------------------------

/// The form's values plus the closed flag that fences off late autosaves.
struct Working {
    payload: Payload,
    closed: bool,
}

/// State shared between the window and its autosave task.
struct Shared {
    working: Mutex<Working>,
    last_saved_at: Mutex<Option<Timestamp>>,
    drafts: DraftBinding,
    listener: Arc<dyn WindowListener>,
}

impl Shared {
    fn working(&self) -> MutexGuard<'_, Working> {
        self.working.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn last_saved_at(&self) -> MutexGuard<'_, Option<Timestamp>> {
        self.last_saved_at.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Write the current working payload to the draft slot.
    ///
    /// The write happens under the `working` lock so it cannot interleave
    /// with [`Shared::close`].
    fn save_now(&self) -> DraftRecord {
        let record = {
            let working = self.working();
            self.drafts.save(&working.payload)
        };
        self.saved(&record);
        record
    }

    /// Autosave tick. Skipped once the window has closed.
    fn autosave(&self) {
        let record = {
            let working = self.working();
            if working.closed {
                return;
            }
            self.drafts.save(&working.payload)
        };
        self.saved(&record);
    }

    fn saved(&self, record: &DraftRecord) {
        *self.last_saved_at() = Some(record.saved_at);
        self.listener
            .on_draft_saved(self.drafts.modal_id(), self.drafts.kind(), record.saved_at);
    }

    /// Fence off further autosaves, optionally deleting the draft.
    ///
    /// An autosave already writing holds the lock, so the delete always
    /// lands after it.
    fn close(&self, discard_draft: bool) {
        let mut working = self.working();
        working.closed = true;
        if discard_draft {
            self.drafts.delete();
        }
    }
}

/// A mounted floating window.
pub struct FloatingWindow {
    state: WindowState,
    shared: Arc<Shared>,
    autosave_interval: Duration,
    autosave: Option<AutosaveTimer>,
}

impl FloatingWindow {
    /// Mount a window.
    ///
    /// In create mode an existing draft for this modal id is sanitized and
    /// merged into the working payload so an interrupted create flow resumes
    /// where it left off. The autosave timer starts unless the window mounts
    /// minimized.
    pub fn mount(
        options: WindowOptions,
        drafts: DraftBinding,
        listener: Arc<dyn WindowListener>,
    ) -> Self {
        let mut working = options.initial_payload;
        let mut last_saved_at = None;

        if options.resume_draft && !drafts.mode().is_edit() {
            if let Some(record) = drafts.load() {
                let resumed = sanitize_kind(drafts.kind(), &serde_json::Value::Object(record.payload))
                    .unwrap_or_default();
                if overlay(&mut working, &resumed) {
                    tracing::debug!(modal_id = %drafts.modal_id(), saved_at = %record.saved_at, "Resumed draft");
                }
                last_saved_at = Some(record.saved_at);
            }
        }

        let shared = Arc::new(Shared {
            working: Mutex::new(Working {
                payload: working,
                closed: false,
            }),
            last_saved_at: Mutex::new(last_saved_at),
            drafts,
            listener,
        });

        let mut window = Self {
            state: WindowState::new(options.initial_minimized),
            shared,
            autosave_interval: options.autosave_interval,
            autosave: None,
        };
        window.sync_autosave();
        window
            .shared
            .listener
            .on_open(window.modal_id(), window.kind());
        tracing::debug!(modal_id = %window.modal_id(), phase = ?window.phase(), "Window mounted");
        window
    }

    // -- accessors ----------------------------------------------------------

    pub fn modal_id(&self) -> &ModalId {
        self.shared.drafts.modal_id()
    }

    pub fn kind(&self) -> EntityKind {
        self.shared.drafts.kind()
    }

    pub fn mode(&self) -> ModalMode {
        self.shared.drafts.mode()
    }

    pub fn phase(&self) -> WindowPhase {
        self.state.phase()
    }

    pub fn state(&self) -> &WindowState {
        &self.state
    }

    pub fn is_minimized(&self) -> bool {
        self.state.is_minimized()
    }

    pub fn is_maximized(&self) -> bool {
        self.state.is_maximized()
    }

    pub fn position(&self) -> Position {
        self.state.position()
    }

    pub fn last_saved_at(&self) -> Option<Timestamp> {
        *self.shared.last_saved_at()
    }

    pub fn autosave_active(&self) -> bool {
        self.autosave.is_some()
    }

    // -- working payload ------------------------------------------------------

    /// Snapshot of the form's current values.
    pub fn payload(&self) -> Payload {
        self.shared.working().payload.clone()
    }

    /// Set one field, as the hosted form does on every keystroke.
    pub fn set_field(&self, name: impl Into<String>, value: serde_json::Value) {
        self.shared.working().payload.insert(name.into(), value);
    }

    /// Replace the working payload with a newly selected draft or record.
    ///
    /// An empty payload is ignored so it never clobbers in-progress edits.
    /// Returns whether the payload was replaced.
    pub fn set_initial_draft(&self, payload: Payload) -> bool {
        if payload.is_empty() {
            return false;
        }
        self.shared.working().payload = payload;
        true
    }

    // -- lifecycle ------------------------------------------------------------

    /// Minimize and immediately persist the working payload.
    pub fn minimize(&mut self) -> Result<DraftRecord, WindowError> {
        self.state.minimize()?;
        self.sync_autosave();
        let record = self.shared.save_now();
        self.shared.listener.on_minimize(self.modal_id(), self.kind());
        tracing::debug!(modal_id = %self.modal_id(), "Window minimized");
        Ok(record)
    }

    pub fn restore(&mut self) -> Result<(), WindowError> {
        self.state.restore()?;
        self.sync_autosave();
        self.shared.listener.on_restore(self.modal_id(), self.kind());
        tracing::debug!(modal_id = %self.modal_id(), "Window restored");
        Ok(())
    }

    /// Visual only; no persistence side effect.
    pub fn toggle_maximize(&mut self) -> Result<bool, WindowError> {
        self.state.toggle_maximize()
    }

    /// Re-derive visibility from the host's `minimized` prop without
    /// firing callbacks or saving.
    pub fn sync_minimized(&mut self, minimized: bool) {
        if self.state.sync_visibility(minimized) {
            self.sync_autosave();
        }
    }

    /// Explicit "Save Draft": always writes, regardless of timer state.
    pub fn save_draft_now(&self) -> DraftRecord {
        self.shared.save_now()
    }

    /// Close and unmount.
    ///
    /// A create-mode window discards its draft: closing an unsubmitted create
    /// flow is an explicit discard. Edit-mode drafts are left in place.
    pub fn close(self) {
        let discard = !self.mode().is_edit();
        self.shutdown(discard);
    }

    /// Close after a successful submit: the draft goes in either mode.
    pub(crate) fn close_published(self) {
        self.shutdown(true);
    }

    fn shutdown(mut self, discard_draft: bool) {
        self.autosave = None;
        self.shared.close(discard_draft);
        self.shared.listener.on_close(self.modal_id(), self.kind());
        tracing::debug!(modal_id = %self.modal_id(), mode = ?self.mode(), "Window closed");
    }

    // -- dragging -------------------------------------------------------------

    pub fn pointer_down(&mut self, pointer: Position) -> Result<(), WindowError> {
        self.state.begin_drag(pointer)
    }

    pub fn pointer_move(&mut self, pointer: Position) -> bool {
        self.state.drag_to(pointer)
    }

    pub fn pointer_up(&mut self) {
        self.state.end_drag();
    }

    /// Whether the host should route document-level pointer events here.
    pub fn wants_pointer_events(&self) -> bool {
        self.state.wants_pointer_events()
    }

    // -- internals ------------------------------------------------------------

    /// Run the timer exactly while the window is open.
    fn sync_autosave(&mut self) {
        let should_run = !self.state.is_minimized();
        match (should_run, self.autosave.is_some()) {
            (true, false) => {
                let shared = Arc::clone(&self.shared);
                self.autosave = AutosaveTimer::start(self.autosave_interval, move || {
                    shared.autosave();
                });
            }
            (false, true) => self.autosave = None,
            _ => {}
        }
    }
}

impl Drop for FloatingWindow {
    /// Unmounting keeps the draft but stops any pending autosave from
    /// writing it.
    fn drop(&mut self) {
        self.autosave = None;
        self.shared.close(false);
    }
}

impl std::fmt::Debug for FloatingWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FloatingWindow")
            .field("modal_id", self.modal_id())
            .field("kind", &self.kind())
            .field("mode", &self.mode())
            .field("state", &self.state)
            .field("autosave", &self.autosave.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use cms_drafts::MemoryStore;
    use cms_events::NoopListener;
    use serde_json::json;

    const PERIOD: Duration = Duration::from_secs(30);

    fn store() -> DraftStore {
        DraftStore::new(Arc::new(MemoryStore::new()))
    }

    fn binding(store: &DraftStore, mode: ModalMode) -> DraftBinding {
        DraftBinding::new(store.clone(), ModalId::new("w1"), EntityKind::News, mode)
    }

    fn payload(v: serde_json::Value) -> Payload {
        v.as_object().cloned().unwrap()
    }

    fn mount(store: &DraftStore, mode: ModalMode, minimized: bool) -> FloatingWindow {
        FloatingWindow::mount(
            WindowOptions::new(Payload::new(), PERIOD).minimized(minimized),
            binding(store, mode),
            Arc::new(NoopListener),
        )
    }

    async fn settle() {
        for _ in 0..5 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test]
    async fn minimize_saves_working_payload() {
        let drafts = store();
        let mut w = mount(&drafts, ModalMode::Create, false);
        w.set_field("title", json!({"en": "Draft title", "per": "", "ps": ""}));

        let record = w.minimize().unwrap();
        assert_eq!(w.phase(), WindowPhase::Minimized);
        assert_eq!(w.last_saved_at(), Some(record.saved_at));

        let loaded = drafts.load_draft(&ModalId::new("w1"), EntityKind::News).unwrap();
        assert_eq!(loaded.payload["title"]["en"], json!("Draft title"));
    }

    #[tokio::test]
    async fn autosave_runs_only_while_open() {
        let drafts = store();
        let mut w = mount(&drafts, ModalMode::Create, false);
        assert!(w.autosave_active());

        w.minimize().unwrap();
        assert!(!w.autosave_active());

        w.restore().unwrap();
        assert!(w.autosave_active());

        let minimized = mount(&drafts, ModalMode::Edit, true);
        assert!(!minimized.autosave_active());
    }

    #[tokio::test(start_paused = true)]
    async fn autosave_tick_persists_current_edits() {
        let drafts = store();
        let w = mount(&drafts, ModalMode::Create, false);
        w.set_field("title", json!({"en": "typed", "per": "", "ps": ""}));
        assert!(drafts.load_draft(w.modal_id(), EntityKind::News).is_none());

        tokio::time::advance(PERIOD).await;
        settle().await;

        let loaded = drafts.load_draft(w.modal_id(), EntityKind::News).unwrap();
        assert_eq!(loaded.payload["title"]["en"], json!("typed"));
        assert!(w.last_saved_at().is_some());
    }

    #[tokio::test]
    async fn create_mode_mount_resumes_existing_draft() {
        let drafts = store();
        drafts.save_draft(
            &ModalId::new("w1"),
            &payload(json!({"title": {"en": "resumed"}})),
            false,
            EntityKind::News,
        );

        let w = FloatingWindow::mount(
            WindowOptions::new(payload(json!({"status": "draft"})), PERIOD),
            binding(&drafts, ModalMode::Create),
            Arc::new(NoopListener),
        );
        let p = w.payload();
        assert_eq!(p["title"]["en"], json!("resumed"));
        assert_eq!(p["status"], json!("draft"));
        assert!(w.last_saved_at().is_some());
    }

    #[tokio::test]
    async fn edit_mode_mount_ignores_draft() {
        let drafts = store();
        drafts.save_draft(
            &ModalId::new("w1"),
            &payload(json!({"title": {"en": "stale"}})),
            true,
            EntityKind::News,
        );
        let w = FloatingWindow::mount(
            WindowOptions::new(payload(json!({"title": {"en": "server"}})), PERIOD),
            binding(&drafts, ModalMode::Edit),
            Arc::new(NoopListener),
        );
        assert_eq!(w.payload()["title"]["en"], json!("server"));
        assert!(w.last_saved_at().is_none());
    }

    #[tokio::test]
    async fn close_discards_create_draft_only() {
        let drafts = store();
        let id = ModalId::new("w1");

        let w = mount(&drafts, ModalMode::Create, false);
        w.save_draft_now();
        w.close();
        assert!(drafts.load_draft(&id, EntityKind::News).is_none());

        let w = mount(&drafts, ModalMode::Edit, false);
        w.save_draft_now();
        w.close();
        assert!(drafts.load_draft(&id, EntityKind::News).is_some());
    }

    #[tokio::test]
    async fn empty_initial_draft_does_not_clobber() {
        let drafts = store();
        let w = mount(&drafts, ModalMode::Create, false);
        w.set_field("author", json!("Nadia"));

        assert!(!w.set_initial_draft(Payload::new()));
        assert_eq!(w.payload()["author"], json!("Nadia"));

        assert!(w.set_initial_draft(payload(json!({"author": "Farid"}))));
        assert_eq!(w.payload(), payload(json!({"author": "Farid"})));
    }

    #[tokio::test]
    async fn edits_survive_minimize_restore() {
        let drafts = store();
        let mut w = mount(&drafts, ModalMode::Create, false);
        w.set_field("category", json!("health"));
        w.minimize().unwrap();
        w.restore().unwrap();
        assert_eq!(w.payload()["category"], json!("health"));
    }

    #[tokio::test]
    async fn maximize_has_no_persistence_side_effect() {
        let drafts = store();
        let mut w = mount(&drafts, ModalMode::Create, false);
        assert!(w.toggle_maximize().unwrap());
        assert!(drafts.load_draft(w.modal_id(), EntityKind::News).is_none());
        assert_matches!(w.pointer_down(Position::default()), Err(WindowError::Maximized));
    }

    #[tokio::test]
    async fn sync_minimized_reopens_without_saving() {
        let drafts = store();
        let mut w = mount(&drafts, ModalMode::Create, true);
        w.sync_minimized(false);
        assert_eq!(w.phase(), WindowPhase::OpenNormal);
        assert!(w.autosave_active());
        assert!(drafts.load_draft(w.modal_id(), EntityKind::News).is_none());
    }

    /// Memory store whose writes take as long as a slow disk flush.
    struct SlowStore {
        inner: MemoryStore,
        write_delay: Duration,
    }

    impl cms_drafts::KeyValueStore for SlowStore {
        fn get_item(&self, key: &str) -> Result<Option<String>, cms_drafts::StoreError> {
            self.inner.get_item(key)
        }

        fn set_item(&self, key: &str, value: &str) -> Result<(), cms_drafts::StoreError> {
            std::thread::sleep(self.write_delay);
            self.inner.set_item(key, value)
        }

        fn remove_item(&self, key: &str) -> Result<(), cms_drafts::StoreError> {
            self.inner.remove_item(key)
        }

        fn keys(&self) -> Result<Vec<String>, cms_drafts::StoreError> {
            self.inner.keys()
        }
    }

    fn slow_store() -> DraftStore {
        DraftStore::new(Arc::new(SlowStore {
            inner: MemoryStore::new(),
            write_delay: Duration::from_millis(50),
        }))
    }

    fn mount_fast(store: &DraftStore, mode: ModalMode) -> FloatingWindow {
        FloatingWindow::mount(
            WindowOptions::new(Payload::new(), Duration::from_millis(20)),
            binding(store, mode),
            Arc::new(NoopListener),
        )
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn create_close_during_inflight_autosave_leaves_no_draft() {
        let drafts = slow_store();
        let w = mount_fast(&drafts, ModalMode::Create);
        w.set_field("author", json!("Nadia"));

        // First tick fires at 20ms and is still writing at 35ms.
        tokio::time::sleep(Duration::from_millis(35)).await;
        w.close();
        assert!(drafts.load_draft(&ModalId::new("w1"), EntityKind::News).is_none());

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(drafts.load_draft(&ModalId::new("w1"), EntityKind::News).is_none());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn published_edit_window_leaves_no_draft() {
        let drafts = slow_store();
        let w = mount_fast(&drafts, ModalMode::Edit);

        tokio::time::sleep(Duration::from_millis(35)).await;
        w.close_published();

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(drafts.load_draft(&ModalId::new("w1"), EntityKind::News).is_none());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn unmount_stops_autosave_writes() {
        let drafts = slow_store();
        let w = mount_fast(&drafts, ModalMode::Edit);
        tokio::time::sleep(Duration::from_millis(35)).await;
        drop(w);

        // The in-flight write may land; nothing after it does.
        tokio::time::sleep(Duration::from_millis(60)).await;
        let settled = drafts.load_draft(&ModalId::new("w1"), EntityKind::News);
        drafts.delete_draft(&ModalId::new("w1"), EntityKind::News);
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(drafts.load_draft(&ModalId::new("w1"), EntityKind::News).is_none());
        assert!(settled.is_some());
    }

    #[tokio::test]
    async fn resumed_draft_is_sanitized() {
        let drafts = store();
        drafts.save_draft(
            &ModalId::new("w1"),
            &payload(json!({"title": "plain string", "status": 7, "junk": true})),
            false,
            EntityKind::News,
        );
        let w = mount(&drafts, ModalMode::Create, false);
        let p = w.payload();
        assert_eq!(p["title"], json!({"en": "", "per": "", "ps": ""}));
        assert_eq!(p["status"], json!("draft"));
        assert!(!p.contains_key("junk"));
    }

    #[tokio::test]
    async fn resume_can_be_disabled() {
        let drafts = store();
        drafts.save_draft(
            &ModalId::new("w1"),
            &payload(json!({"title": {"en": "draft"}})),
            false,
            EntityKind::News,
        );
        let w = FloatingWindow::mount(
            WindowOptions::new(payload(json!({"title": {"en": "explicit"}})), PERIOD)
                .resume_draft(false),
            binding(&drafts, ModalMode::Create),
            Arc::new(NoopListener),
        );
        assert_eq!(w.payload()["title"]["en"], json!("explicit"));
        assert!(w.last_saved_at().is_none());
    }

    #[test]
    fn mount_outside_runtime_skips_autosave() {
        let drafts = store();
        let w = mount(&drafts, ModalMode::Create, false);
        assert!(!w.autosave_active());
        assert_eq!(w.phase(), WindowPhase::OpenNormal);
    }
}
