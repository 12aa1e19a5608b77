//! Draft-backed floating modal windows for the admin panel.
//!
//! - [`state`]: the per-window visibility/maximize/drag state machine.
//! - [`autosave`]: the fixed-interval background draft writer.
//! - [`window`]: [`FloatingWindow`], one draggable, minimizable window
//!   bound to a draft slot.
//! - [`controller`]: [`EntityModalController`], which binds a window to a
//!   content type's schema and to the page's persistence call.
//! - [`tray`]: [`ModalTray`], the page-level view over minimized windows
//!   and orphaned drafts.

pub mod autosave;
pub mod controller;
pub mod error;
pub mod state;
pub mod tray;
pub mod window;

pub use controller::{Attachment, ControllerPhase, EntityModalController, EntitySaver, ModalProps};
pub use error::{SubmitError, WindowError};
pub use state::{Position, Visibility, WindowPhase, WindowState};
pub use tray::ModalTray;
pub use window::{DraftBinding, FloatingWindow, WindowOptions};
