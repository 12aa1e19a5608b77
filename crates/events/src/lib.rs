//! Modal lifecycle events.
//!
//! - [`EventBus`]: in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`.
//! - [`ModalEvent`]: the lifecycle event envelope.
//! - [`WindowListener`]: synchronous lifecycle callbacks a window fires
//!   into its host page.
//! - [`BusListener`]: a [`WindowListener`] that republishes every callback
//!   on an [`EventBus`].

pub mod bus;
pub mod listener;

pub use bus::{EventBus, ModalEvent, ModalEventKind};
pub use listener::{BusListener, NoopListener, WindowListener};
