//! Crash-recoverable draft persistence.
//!
//! - [`KeyValueStore`]: the durable key/value capability drafts live in,
//!   with an in-memory backend ([`MemoryStore`]) and a JSON file backend
//!   ([`FileStore`]).
//! - [`DraftStore`]: namespaced, best-effort CRUD over [`DraftRecord`]s.
//! - [`DraftSummary`]: listing projection for the modal tray.
//! - [`InstanceRegistry`]: a page's persisted modal instance descriptors.

pub mod file_store;
pub mod instances;
pub mod kv;
pub mod record;
pub mod store;
pub mod summary;

pub use file_store::FileStore;
pub use instances::{InstanceRegistry, ModalInstanceDescriptor};
pub use kv::{KeyValueStore, MemoryStore, StoreError};
pub use record::DraftRecord;
pub use store::DraftStore;
pub use summary::DraftSummary;
