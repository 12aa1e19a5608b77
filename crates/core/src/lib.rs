//! Domain building blocks shared by the draft and modal crates.
//!
//! Everything in this crate is pure, in-memory logic with no storage or
//! runtime dependencies:
//!
//! - [`entity_kind`]: the closed set of content types and their storage keys.
//! - [`multilingual`]: `{en, per, ps}` text triples.
//! - [`sanitize`]: per-kind field schemas and the total sanitizer.
//! - [`payload`]: initial payload precedence for an opening modal.
//! - [`config`]: draft tuning knobs (autosave interval, truncation).

pub mod config;
pub mod entity_kind;
pub mod error;
pub mod multilingual;
pub mod payload;
pub mod sanitize;
pub mod types;
