//! Working payload resolution for an opening modal.
//!
//! A modal can be seeded from three places. Precedence, highest first:
//!
//! 1. the entity data the caller passed in explicitly,
//! 2. the controller's cached sanitized copy from a previous refresh,
//! 3. the sanitized payload of a persisted draft.
//!
//! All inputs are expected to be sanitized already.

use crate::types::Payload;

/// Which source [`resolve_initial_payload`] picked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadSource {
    Explicit,
    Cached,
    Draft,
    Empty,
}

/// Pick the initial working payload by precedence.
pub fn resolve_initial_payload(
    explicit: Option<&Payload>,
    cached: Option<&Payload>,
    draft: Option<&Payload>,
) -> (Payload, PayloadSource) {
    if let Some(p) = explicit {
        return (p.clone(), PayloadSource::Explicit);
    }
    if let Some(p) = cached {
        return (p.clone(), PayloadSource::Cached);
    }
    if let Some(p) = draft {
        return (p.clone(), PayloadSource::Draft);
    }
    (Payload::new(), PayloadSource::Empty)
}

/// Overlay `incoming` on `working`, key by key.
///
/// An empty `incoming` leaves `working` untouched so that a blank draft
/// never clobbers in-progress edits. Returns whether anything was applied.
pub fn overlay(working: &mut Payload, incoming: &Payload) -> bool {
    if incoming.is_empty() {
        return false;
    }
    for (key, value) in incoming {
        working.insert(key.clone(), value.clone());
    }
    true
}
