//! Content types managed through the admin panel and their storage keys.
//!
//! Each kind owns one draft namespace. Draft keys are `<namespace>-draft-<modal id>`
//! and the page-level instance list lives under `<namespace>-modal-instances`.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::ModalId;

/// Infix separating the namespace from the modal id in a draft key.
pub const DRAFT_KEY_INFIX: &str = "-draft-";

/// Suffix of the key holding a page's modal instance descriptors.
pub const INSTANCES_KEY_SUFFIX: &str = "-modal-instances";

/// A content type with its own form modal and draft namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EntityKind {
    News,
    Events,
    Programs,
    Partners,
    Stakeholders,
    Policies,
    Rfqs,
    SuccessStories,
    Resources,
    Jobs,
    Team,
    Gallery,
    Reports,
    Announcements,
    Faqs,
}

impl EntityKind {
    /// Every kind, in admin menu order.
    pub const ALL: [EntityKind; 15] = [
        Self::News,
        Self::Events,
        Self::Programs,
        Self::Partners,
        Self::Stakeholders,
        Self::Policies,
        Self::Rfqs,
        Self::SuccessStories,
        Self::Resources,
        Self::Jobs,
        Self::Team,
        Self::Gallery,
        Self::Reports,
        Self::Announcements,
        Self::Faqs,
    ];

    /// Draft namespace literal.
    pub fn namespace(self) -> &'static str {
        match self {
            Self::News => "news",
            Self::Events => "events",
            Self::Programs => "programs",
            Self::Partners => "partners",
            Self::Stakeholders => "stakeholders",
            Self::Policies => "policies",
            Self::Rfqs => "rfqs",
            Self::SuccessStories => "success-stories",
            Self::Resources => "resources",
            Self::Jobs => "jobs",
            Self::Team => "team",
            Self::Gallery => "gallery",
            Self::Reports => "reports",
            Self::Announcements => "announcements",
            Self::Faqs => "faqs",
        }
    }

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            Self::News => "News",
            Self::Events => "Events",
            Self::Programs => "Programs",
            Self::Partners => "Partners",
            Self::Stakeholders => "Stakeholders",
            Self::Policies => "Policies",
            Self::Rfqs => "RFQs",
            Self::SuccessStories => "Success Stories",
            Self::Resources => "Resources",
            Self::Jobs => "Jobs",
            Self::Team => "Team Members",
            Self::Gallery => "Gallery",
            Self::Reports => "Reports",
            Self::Announcements => "Announcements",
            Self::Faqs => "FAQs",
        }
    }

    /// Parse from a namespace literal.
    pub fn from_namespace(namespace: &str) -> Result<Self, CoreError> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.namespace() == namespace)
            .ok_or_else(|| {
                CoreError::Validation(format!("Unknown draft namespace '{namespace}'"))
            })
    }

    /// Key prefix shared by every draft of this kind.
    pub fn draft_prefix(self) -> String {
        format!("{}{DRAFT_KEY_INFIX}", self.namespace())
    }

    /// Storage key of one draft.
    pub fn draft_key(self, modal_id: &ModalId) -> String {
        format!("{}{modal_id}", self.draft_prefix())
    }

    /// Storage key of the page's modal instance descriptors.
    pub fn instances_key(self) -> String {
        format!("{}{INSTANCES_KEY_SUFFIX}", self.namespace())
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.namespace())
    }
}
