//! Field layouts for every content type.

use super::{EntitySchema, FieldDef, FieldType, DEFAULT_STATUS, PUBLISH_STATUSES};
use crate::entity_kind::EntityKind;

const fn ml(name: &'static str) -> FieldDef {
    FieldDef {
        name,
        field_type: FieldType::Multilingual,
    }
}

const fn text(name: &'static str) -> FieldDef {
    FieldDef {
        name,
        field_type: FieldType::Text { default: "" },
    }
}

const fn text_or(name: &'static str, default: &'static str) -> FieldDef {
    FieldDef {
        name,
        field_type: FieldType::Text { default },
    }
}

const fn date(name: &'static str) -> FieldDef {
    FieldDef {
        name,
        field_type: FieldType::Date,
    }
}

const fn flag(name: &'static str) -> FieldDef {
    FieldDef {
        name,
        field_type: FieldType::Flag { default: false },
    }
}

const fn number(name: &'static str) -> FieldDef {
    FieldDef {
        name,
        field_type: FieldType::Number { default: 0.0 },
    }
}

const fn list(name: &'static str) -> FieldDef {
    FieldDef {
        name,
        field_type: FieldType::TextList,
    }
}

const fn status(allowed: &'static [&'static str]) -> FieldDef {
    FieldDef {
        name: "status",
        field_type: FieldType::Status {
            default: DEFAULT_STATUS,
            allowed,
        },
    }
}

/// RFQs and job postings move through an application window.
const OPENING_STATUSES: &[&str] = &["draft", "open", "closed", "awarded", "archived"];

const NEWS: &[FieldDef] = &[
    ml("title"),
    ml("summary"),
    ml("content"),
    text("category"),
    text("author"),
    list("tags"),
    text("image"),
    date("publishedAt"),
    flag("featured"),
    status(PUBLISH_STATUSES),
];

const EVENTS: &[FieldDef] = &[
    ml("title"),
    ml("description"),
    ml("location"),
    date("startDate"),
    date("endDate"),
    text("registrationUrl"),
    text("image"),
    number("capacity"),
    flag("featured"),
    status(PUBLISH_STATUSES),
];

const PROGRAMS: &[FieldDef] = &[
    ml("title"),
    ml("description"),
    ml("objectives"),
    date("startDate"),
    date("endDate"),
    number("budget"),
    list("donors"),
    list("provinces"),
    text("image"),
    status(PUBLISH_STATUSES),
];

const PARTNERS: &[FieldDef] = &[
    ml("name"),
    ml("description"),
    text("website"),
    text("logo"),
    text_or("partnershipType", "implementing"),
    status(PUBLISH_STATUSES),
];

const STAKEHOLDERS: &[FieldDef] = &[
    ml("name"),
    ml("role"),
    ml("organization"),
    ml("description"),
    text("email"),
    text("photo"),
    status(PUBLISH_STATUSES),
];

const POLICIES: &[FieldDef] = &[
    ml("title"),
    ml("summary"),
    ml("content"),
    text("documentUrl"),
    date("effectiveDate"),
    text_or("version", "1.0"),
    status(PUBLISH_STATUSES),
];

const RFQS: &[FieldDef] = &[
    ml("title"),
    ml("description"),
    text("referenceNumber"),
    date("deadline"),
    text("documentUrl"),
    number("budget"),
    status(OPENING_STATUSES),
];

const SUCCESS_STORIES: &[FieldDef] = &[
    ml("title"),
    ml("summary"),
    ml("content"),
    ml("beneficiary"),
    ml("location"),
    text("image"),
    flag("featured"),
    status(PUBLISH_STATUSES),
];

const RESOURCES: &[FieldDef] = &[
    ml("title"),
    ml("description"),
    text("fileUrl"),
    text_or("resourceType", "document"),
    list("tags"),
    status(PUBLISH_STATUSES),
];

const JOBS: &[FieldDef] = &[
    ml("title"),
    ml("description"),
    ml("requirements"),
    ml("location"),
    date("deadline"),
    text_or("employmentType", "full-time"),
    status(OPENING_STATUSES),
];

const TEAM: &[FieldDef] = &[
    ml("name"),
    ml("position"),
    ml("bio"),
    text("email"),
    text("photo"),
    number("order"),
    status(PUBLISH_STATUSES),
];

const GALLERY: &[FieldDef] = &[
    ml("title"),
    ml("description"),
    list("images"),
    text("album"),
    status(PUBLISH_STATUSES),
];

const REPORTS: &[FieldDef] = &[
    ml("title"),
    ml("summary"),
    text("fileUrl"),
    number("year"),
    text_or("reportType", "annual"),
    status(PUBLISH_STATUSES),
];

const ANNOUNCEMENTS: &[FieldDef] = &[
    ml("title"),
    ml("content"),
    text_or("priority", "normal"),
    date("expiresAt"),
    flag("pinned"),
    status(PUBLISH_STATUSES),
];

const FAQS: &[FieldDef] = &[
    ml("question"),
    ml("answer"),
    text("category"),
    number("order"),
    status(PUBLISH_STATUSES),
];

/// Schema registered for `kind`.
pub fn schema_for(kind: EntityKind) -> EntitySchema {
    let fields = match kind {
        EntityKind::News => NEWS,
        EntityKind::Events => EVENTS,
        EntityKind::Programs => PROGRAMS,
        EntityKind::Partners => PARTNERS,
        EntityKind::Stakeholders => STAKEHOLDERS,
        EntityKind::Policies => POLICIES,
        EntityKind::Rfqs => RFQS,
        EntityKind::SuccessStories => SUCCESS_STORIES,
        EntityKind::Resources => RESOURCES,
        EntityKind::Jobs => JOBS,
        EntityKind::Team => TEAM,
        EntityKind::Gallery => GALLERY,
        EntityKind::Reports => REPORTS,
        EntityKind::Announcements => ANNOUNCEMENTS,
        EntityKind::Faqs => FAQS,
    };
    EntitySchema { kind, fields }
}
