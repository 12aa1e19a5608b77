use serde::Serialize;

use cms_core::config::DraftConfig;
use cms_core::multilingual::Multilingual;
use cms_core::types::{ModalId, Payload};

use crate::record::DraftRecord;

/// Fields tried, in order, for a draft's display title.
const TITLE_FIELDS: &[&str] = &["title", "name", "question"];

/// Fields tried, in order, for a draft's display summary.
const SUMMARY_FIELDS: &[&str] = &["summary", "description", "content", "answer", "bio"];

/// Title shown for a draft without any heading text.
pub const UNTITLED: &str = "Untitled";

/// Marker appended to truncated text.
pub const ELLIPSIS: &str = "...";

/// Listing row for one draft in the modal tray.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftSummary {
    pub title: String,
    pub summary: String,
    /// `YYYY-MM-DD` of the last save (UTC).
    pub date: String,
    /// `HH:MM` of the last save (UTC).
    pub time: String,
    pub is_edit: bool,
    pub modal_id: ModalId,
}

impl DraftSummary {
    pub fn from_record(record: &DraftRecord, config: &DraftConfig) -> Self {
        let title = first_text(&record.payload, TITLE_FIELDS)
            .map(|t| truncate(&t, config.title_max_chars))
            .unwrap_or_else(|| UNTITLED.to_string());
        let summary = first_text(&record.payload, SUMMARY_FIELDS)
            .map(|s| truncate(&s, config.summary_max_chars))
            .unwrap_or_default();

        Self {
            title,
            summary,
            date: record.saved_at.format("%Y-%m-%d").to_string(),
            time: record.saved_at.format("%H:%M").to_string(),
            is_edit: record.is_edit,
            modal_id: record.modal_id.clone(),
        }
    }
}

/// First non-blank text among `fields`.
///
/// Multilingual objects contribute their first non-empty language; plain
/// strings count as a single variant.
fn first_text(payload: &Payload, fields: &[&str]) -> Option<String> {
    fields.iter().find_map(|field| {
        let value = payload.get(*field)?;
        match value {
            serde_json::Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
            serde_json::Value::Object(_) => Multilingual::coerce(value)
                .first_non_empty()
                .map(str::to_string),
            _ => None,
        }
    })
}

/// Truncate to `max_chars` characters, appending [`ELLIPSIS`] when cut.
pub fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max_chars).collect();
    out.push_str(ELLIPSIS);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use cms_core::entity_kind::EntityKind;
    use serde_json::json;

    fn record(payload: serde_json::Value) -> DraftRecord {
        DraftRecord {
            modal_id: ModalId::new("m1"),
            namespace: EntityKind::News,
            payload: payload.as_object().cloned().unwrap(),
            saved_at: "2024-03-09T07:05:00Z".parse().unwrap(),
            is_edit: false,
        }
    }

    #[test]
    fn picks_first_non_empty_language() {
        let r = record(json!({
            "title": {"en": "", "per": "خبر", "ps": "خبر"},
            "summary": {"en": "", "per": "", "ps": "لنډيز"},
        }));
        let s = DraftSummary::from_record(&r, &DraftConfig::default());
        assert_eq!(s.title, "خبر");
        assert_eq!(s.summary, "لنډيز");
        assert_eq!(s.date, "2024-03-09");
        assert_eq!(s.time, "07:05");
        assert!(!s.is_edit);
        assert_eq!(s.modal_id, ModalId::new("m1"));
    }

    #[test]
    fn falls_back_through_field_list() {
        let r = record(json!({
            "title": {"en": "", "per": "", "ps": ""},
            "name": {"en": "Partner Org"},
            "description": "plain description",
        }));
        let s = DraftSummary::from_record(&r, &DraftConfig::default());
        assert_eq!(s.title, "Partner Org");
        assert_eq!(s.summary, "plain description");
    }

    #[test]
    fn empty_payload_is_untitled() {
        let s = DraftSummary::from_record(&record(json!({})), &DraftConfig::default());
        assert_eq!(s.title, UNTITLED);
        assert_eq!(s.summary, "");
    }

    #[test]
    fn title_and_summary_truncate_at_limits() {
        let r = record(json!({
            "title": {"en": "t".repeat(60)},
            "summary": {"en": "s".repeat(100)},
        }));
        let s = DraftSummary::from_record(&r, &DraftConfig::default());
        assert_eq!(s.title, format!("{}...", "t".repeat(50)));
        // Exactly at the limit is not truncated.
        assert_eq!(s.summary, "s".repeat(100));
    }

    #[test]
    fn truncation_counts_characters_not_bytes() {
        let dari = "د".repeat(10);
        assert_eq!(truncate(&dari, 4), format!("{}...", "د".repeat(4)));
        assert_eq!(truncate("short", 10), "short");
    }

    #[test]
    fn custom_limits_apply() {
        let config = DraftConfig {
            title_max_chars: 3,
            ..DraftConfig::default()
        };
        let s = DraftSummary::from_record(&record(json!({"title": {"en": "Hello"}})), &config);
        assert_eq!(s.title, "Hel...");
    }
}
