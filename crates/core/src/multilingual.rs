//! English / Dari / Pashto text triples.

use serde::{Deserialize, Serialize};

/// A text value in the three site languages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Multilingual {
    #[serde(default)]
    pub en: String,
    #[serde(default)]
    pub per: String,
    #[serde(default)]
    pub ps: String,
}

impl Multilingual {
    pub fn new(en: impl Into<String>, per: impl Into<String>, ps: impl Into<String>) -> Self {
        Self {
            en: en.into(),
            per: per.into(),
            ps: ps.into(),
        }
    }

    /// Coerce an arbitrary JSON value into a triple.
    ///
    /// Objects keep their string members; missing or non-string members
    /// become empty. Any other value (including a bare string) yields the
    /// empty triple.
    pub fn coerce(value: &serde_json::Value) -> Self {
        let Some(obj) = value.as_object() else {
            return Self::default();
        };
        let lang = |key: &str| {
            obj.get(key)
                .and_then(serde_json::Value::as_str)
                .unwrap_or_default()
                .to_string()
        };
        Self {
            en: lang("en"),
            per: lang("per"),
            ps: lang("ps"),
        }
    }

    /// First non-blank variant in the order en, per, ps.
    pub fn first_non_empty(&self) -> Option<&str> {
        [&self.en, &self.per, &self.ps]
            .into_iter()
            .map(String::as_str)
            .find(|s| !s.trim().is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.first_non_empty().is_none()
    }

    pub fn to_value(&self) -> serde_json::Value {
        serde_json::json!({ "en": self.en, "per": self.per, "ps": self.ps })
    }
}
