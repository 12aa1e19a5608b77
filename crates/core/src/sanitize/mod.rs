//! Entity payload sanitizer.
//!
//! Each content type declares its fields as a static [`EntitySchema`].
//! [`sanitize`] coerces raw JSON into that shape: every declared field is
//! present with the declared type (or its default) and undeclared fields are
//! dropped. The sanitizer never fails on an object; malformed values are
//! replaced by their empty-safe default.

pub mod schemas;

use serde::Serialize;

use crate::entity_kind::EntityKind;
use crate::multilingual::Multilingual;
use crate::types::{server_id, Payload, SERVER_ID_FIELD};

pub use schemas::schema_for;

/// Status values shared by most content types.
pub const PUBLISH_STATUSES: &[&str] = &["draft", "published", "archived"];

/// Default status of a freshly created entity.
pub const DEFAULT_STATUS: &str = "draft";

// ---------------------------------------------------------------------------
// Schema types
// ---------------------------------------------------------------------------

/// The declared type of one entity field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldType {
    /// `{en, per, ps}` triple; default is the empty triple.
    Multilingual,
    /// Plain string.
    Text { default: &'static str },
    /// Boolean flag.
    Flag { default: bool },
    /// JSON number.
    Number { default: f64 },
    /// Array of strings; non-string items are dropped.
    TextList,
    /// Date or datetime string as entered in the form; default `""`.
    Date,
    /// String restricted to `allowed`; anything else becomes `default`.
    Status {
        default: &'static str,
        allowed: &'static [&'static str],
    },
}

/// Definition of a single entity field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FieldDef {
    /// JSON key in the payload.
    pub name: &'static str,
    pub field_type: FieldType,
}

/// Field layout of one content type.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct EntitySchema {
    pub kind: EntityKind,
    pub fields: &'static [FieldDef],
}

impl EntitySchema {
    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }
}

// ---------------------------------------------------------------------------
// Coercion
// ---------------------------------------------------------------------------

impl FieldType {
    /// Coerce a raw value (absent when `None`) to this type.
    pub fn coerce(&self, raw: Option<&serde_json::Value>) -> serde_json::Value {
        use serde_json::Value;

        match *self {
            FieldType::Multilingual => raw
                .map(Multilingual::coerce)
                .unwrap_or_default()
                .to_value(),
            FieldType::Text { default } => match raw {
                Some(Value::String(s)) => Value::String(s.clone()),
                _ => Value::String(default.to_string()),
            },
            FieldType::Date => match raw {
                Some(Value::String(s)) => Value::String(s.clone()),
                _ => Value::String(String::new()),
            },
            FieldType::Flag { default } => match raw {
                Some(Value::Bool(b)) => Value::Bool(*b),
                _ => Value::Bool(default),
            },
            FieldType::Number { default } => match raw {
                Some(Value::Number(n)) => Value::Number(n.clone()),
                _ => serde_json::Number::from_f64(default)
                    .map(Value::Number)
                    .unwrap_or(Value::Null),
            },
            FieldType::TextList => match raw {
                Some(Value::Array(items)) => Value::Array(
                    items
                        .iter()
                        .filter(|item| item.is_string())
                        .cloned()
                        .collect(),
                ),
                _ => Value::Array(Vec::new()),
            },
            FieldType::Status { default, allowed } => match raw {
                Some(Value::String(s)) if allowed.contains(&s.as_str()) => {
                    Value::String(s.clone())
                }
                _ => Value::String(default.to_string()),
            },
        }
    }

    /// The value a field takes when nothing usable was supplied.
    pub fn default_value(&self) -> serde_json::Value {
        self.coerce(None)
    }
}

/// Sanitize a raw entity value against `schema`.
///
/// Returns `None` for non-object input. Otherwise every declared field is
/// present with its declared type, a non-empty `_id` is carried over, and
/// every other key is dropped.
pub fn sanitize(schema: &EntitySchema, raw: &serde_json::Value) -> Option<Payload> {
    let obj = raw.as_object()?;

    let mut out = Payload::new();
    if let Some(id) = server_id(obj) {
        out.insert(
            SERVER_ID_FIELD.to_string(),
            serde_json::Value::String(id.to_string()),
        );
    }
    for field in schema.fields {
        out.insert(
            field.name.to_string(),
            field.field_type.coerce(obj.get(field.name)),
        );
    }
    Some(out)
}

/// Sanitize against the schema registered for `kind`.
pub fn sanitize_kind(kind: EntityKind, raw: &serde_json::Value) -> Option<Payload> {
    sanitize(&schema_for(kind), raw)
}

/// A payload with every field of `kind` at its default.
pub fn empty_payload(kind: EntityKind) -> Payload {
    schema_for(kind)
        .fields
        .iter()
        .map(|f| (f.name.to_string(), f.field_type.default_value()))
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
