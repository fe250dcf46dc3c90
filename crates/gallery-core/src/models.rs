//! Core data models for App Gallery.
//!
//! A store returns [`RawDocument`]s (id plus an arbitrary field map). They
//! are decoded leniently into [`AppRecord`]s: whatever is missing renders
//! empty. [`validate_document`] reports the gaps when a caller cares.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::MalformedRecord;

/// Text fields every app document is expected to carry.
pub const TEXT_FIELDS: [&str; 4] = ["title", "description", "image", "category"];

/// A document as returned by a store: store-assigned id plus its fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawDocument {
    pub id: String,
    #[serde(default)]
    pub fields: Map<String, Value>,
}

impl RawDocument {
    pub fn new(id: impl Into<String>, fields: Map<String, Value>) -> Self {
        Self {
            id: id.into(),
            fields,
        }
    }
}

/// One app entry in the gallery.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AppRecord {
    pub id: String,
    pub title: String,
    pub description: String,
    /// URL of the preview asset.
    pub image: String,
    pub category: String,
    /// Kept in store order; duplicates are not removed.
    pub tags: Vec<String>,
}

impl AppRecord {
    /// Lenient decode: missing or non-string text fields become empty,
    /// a missing or non-array `tags` becomes empty, non-string tags are dropped.
    pub fn from_document(doc: &RawDocument) -> Self {
        let text = |key: &str| {
            doc.fields
                .get(key)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };

        let tags = doc
            .fields
            .get("tags")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Self {
            id: doc.id.clone(),
            title: text("title"),
            description: text("description"),
            image: text("image"),
            category: text("category"),
            tags,
        }
    }
}

/// Check a document against the app record shape.
///
/// Returns every problem found, not just the first.
pub fn validate_document(doc: &RawDocument) -> Result<(), MalformedRecord> {
    let mut problems = Vec::new();

    for key in TEXT_FIELDS {
        match doc.fields.get(key) {
            None | Some(Value::Null) => problems.push(format!("missing field '{}'", key)),
            Some(Value::String(_)) => {}
            Some(_) => problems.push(format!("'{}' is not a string", key)),
        }
    }

    match doc.fields.get("tags") {
        None | Some(Value::Null) => problems.push("missing field 'tags'".to_string()),
        Some(Value::Array(items)) => {
            let bad = items.iter().filter(|v| !v.is_string()).count();
            if bad > 0 {
                problems.push(format!("'tags' has {} non-string entries", bad));
            }
        }
        Some(_) => problems.push("'tags' is not an array".to_string()),
    }

    if problems.is_empty() {
        Ok(())
    } else {
        Err(MalformedRecord {
            id: doc.id.clone(),
            problems,
        })
    }
}
