//! Snapshot-file store.
//!
//! Serves a collection from a local JSON file. Two layouts are accepted:
//!
//! ```json
//! [ { "id": "1", "title": "Chat Bot", "category": "Productivity", "tags": ["ai"] } ]
//! ```
//!
//! ```json
//! { "1": { "title": "Chat Bot", "category": "Productivity", "tags": ["ai"] } }
//! ```
//!
//! The file is the whole data source for its collection: it is re-read on
//! every [`fetch_all`](RecordStore::fetch_all) and nothing is cached.
//! Use the array layout when record order matters; the map layout comes
//! back ordered by id.

use async_trait::async_trait;
use gallery_core::error::StoreUnavailable;
use gallery_core::models::RawDocument;
use gallery_core::store::RecordStore;
use serde_json::Value;
use std::path::{Path, PathBuf};

pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl RecordStore for FileStore {
    async fn fetch_all(&self, collection: &str) -> Result<Vec<RawDocument>, StoreUnavailable> {
        let content = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            StoreUnavailable::new(
                collection,
                format!("cannot read {}: {}", self.path.display(), e),
            )
        })?;
        parse_snapshot(&content).map_err(|reason| {
            StoreUnavailable::new(
                collection,
                format!("invalid snapshot {}: {}", self.path.display(), reason),
            )
        })
    }

    fn describe(&self) -> String {
        format!("file:{}", self.path.display())
    }
}

/// Parse a snapshot in either accepted layout.
pub fn parse_snapshot(content: &str) -> Result<Vec<RawDocument>, String> {
    let value: Value = serde_json::from_str(content).map_err(|e| e.to_string())?;

    match value {
        Value::Array(items) => items
            .into_iter()
            .enumerate()
            .map(|(i, item)| match item {
                Value::Object(mut fields) => {
                    let id = match fields.remove("id") {
                        Some(Value::String(s)) if !s.is_empty() => s,
                        Some(Value::Number(n)) => n.to_string(),
                        _ => return Err(format!("entry {} has no string 'id'", i)),
                    };
                    Ok(RawDocument::new(id, fields))
                }
                _ => Err(format!("entry {} is not an object", i)),
            })
            .collect(),
        Value::Object(map) => map
            .into_iter()
            .map(|(id, fields)| match fields {
                Value::Object(fields) => Ok(RawDocument::new(id, fields)),
                _ => Err(format!("document '{}' is not an object", id)),
            })
            .collect(),
        _ => Err("expected a JSON array or object at the top level".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_array_layout() {
        let docs = parse_snapshot(
            r#"[{"id":"2","title":"B"},{"id":"1","title":"A","tags":["x"]}]"#,
        )
        .unwrap();
        let ids: Vec<&str> = docs.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["2", "1"]);
        assert!(!docs[0].fields.contains_key("id"));
        assert_eq!(docs[1].fields["tags"], json!(["x"]));
    }

    #[test]
    fn test_parse_map_layout() {
        let docs = parse_snapshot(r#"{"a":{"title":"A"},"b":{"title":"B"}}"#).unwrap();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].id, "a");
    }

    #[test]
    fn test_numeric_id_accepted() {
        let docs = parse_snapshot(r#"[{"id":7,"title":"Seven"}]"#).unwrap();
        assert_eq!(docs[0].id, "7");
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse_snapshot("not json").is_err());
        assert!(parse_snapshot("42").is_err());
        assert!(parse_snapshot(r#"[{"title":"no id"}]"#)
            .unwrap_err()
            .contains("entry 0"));
        assert!(parse_snapshot(r#"{"a": 1}"#).unwrap_err().contains("'a'"));
    }

    #[tokio::test]
    async fn test_missing_file_is_unavailable() {
        let store = FileStore::new("/definitely/not/here.json");
        let err = store.fetch_all("apps").await.unwrap_err();
        assert_eq!(err.collection, "apps");
        assert!(err.reason.contains("cannot read"));
    }

    #[tokio::test]
    async fn test_reads_file() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("apps.json");
        std::fs::write(&path, r#"[{"id":"1","title":"A"}]"#).unwrap();
        let docs = FileStore::new(&path).fetch_all("apps").await.unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].fields["title"], json!("A"));
    }
}
