//! Loading a collection into a [`Catalog`].
//!
//! The load path is: one [`RecordStore::fetch_all`] call, then decoding of
//! every document under a [`MalformedPolicy`], then facet derivation. The
//! resulting catalog is immutable; facets are computed here exactly once.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::{MalformedRecord, StoreUnavailable};
use crate::facets::Facets;
use crate::models::{validate_document, AppRecord, RawDocument};
use crate::store::RecordStore;

/// What to do with documents that do not match the record shape.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MalformedPolicy {
    /// Keep the record; missing fields render empty.
    #[default]
    Accept,
    /// Drop the record.
    Skip,
}

/// A loaded record set with its memoized facets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Catalog {
    pub records: Vec<AppRecord>,
    pub facets: Facets,
    /// Problems found while decoding, whatever the policy did about them.
    pub malformed: Vec<MalformedRecord>,
}

impl Catalog {
    pub fn new(records: Vec<AppRecord>) -> Self {
        let facets = Facets::derive(&records);
        Self {
            records,
            facets,
            malformed: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Decode raw documents into a catalog.
///
/// Documents repeating an id already seen are dropped; store ids are
/// unique, so this only matters for hand-written snapshot files.
pub fn decode_documents(docs: &[RawDocument], policy: MalformedPolicy) -> Catalog {
    let mut records = Vec::with_capacity(docs.len());
    let mut malformed = Vec::new();
    let mut seen = HashSet::new();

    for doc in docs {
        if !seen.insert(doc.id.as_str()) {
            tracing::warn!(id = %doc.id, "duplicate document id, keeping the first");
            continue;
        }

        if let Err(problem) = validate_document(doc) {
            match policy {
                MalformedPolicy::Accept => {
                    tracing::warn!(id = %doc.id, "{}", problem);
                    records.push(AppRecord::from_document(doc));
                }
                MalformedPolicy::Skip => {
                    tracing::warn!(id = %doc.id, "skipping: {}", problem);
                }
            }
            malformed.push(problem);
            continue;
        }

        records.push(AppRecord::from_document(doc));
    }

    let mut catalog = Catalog::new(records);
    catalog.malformed = malformed;
    catalog
}

/// Read `collection` once and build its catalog.
pub async fn load_catalog<S: RecordStore + ?Sized>(
    store: &S,
    collection: &str,
    policy: MalformedPolicy,
) -> Result<Catalog, StoreUnavailable> {
    let docs = match store.fetch_all(collection).await {
        Ok(docs) => docs,
        Err(e) => {
            tracing::warn!(store = %store.describe(), "load failed: {}", e);
            return Err(e);
        }
    };

    let catalog = decode_documents(&docs, policy);
    tracing::info!(
        store = %store.describe(),
        collection,
        documents = docs.len(),
        records = catalog.len(),
        malformed = catalog.malformed.len(),
        "collection loaded"
    );
    Ok(catalog)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::InMemoryStore;
    use serde_json::{json, Value};

    fn doc(id: &str, fields: Value) -> RawDocument {
        match fields {
            Value::Object(map) => RawDocument::new(id, map),
            _ => panic!("fields must be an object"),
        }
    }

    fn good(id: &str, title: &str, category: &str) -> RawDocument {
        doc(
            id,
            json!({
                "title": title,
                "description": "",
                "image": "https://img.example/a.png",
                "category": category,
                "tags": ["ai"],
            }),
        )
    }

    #[test]
    fn test_accept_keeps_malformed() {
        let docs = vec![good("1", "A", "Dev"), doc("2", json!({ "title": "B" }))];
        let catalog = decode_documents(&docs, MalformedPolicy::Accept);
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.malformed.len(), 1);
        assert_eq!(catalog.malformed[0].id, "2");
        assert_eq!(catalog.records[1].category, "");
    }

    #[test]
    fn test_skip_drops_malformed() {
        let docs = vec![good("1", "A", "Dev"), doc("2", json!({ "title": "B" }))];
        let catalog = decode_documents(&docs, MalformedPolicy::Skip);
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.records[0].id, "1");
        assert_eq!(catalog.malformed.len(), 1);
    }

    #[test]
    fn test_duplicate_ids_keep_first() {
        let docs = vec![good("1", "First", "Dev"), good("1", "Second", "Ops")];
        let catalog = decode_documents(&docs, MalformedPolicy::Accept);
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.records[0].title, "First");
        assert_eq!(catalog.facets.categories, vec!["Dev"]);
    }

    #[tokio::test]
    async fn test_load_catalog_derives_facets() {
        let store = InMemoryStore::new();
        store.put_collection("apps", vec![good("1", "A", "Dev"), good("2", "B", "Ops")]);
        let catalog = load_catalog(&store, "apps", MalformedPolicy::Accept)
            .await
            .unwrap();
        assert_eq!(catalog.facets.categories, vec!["Dev", "Ops"]);
        assert_eq!(catalog.facets.tags, vec!["ai"]);
    }

    #[tokio::test]
    async fn test_load_catalog_propagates_unavailable() {
        let store = InMemoryStore::new();
        store.fail_collection("apps");
        let err = load_catalog(&store, "apps", MalformedPolicy::Accept)
            .await
            .unwrap_err();
        assert_eq!(err.collection, "apps");
    }

    #[test]
    fn test_policy_deserializes_lowercase() {
        let p: MalformedPolicy = serde_json::from_str("\"skip\"").unwrap();
        assert_eq!(p, MalformedPolicy::Skip);
    }
}
