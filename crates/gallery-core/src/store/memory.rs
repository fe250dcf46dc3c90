//! In-memory [`RecordStore`] implementation for testing and embedding.
//!
//! Collections are plain vectors behind `std::sync::RwLock`. A collection
//! can be marked as failing to exercise the unavailable path.

use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

use async_trait::async_trait;

use crate::error::StoreUnavailable;
use crate::models::RawDocument;

use super::RecordStore;

/// In-memory store keyed by collection name.
pub struct InMemoryStore {
    collections: RwLock<HashMap<String, Vec<RawDocument>>>,
    failing: RwLock<HashSet<String>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            collections: RwLock::new(HashMap::new()),
            failing: RwLock::new(HashSet::new()),
        }
    }

    /// Replace the contents of `collection`.
    pub fn put_collection(&self, collection: &str, docs: Vec<RawDocument>) {
        let mut collections = self.collections.write().unwrap();
        collections.insert(collection.to_string(), docs);
    }

    /// Make every read of `collection` fail.
    pub fn fail_collection(&self, collection: &str) {
        self.failing.write().unwrap().insert(collection.to_string());
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RecordStore for InMemoryStore {
    async fn fetch_all(&self, collection: &str) -> Result<Vec<RawDocument>, StoreUnavailable> {
        if self.failing.read().unwrap().contains(collection) {
            return Err(StoreUnavailable::new(collection, "simulated outage"));
        }
        let collections = self.collections.read().unwrap();
        Ok(collections.get(collection).cloned().unwrap_or_default())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}
