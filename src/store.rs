//! Backend selection.
//!
//! Maps `[store].backend` onto a [`RecordStore`] implementation.

use anyhow::{Context, Result};
use gallery_core::store::RecordStore;
use std::sync::Arc;

use crate::config::StoreConfig;
use crate::file_store::FileStore;
use crate::firestore::FirestoreStore;

/// Build the configured store. Nothing is read yet.
pub fn open_store(config: &StoreConfig) -> Result<Arc<dyn RecordStore>> {
    match config.backend.as_str() {
        "firestore" => {
            let store = FirestoreStore::new(config).context("Failed to create Firestore client")?;
            Ok(Arc::new(store))
        }
        "file" => {
            let path = config
                .path
                .clone()
                .ok_or_else(|| anyhow::anyhow!("store.path must be set when backend is 'file'"))?;
            Ok(Arc::new(FileStore::new(path)))
        }
        other => anyhow::bail!(
            "Unknown store backend: '{}'. Must be firestore or file.",
            other
        ),
    }
}
