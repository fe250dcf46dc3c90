//! Storage abstraction for App Gallery.
//!
//! The [`RecordStore`] trait is the single read capability the gallery
//! needs: a complete snapshot of one named collection. Backends (the
//! Firestore REST client, the snapshot-file reader, the in-memory store)
//! live behind it so the load path and the view never see transport
//! details.
//!
//! Implementations must be `Send + Sync` to work with async runtimes.

pub mod memory;

use async_trait::async_trait;

use crate::error::StoreUnavailable;
use crate::models::RawDocument;

/// Read-only document store.
///
/// | Method | Purpose |
/// |--------|---------|
/// | [`fetch_all`](RecordStore::fetch_all) | Every document of a collection |
/// | [`describe`](RecordStore::describe) | Short label for logs and `check` output |
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Return every document currently in `collection`, in store order.
    ///
    /// No filtering, ordering, or retry. Any failure yields
    /// [`StoreUnavailable`] and no partial result.
    async fn fetch_all(&self, collection: &str) -> Result<Vec<RawDocument>, StoreUnavailable>;

    /// Short human-readable description of the backend.
    fn describe(&self) -> String;
}
