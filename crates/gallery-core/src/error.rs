//! Typed errors for the load path.
//!
//! Everything that can go wrong while reading the collection collapses into
//! [`StoreUnavailable`]; per-record shape problems are reported as
//! [`MalformedRecord`] and never abort a load.

use serde::Serialize;
use thiserror::Error;

/// The collection read failed (network, auth, quota, HTTP status, or an
/// undecodable response). No partial result accompanies this error.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("collection '{collection}' is unavailable: {reason}")]
pub struct StoreUnavailable {
    /// Collection that was being read.
    pub collection: String,
    /// Human-readable cause.
    pub reason: String,
}

impl StoreUnavailable {
    pub fn new(collection: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            reason: reason.into(),
        }
    }
}

/// A document whose fields do not match the app record shape.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("record '{id}' is malformed: {}", problems.join("; "))]
pub struct MalformedRecord {
    /// Store-assigned document id.
    pub id: String,
    /// One entry per missing or wrongly typed field.
    pub problems: Vec<String>,
}
