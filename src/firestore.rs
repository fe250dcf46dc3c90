//! Firestore REST store.
//!
//! Reads a collection through the Firestore v1 REST API:
//!
//! ```text
//! GET {endpoint}/v1/projects/{project}/databases/{database}/documents/{collection}
//!     ?pageSize={page_size}&pageToken={token}&key={api_key}
//! ```
//!
//! The list endpoint answers in pages; [`FirestoreStore::fetch_all`]
//! follows `nextPageToken` until it is exhausted so callers always get the
//! complete collection. Any failure on any page fails the whole read with
//! [`StoreUnavailable`]; nothing is retried.
//!
//! # Value decoding
//!
//! Firestore wraps every field in a typed value. They are flattened into
//! plain JSON:
//!
//! | Firestore | JSON |
//! |-----------|------|
//! | `stringValue`, `timestampValue`, `referenceValue`, `bytesValue` | string |
//! | `integerValue` (decimal string) | number |
//! | `doubleValue` | number |
//! | `booleanValue` | bool |
//! | `nullValue` | null |
//! | `geoPointValue` | `{latitude, longitude}` |
//! | `arrayValue` | array |
//! | `mapValue` | object |
//!
//! # Credentials
//!
//! The API key comes from the environment (see [`crate::config`]). It is
//! sent as the `key` query parameter and stripped from every error message.

use anyhow::Result;
use async_trait::async_trait;
use gallery_core::error::StoreUnavailable;
use gallery_core::models::RawDocument;
use gallery_core::store::RecordStore;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::time::Duration;

use crate::config::StoreConfig;

/// Upper bound on pages followed in one read.
const MAX_PAGES: usize = 10_000;

/// A Firestore database reachable over REST.
pub struct FirestoreStore {
    client: reqwest::Client,
    endpoint: String,
    project_id: String,
    database: String,
    page_size: u32,
    api_key: Option<String>,
}

impl FirestoreStore {
    pub fn new(config: &StoreConfig) -> Result<Self> {
        let project_id = config
            .project_id
            .clone()
            .ok_or_else(|| anyhow::anyhow!("store.project_id is required for firestore"))?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        let api_key = config.api_key();
        if api_key.is_none() {
            tracing::debug!(
                env = %config.api_key_env,
                "no API key in environment, sending unauthenticated requests"
            );
        }

        Ok(Self {
            client,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            project_id,
            database: config.database.clone(),
            page_size: config.page_size,
            api_key,
        })
    }

    fn collection_url(&self, collection: &str) -> String {
        format!(
            "{}/v1/projects/{}/databases/{}/documents/{}",
            self.endpoint, self.project_id, self.database, collection
        )
    }

    async fn fetch_page(
        &self,
        collection: &str,
        page_token: Option<&str>,
    ) -> Result<ListDocumentsResponse, StoreUnavailable> {
        let unavailable = |reason: String| StoreUnavailable::new(collection, reason);

        let mut query: Vec<(&str, String)> = vec![("pageSize", self.page_size.to_string())];
        if let Some(token) = page_token {
            query.push(("pageToken", token.to_string()));
        }
        if let Some(ref key) = self.api_key {
            query.push(("key", key.clone()));
        }

        let response = self
            .client
            .get(self.collection_url(collection))
            .query(&query)
            .send()
            .await
            .map_err(|e| unavailable(format!("request failed: {}", e.without_url())))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(unavailable(format!(
                "HTTP {}: {}",
                status,
                error_message(&body)
            )));
        }

        response
            .json::<ListDocumentsResponse>()
            .await
            .map_err(|e| unavailable(format!("invalid response body: {}", e.without_url())))
    }
}

#[async_trait]
impl RecordStore for FirestoreStore {
    async fn fetch_all(&self, collection: &str) -> Result<Vec<RawDocument>, StoreUnavailable> {
        let mut documents = Vec::new();
        let mut page_token: Option<String> = None;

        for _ in 0..MAX_PAGES {
            let page = self.fetch_page(collection, page_token.as_deref()).await?;
            documents.extend(page.documents.into_iter().map(FirestoreDocument::into_raw));

            match page.next_page_token.filter(|t| !t.is_empty()) {
                Some(next) if page_token.as_deref() == Some(next.as_str()) => {
                    return Err(StoreUnavailable::new(
                        collection,
                        "store repeated a page token",
                    ));
                }
                Some(next) => page_token = Some(next),
                None => return Ok(documents),
            }
        }

        Err(StoreUnavailable::new(
            collection,
            format!("gave up after {} pages", MAX_PAGES),
        ))
    }

    fn describe(&self) -> String {
        format!(
            "firestore:{}/{} ({})",
            self.project_id, self.database, self.endpoint
        )
    }
}

// ============ Wire types ============

#[derive(Debug, Deserialize)]
struct ListDocumentsResponse {
    #[serde(default)]
    documents: Vec<FirestoreDocument>,
    #[serde(default, rename = "nextPageToken")]
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FirestoreDocument {
    /// Full resource name; the id is its last segment.
    name: String,
    #[serde(default)]
    fields: Map<String, Value>,
}

impl FirestoreDocument {
    fn into_raw(self) -> RawDocument {
        let id = document_id(&self.name).to_string();
        let fields = self
            .fields
            .iter()
            .map(|(k, v)| (k.clone(), decode_value(v)))
            .collect();
        RawDocument::new(id, fields)
    }
}

/// Last path segment of a document resource name.
pub fn document_id(name: &str) -> &str {
    name.rsplit('/').next().unwrap_or(name)
}

/// Flatten one Firestore typed value into plain JSON.
pub fn decode_value(value: &Value) -> Value {
    let Some(obj) = value.as_object() else {
        return Value::Null;
    };
    let Some((kind, inner)) = obj.iter().next() else {
        return Value::Null;
    };

    match kind.as_str() {
        "stringValue" | "timestampValue" | "referenceValue" | "bytesValue" => inner.clone(),
        "integerValue" => match inner {
            Value::String(s) => s
                .parse::<i64>()
                .map(Value::from)
                .unwrap_or_else(|_| inner.clone()),
            other => other.clone(),
        },
        "doubleValue" => inner.clone(),
        "booleanValue" => inner.clone(),
        "nullValue" => Value::Null,
        "geoPointValue" => {
            let lat = inner.get("latitude").cloned().unwrap_or(Value::from(0.0));
            let lng = inner.get("longitude").cloned().unwrap_or(Value::from(0.0));
            serde_json::json!({ "latitude": lat, "longitude": lng })
        }
        "arrayValue" => Value::Array(
            inner
                .get("values")
                .and_then(Value::as_array)
                .map(|values| values.iter().map(decode_value).collect())
                .unwrap_or_default(),
        ),
        "mapValue" => Value::Object(
            inner
                .get("fields")
                .and_then(Value::as_object)
                .map(|fields| {
                    fields
                        .iter()
                        .map(|(k, v)| (k.clone(), decode_value(v)))
                        .collect()
                })
                .unwrap_or_default(),
        ),
        _ => Value::Null,
    }
}

/// Pull `error.message` out of a Google API error body, or fall back to a
/// truncated raw body.
fn error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error")
                .and_then(|e| e.get("message"))
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .unwrap_or_else(|| body.chars().take(200).collect())
}
