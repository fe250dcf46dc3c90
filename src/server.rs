//! Gallery HTTP server.
//!
//! The server reads the collection exactly once: the fetch is spawned right
//! after the listener is bound, and requests arriving before it resolves
//! are served the `Loading` page. Each request builds its own
//! [`GalleryView`] over the shared load state, so filter state lives in the
//! query string and never leaks between clients.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET`  | `/?q=&category=&tag=` | HTML gallery page |
//! | `GET`  | `/api/gallery?q=&category=&tag=` | JSON render model |
//! | `GET`  | `/health` | Status, version, and load phase |
//!
//! # Error Contract
//!
//! ```json
//! { "error": { "code": "store_unavailable", "message": "collection 'apps' is unavailable: ..." } }
//! ```
//!
//! When the load failed, `/` still renders (with the failure notice) but
//! answers `503`, and `/api/gallery` answers `503` with the body above.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};
use gallery_core::error::StoreUnavailable;
use gallery_core::filter::{Filter, Selection};
use gallery_core::load::{load_catalog, Catalog, MalformedPolicy};
use gallery_core::store::RecordStore;
use gallery_core::view::{GalleryPage, GalleryView, LoadState, Phase};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::cors::{Any, CorsLayer};

use crate::config::{Config, GalleryConfig};
use crate::render::render_html;
use crate::store::open_store;

/// Shared state passed to all route handlers via Axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    /// Written once by the load task, read by every request.
    load: Arc<RwLock<LoadState>>,
    gallery: Arc<GalleryConfig>,
}

impl AppState {
    pub fn new(gallery: GalleryConfig) -> Self {
        Self {
            load: Arc::new(RwLock::new(LoadState::Loading)),
            gallery: Arc::new(gallery),
        }
    }

    /// Store the fetch outcome. Ignored unless still loading.
    pub async fn finish_load(&self, result: Result<Catalog, StoreUnavailable>) -> bool {
        let mut load = self.load.write().await;
        if !matches!(*load, LoadState::Loading) {
            return false;
        }
        *load = LoadState::from_result(result);
        true
    }

    pub async fn snapshot(&self) -> LoadState {
        self.load.read().await.clone()
    }
}

/// Spawn the single collection read for `state`.
pub fn spawn_load(
    state: AppState,
    store: Arc<dyn RecordStore>,
    collection: String,
    policy: MalformedPolicy,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let result = load_catalog(store.as_ref(), &collection, policy).await;
        state.finish_load(result).await;
    })
}

pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handle_index))
        .route("/api/gallery", get(handle_gallery_json))
        .route("/health", get(handle_health))
        .layer(cors)
        .with_state(state)
}

/// Bind `[server].bind`, start the load, and serve until terminated.
pub async fn run_server(config: &Config) -> anyhow::Result<()> {
    let store = open_store(&config.store)?;
    let state = AppState::new(config.gallery.clone());

    let listener = tokio::net::TcpListener::bind(&config.server.bind).await?;
    tracing::info!(
        bind = %config.server.bind,
        store = %store.describe(),
        collection = %config.store.collection,
        "gallery server listening"
    );
    println!("Gallery listening on http://{}", config.server.bind);

    spawn_load(
        state.clone(),
        store,
        config.store.collection.clone(),
        config.gallery.malformed,
    );

    axum::serve(listener, build_router(state)).await?;
    Ok(())
}

// ============ Error response ============

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: String,
    message: String,
}

struct AppError {
    status: StatusCode,
    code: String,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code,
                message: self.message,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

fn store_unavailable(err: &StoreUnavailable) -> AppError {
    AppError {
        status: StatusCode::SERVICE_UNAVAILABLE,
        code: "store_unavailable".to_string(),
        message: err.to_string(),
    }
}

// ============ Query parameters ============

/// `?q=&category=&tag=`; absent or `all` means no restriction, an empty
/// value selects records whose category or tag is blank.
#[derive(Debug, Default, Deserialize)]
struct GalleryQuery {
    #[serde(default)]
    q: Option<String>,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    tag: Option<String>,
}

impl GalleryQuery {
    fn into_filter(self) -> Filter {
        Filter::new(
            self.q.unwrap_or_default(),
            Selection::from_option(self.category.as_deref()),
            Selection::from_option(self.tag.as_deref()),
        )
    }
}

async fn page_for(state: &AppState, query: GalleryQuery) -> (LoadState, GalleryPage) {
    let load = state.snapshot().await;
    let mut view = GalleryView::with_state(load.clone());
    view.set_filter(query.into_filter());
    (load, view.page())
}

// ============ GET / ============

async fn handle_index(
    State(state): State<AppState>,
    Query(query): Query<GalleryQuery>,
) -> (StatusCode, Html<String>) {
    let (load, page) = page_for(&state, query).await;
    let status = match load.phase() {
        Phase::Failed => StatusCode::SERVICE_UNAVAILABLE,
        _ => StatusCode::OK,
    };
    (status, Html(render_html(&page, &state.gallery)))
}

// ============ GET /api/gallery ============

async fn handle_gallery_json(
    State(state): State<AppState>,
    Query(query): Query<GalleryQuery>,
) -> Result<Json<GalleryPage>, AppError> {
    let (load, page) = page_for(&state, query).await;
    if let LoadState::Failed(err) = &load {
        return Err(store_unavailable(err));
    }
    Ok(Json(page))
}

// ============ GET /health ============

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
    phase: Phase,
    records: usize,
}

async fn handle_health(State(state): State<AppState>) -> Json<HealthResponse> {
    let load = state.snapshot().await;
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        phase: load.phase(),
        records: load.catalog().map(Catalog::len).unwrap_or(0),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_into_filter() {
        let q = GalleryQuery {
            q: Some("bot".to_string()),
            category: Some("all".to_string()),
            tag: None,
        };
        let f = q.into_filter();
        assert_eq!(f.query, "bot");
        assert!(f.category.is_all());
        assert!(f.tag.is_all());
        assert!(GalleryQuery::default().into_filter().is_identity());

        let blank = GalleryQuery {
            category: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(blank.into_filter().category, Selection::Only(String::new()));
    }

    #[tokio::test]
    async fn test_finish_load_once() {
        let state = AppState::new(GalleryConfig::default());
        assert_eq!(state.snapshot().await.phase(), Phase::Loading);
        assert!(state.finish_load(Ok(Catalog::new(Vec::new()))).await);
        assert!(
            !state
                .finish_load(Err(StoreUnavailable::new("apps", "late")))
                .await
        );
        assert_eq!(state.snapshot().await.phase(), Phase::Loaded);
    }
}
