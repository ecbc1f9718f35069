use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::ai::{self, DynGenerator};
use crate::config::ServiceConfig;
use crate::digest::{self, Digest};
use crate::feedback::FeedbackItem;
use crate::filter::DigestFilter;
use crate::render;
use crate::seed;
use crate::store::{FeedbackRepository, FileKvStore, KvStore, MemoryKvStore};

#[derive(Clone)]
pub struct AppState {
    pub repo: FeedbackRepository,
    pub generator: DynGenerator,
}

impl AppState {
    pub fn new(store: Arc<dyn KvStore>, generator: DynGenerator) -> Self {
        Self {
            repo: FeedbackRepository::new(store, seed::sample_feedback()),
            generator,
        }
    }

    /// File-backed store + generator from the AI config file.
    pub fn from_config(cfg: &ServiceConfig) -> Self {
        let generator = ai::build_generator(&cfg.ai());
        info!(
            store_dir = %cfg.store_dir.display(),
            provider = generator.provider_name(),
            "app state ready"
        );
        Self::new(Arc::new(FileKvStore::new(cfg.store_dir.clone())), generator)
    }

    /// Empty in-memory store; handy for tests and demos.
    pub fn in_memory(generator: DynGenerator) -> Self {
        Self::new(Arc::new(MemoryKvStore::new()), generator)
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(|| async { "OK" }))
        .route("/digest", get(digest_json))
        .route("/ui", get(dashboard))
        .route("/api", get(api_page))
        .route("/seed", post(seed_store))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

/// Alias kept for callers that prefer `router(state)`.
pub fn router(state: AppState) -> Router {
    create_router(state)
}

async fn root() -> Response {
    (StatusCode::FOUND, [(header::LOCATION, "/ui")]).into_response()
}

/// Load -> filter -> assemble -> cache (best-effort).
async fn run_pipeline(
    state: &AppState,
    q: &[(String, String)],
) -> (DigestFilter, Vec<FeedbackItem>, Digest) {
    let filter = DigestFilter::from_query(q);
    let items = filter.apply(state.repo.load_items().await);
    let digest = digest::assemble(&items, state.generator.as_ref()).await;
    state.repo.cache_digest(&digest).await;
    (filter, items, digest)
}

async fn digest_json(
    State(state): State<AppState>,
    Query(q): Query<Vec<(String, String)>>,
) -> Response {
    let (_, _, digest) = run_pipeline(&state, &q).await;
    match serde_json::to_string_pretty(&digest) {
        Ok(body) => ([(header::CONTENT_TYPE, "application/json")], body).into_response(),
        Err(e) => {
            warn!(error = %e, "failed to serialize digest");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

async fn dashboard(
    State(state): State<AppState>,
    Query(q): Query<Vec<(String, String)>>,
) -> Html<String> {
    let (filter, items, digest) = run_pipeline(&state, &q).await;
    Html(render::dashboard(&digest, &filter, &items))
}

async fn api_page(
    State(state): State<AppState>,
    Query(q): Query<Vec<(String, String)>>,
) -> Html<String> {
    let (filter, _, digest) = run_pipeline(&state, &q).await;
    Html(render::json_page(&digest, &filter))
}

async fn seed_store(State(state): State<AppState>) -> Response {
    match state.repo.seed(state.repo.fallback()).await {
        Ok(count) => {
            info!(count, "store seeded with sample feedback");
            Json(json!({
                "ok": true,
                "message": "Seeded store with sample feedback",
                "count": count,
            }))
            .into_response()
        }
        Err(e) => {
            warn!(error = ?e, "failed to seed store");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "ok": false, "message": "Failed to seed store" })),
            )
                .into_response()
        }
    }
}
