//! Integration tests for the best-effort digest cache and the item source.
//!
//! Covered:
//! - every digest request writes `latest_digest` to the store
//! - a failing store never fails the request (fallback items, dropped write)
//! - POST /seed reports 500 when the store rejects the write

use std::sync::Arc;

use anyhow::Result;
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::Value as Json;
use tower::ServiceExt; // for oneshot

use feedback_digest::ai::{DisabledGenerator, MockGenerator};
use feedback_digest::api::{self, AppState};
use feedback_digest::store::{KvStore, MemoryKvStore, DIGEST_KEY, ITEMS_KEY};
use feedback_digest::SummarySource;

struct OfflineStore;

#[async_trait::async_trait]
impl KvStore for OfflineStore {
    async fn get(&self, _key: &str) -> Result<Option<String>> {
        anyhow::bail!("kv offline")
    }
    async fn put(&self, _key: &str, _value: String) -> Result<()> {
        anyhow::bail!("kv offline")
    }
}

async fn send(app: &Router, method: &str, uri: &str) -> (StatusCode, Json) {
    let req = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .expect("request build");
    let resp = app.clone().oneshot(req).await.expect("router response");
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.expect("body");
    (status, serde_json::from_slice(&bytes).unwrap_or(Json::Null))
}

#[tokio::test]
async fn digest_request_caches_latest_digest() {
    let store = Arc::new(MemoryKvStore::new());
    let state = AppState::new(
        store.clone(),
        Arc::new(MockGenerator::new("A sufficiently long AI summary text.")),
    );
    let repo = state.repo.clone();
    let app = api::router(state);

    let (status, v) = send(&app, "GET", "/digest?theme=Pricing").await;
    assert_eq!(status, StatusCode::OK);

    let cached = repo
        .latest_digest()
        .await
        .expect("read cache")
        .expect("digest cached");
    assert_eq!(cached.total, 2);
    assert_eq!(cached.summary_source, SummarySource::Ai);
    assert_eq!(v["pmSummary"], cached.pm_summary.as_str());
    assert!(store.get(DIGEST_KEY).await.expect("get").is_some());
}

#[tokio::test]
async fn stored_items_replace_the_fallback_set() {
    let store = Arc::new(MemoryKvStore::new());
    store
        .put(
            ITEMS_KEY,
            r#"[{"id":"a","source":"github","text":"Invoices are wrong",
                 "sentiment":"Negative","theme":"Billing","urgency":"Low","priorityScore":1}]"#
                .to_string(),
        )
        .await
        .expect("put");
    let app = api::router(AppState::new(store, Arc::new(DisabledGenerator)));

    let (_, v) = send(&app, "GET", "/digest").await;
    assert_eq!(v["total"], 1);
    // 50 + 30 + 5 + 15, recomputed regardless of the stored value
    assert_eq!(v["needsAttention"][0]["priorityScore"], 100);
}

#[tokio::test]
async fn offline_store_degrades_gracefully() {
    let app = api::router(AppState::new(Arc::new(OfflineStore), Arc::new(DisabledGenerator)));

    let (status, v) = send(&app, "GET", "/digest").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(v["total"], 12);
    assert_eq!(v["summarySource"], "rule-based");

    let (status, v) = send(&app, "POST", "/seed").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(v["ok"], false);
}
