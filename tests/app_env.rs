// tests/app_env.rs
//
// Builds the router through `app()` (environment driven) and checks the
// AI_TEST_MODE switches. Env mutation => run serially.

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
};
use serde_json::Value as Json;
use serial_test::serial;
use tower::ServiceExt; // for `oneshot`

use feedback_digest::app;

fn set_env(store_dir: &std::path::Path, mode: Option<&str>) {
    std::env::set_var("FEEDBACK_STORE_DIR", store_dir);
    std::env::set_var("AI_CONFIG_PATH", store_dir.join("missing-ai.json"));
    match mode {
        Some(m) => std::env::set_var("AI_TEST_MODE", m),
        None => std::env::remove_var("AI_TEST_MODE"),
    }
}

async fn digest(mode: Option<&str>) -> Json {
    let dir = tempfile::tempdir().expect("tempdir");
    set_env(dir.path(), mode);

    let app = app().await.expect("failed to build app");
    let req = Request::builder()
        .uri("/digest")
        .body(Body::empty())
        .expect("failed to build request");
    let resp = app.oneshot(req).await.expect("request failed");
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.expect("body");

    assert!(
        dir.path().join("latest_digest.json").exists(),
        "digest should be cached in the file store"
    );
    std::env::remove_var("AI_TEST_MODE");
    serde_json::from_slice(&bytes).expect("json")
}

#[tokio::test]
#[serial]
async fn mock_mode_produces_ai_summary() {
    let v = digest(Some("mock")).await;
    assert_eq!(v["summarySource"], "ai");
    assert_eq!(v["pmSummary"], feedback_digest::ai::MOCK_SUMMARY);
}

#[tokio::test]
#[serial]
async fn error_mode_falls_back() {
    let v = digest(Some("error")).await;
    assert_eq!(v["summarySource"], "rule-based");
}

#[tokio::test]
#[serial]
async fn missing_ai_config_disables_generation() {
    let v = digest(None).await;
    assert_eq!(v["summarySource"], "rule-based");
    assert_eq!(v["total"], 12);
}
