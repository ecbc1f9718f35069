// tests/metrics.rs
// One test only: the Prometheus recorder is process-global.
use std::sync::Arc;

use axum::body::{self, Body};
use axum::http::{Request, StatusCode};
use tower::ServiceExt;

use feedback_digest::ai::FailingGenerator;
use feedback_digest::api::{self, AppState};
use feedback_digest::metrics::Metrics;

#[tokio::test]
async fn metrics_endpoint_reports_digest_series() {
    let metrics = Metrics::init().expect("install recorder");
    let state = AppState::in_memory(Arc::new(FailingGenerator {
        message: "offline".into(),
    }));
    let app = api::router(state).merge(metrics.router());

    let r = app
        .clone()
        .oneshot(Request::get("/digest").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(r.status(), StatusCode::OK);

    let m = app
        .oneshot(Request::get("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(m.status(), StatusCode::OK);
    // axum::body::to_bytes requires an explicit limit
    let body = body::to_bytes(m.into_body(), 1_048_576).await.unwrap(); // 1 MiB
    let text = String::from_utf8(body.to_vec()).unwrap();

    for needle in [
        "digest_generated_total",
        "digest_summary_total",
        "feedback_source_fallback_total",
        "digest_summary_ms",
    ] {
        assert!(
            text.contains(needle),
            "metrics exposition missing '{needle}'\n{text}"
        );
    }
    assert!(text.contains("source=\"rule-based\""), "{text}");
}
