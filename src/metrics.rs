use axum::{routing::get, Router};
use metrics::{describe_counter, describe_histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

pub struct Metrics {
    pub handle: PrometheusHandle,
}

impl Metrics {
    /// Install the global Prometheus recorder. Fails if one is already installed.
    pub fn init() -> anyhow::Result<Self> {
        let handle = PrometheusBuilder::new().install_recorder()?;
        describe();
        Ok(Self { handle })
    }

    /// Returns a router exposing `/metrics` with the Prometheus exposition format.
    pub fn router(&self) -> Router {
        let handle = self.handle.clone();
        Router::new().route(
            "/metrics",
            get(move || {
                let h = handle.clone();
                async move { h.render() }
            }),
        )
    }
}

fn describe() {
    describe_counter!("digest_generated_total", "Digests assembled.");
    describe_counter!(
        "digest_summary_total",
        "PM summaries produced, labelled by source (ai | rule-based)."
    );
    describe_counter!(
        "feedback_source_fallback_total",
        "Requests served from the fallback item set."
    );
    describe_counter!(
        "digest_cache_write_errors_total",
        "Digest cache writes that failed and were dropped."
    );
    describe_histogram!("digest_summary_ms", "Text-generation call time in milliseconds.");
}
