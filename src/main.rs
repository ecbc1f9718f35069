//! Feedback Digest Service: binary entrypoint
//! Boots the Axum HTTP server, wiring routes, shared state, and middleware.

use feedback_digest::{api, config::ServiceConfig, metrics::Metrics, AppState};
use shuttle_axum::ShuttleAxum;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// `RUST_LOG` controls verbosity; `LOG_FORMAT=json` switches to JSON lines.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("feedback_digest=info,warn"));

    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(filter);
    // try_init: the runtime may already have installed a global subscriber.
    let _ = if json {
        registry.with(fmt::layer().json()).try_init()
    } else {
        registry.with(fmt::layer().compact()).try_init()
    };
}

#[shuttle_runtime::main]
async fn axum() -> ShuttleAxum {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();

    init_tracing();

    let cfg = ServiceConfig::from_env();
    let state = AppState::from_config(&cfg);
    let mut router = api::create_router(state);

    match Metrics::init() {
        Ok(m) => router = router.merge(m.router()),
        Err(e) => tracing::warn!(error = %e, "metrics recorder not installed; /metrics disabled"),
    }

    Ok(router.into())
}
