// src/lib.rs
// Public library surface for the binary and integration tests.

pub mod aggregate;
pub mod ai;
pub mod api;
pub mod config;
pub mod digest;
pub mod feedback;
pub mod filter;
pub mod metrics;
pub mod render;
pub mod scoring;
pub mod seed;
pub mod store;
pub mod summarize;

// ---- Re-exports for stable public API ----
pub use crate::api::{router, AppState};
pub use crate::digest::{assemble, Digest};
pub use crate::feedback::{FeedbackItem, Sentiment, Source, Theme, Urgency};
pub use crate::summarize::SummarySource;

use tracing::info;

/// Build the full application router from the environment (`.env` aware),
/// without installing a metrics recorder.
pub async fn app() -> anyhow::Result<axum::Router> {
    let _ = dotenvy::dotenv();
    let cfg = config::ServiceConfig::from_env();
    let state = AppState::from_config(&cfg);
    info!(ai_config = %cfg.ai_config_path.display(), "router built from environment");
    Ok(api::create_router(state))
}
