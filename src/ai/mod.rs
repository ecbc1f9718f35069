//! Text-generation backends: provider abstraction + factory.
//!
//! Every backend returns `anyhow::Result<String>`; callers decide what a
//! failure means. The summarizer treats any error as "use the rule-based
//! narrative".

pub mod openai;
pub mod workers_ai;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Result};

use crate::config::AiConfig;

pub use openai::OpenAiGenerator;
pub use workers_ai::WorkersAiGenerator;

pub(crate) const USER_AGENT: &str = "feedback-digest/0.1";

/// One-shot text generation.
#[async_trait::async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str, temperature: f32, max_tokens: u32) -> Result<String>;
    /// Provider name for diagnostics/logs.
    fn provider_name(&self) -> &'static str;
}

pub type DynGenerator = Arc<dyn TextGenerator>;

/// Always fails; used when AI is disabled or misconfigured.
pub struct DisabledGenerator;

#[async_trait::async_trait]
impl TextGenerator for DisabledGenerator {
    async fn generate(&self, _prompt: &str, _temperature: f32, _max_tokens: u32) -> Result<String> {
        bail!("text generation disabled")
    }
    fn provider_name(&self) -> &'static str {
        "disabled"
    }
}

/// Returns a fixed reply; for tests/local runs.
#[derive(Clone)]
pub struct MockGenerator {
    pub fixed: String,
}

impl MockGenerator {
    pub fn new(fixed: impl Into<String>) -> Self {
        Self {
            fixed: fixed.into(),
        }
    }
}

#[async_trait::async_trait]
impl TextGenerator for MockGenerator {
    async fn generate(&self, _prompt: &str, _temperature: f32, _max_tokens: u32) -> Result<String> {
        Ok(self.fixed.clone())
    }
    fn provider_name(&self) -> &'static str {
        "mock"
    }
}

/// Always errors with the given message; for tests.
pub struct FailingGenerator {
    pub message: String,
}

#[async_trait::async_trait]
impl TextGenerator for FailingGenerator {
    async fn generate(&self, _prompt: &str, _temperature: f32, _max_tokens: u32) -> Result<String> {
        bail!("{}", self.message)
    }
    fn provider_name(&self) -> &'static str {
        "failing"
    }
}

pub const MOCK_SUMMARY: &str = "Sentiment is mixed with billing and pricing concerns leading. \
Prioritise the high-urgency billing items this week.";

/// Factory: build a generator according to config and environment variables.
///
/// * `AI_TEST_MODE=mock`  -> fixed reply
/// * `AI_TEST_MODE=error` -> always fails
/// * `AI_TEST_MODE=empty` -> empty reply
/// * else `enabled==false` -> disabled
/// * else the configured provider
pub fn build_generator(config: &AiConfig) -> DynGenerator {
    match std::env::var("AI_TEST_MODE").ok().as_deref() {
        Some("mock") => return Arc::new(MockGenerator::new(MOCK_SUMMARY)),
        Some("error") => {
            return Arc::new(FailingGenerator {
                message: "AI_TEST_MODE=error".to_string(),
            })
        }
        Some("empty") => return Arc::new(MockGenerator::new("")),
        _ => {}
    }

    if !config.enabled {
        return Arc::new(DisabledGenerator);
    }

    match config.provider.as_str() {
        "openai" => Arc::new(OpenAiGenerator::new(
            config.api_key.clone(),
            config.model.as_deref(),
        )),
        "workers-ai" => match config.account_id.clone() {
            Some(account) => Arc::new(WorkersAiGenerator::new(
                account,
                config.api_key.clone(),
                config.model.as_deref(),
            )),
            None => {
                tracing::warn!("workers-ai provider requires account_id; generation disabled");
                Arc::new(DisabledGenerator)
            }
        },
        other => {
            tracing::warn!(provider = other, "unknown AI provider; generation disabled");
            Arc::new(DisabledGenerator)
        }
    }
}

pub(crate) fn http_client() -> Result<reqwest::Client> {
    Ok(reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .connect_timeout(Duration::from_secs(4))
        .timeout(Duration::from_secs(10))
        .build()?)
}
