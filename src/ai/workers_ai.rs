//! Cloudflare Workers AI backend (REST `ai/run/{model}`).

use anyhow::{anyhow, bail, Context, Result};
use serde::{Deserialize, Serialize};

use super::TextGenerator;

const DEFAULT_MODEL: &str = "@cf/meta/llama-3-8b-instruct";

pub struct WorkersAiGenerator {
    http: Option<reqwest::Client>,
    account_id: String,
    api_token: String,
    model: String,
}

impl WorkersAiGenerator {
    pub fn new(account_id: String, api_token: String, model_override: Option<&str>) -> Self {
        let http = match super::http_client() {
            Ok(c) => Some(c),
            Err(e) => {
                tracing::warn!(error = %e, "workers-ai: failed to build HTTP client");
                None
            }
        };
        Self {
            http,
            account_id,
            api_token,
            model: model_override.unwrap_or(DEFAULT_MODEL).to_string(),
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "https://api.cloudflare.com/client/v4/accounts/{}/ai/run/{}",
            self.account_id, self.model
        )
    }
}

#[derive(Serialize)]
struct Msg<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct Req<'a> {
    messages: Vec<Msg<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct Resp {
    #[serde(default)]
    success: bool,
    result: Option<RunResult>,
}

#[derive(Deserialize)]
struct RunResult {
    #[serde(default)]
    response: Option<String>,
}

#[async_trait::async_trait]
impl TextGenerator for WorkersAiGenerator {
    async fn generate(&self, prompt: &str, temperature: f32, max_tokens: u32) -> Result<String> {
        if self.api_token.is_empty() || self.account_id.is_empty() {
            bail!("workers-ai: missing account id or API token");
        }
        let http = self
            .http
            .as_ref()
            .ok_or_else(|| anyhow!("workers-ai: HTTP client unavailable"))?;

        let req = Req {
            messages: vec![Msg {
                role: "user",
                content: prompt,
            }],
            temperature,
            max_tokens,
        };

        let body: Resp = http
            .post(self.endpoint())
            .bearer_auth(&self.api_token)
            .json(&req)
            .send()
            .await
            .context("workers-ai request")?
            .error_for_status()
            .context("workers-ai non-2xx")?
            .json()
            .await
            .context("workers-ai response body")?;

        if !body.success {
            bail!("workers-ai: success=false");
        }
        Ok(body.result.and_then(|r| r.response).unwrap_or_default())
    }

    fn provider_name(&self) -> &'static str {
        "workers-ai"
    }
}
