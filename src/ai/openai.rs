//! OpenAI Chat Completions backend.

use anyhow::{anyhow, bail, Context, Result};
use serde::{Deserialize, Serialize};

use super::TextGenerator;

const ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";
const DEFAULT_MODEL: &str = "gpt-4o-mini";

pub struct OpenAiGenerator {
    http: Option<reqwest::Client>,
    api_key: String,
    model: String,
}

impl OpenAiGenerator {
    /// `model_override`: pass Some("gpt-4o") to override; defaults to gpt-4o-mini.
    pub fn new(api_key: String, model_override: Option<&str>) -> Self {
        let http = match super::http_client() {
            Ok(c) => Some(c),
            Err(e) => {
                tracing::warn!(error = %e, "openai: failed to build HTTP client");
                None
            }
        };
        Self {
            http,
            api_key,
            model: model_override.unwrap_or(DEFAULT_MODEL).to_string(),
        }
    }
}

#[derive(Serialize)]
struct Msg<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct Req<'a> {
    model: &'a str,
    messages: Vec<Msg<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct Resp {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMsg,
}

#[derive(Deserialize)]
struct ChoiceMsg {
    #[serde(default)]
    content: Option<String>,
}

#[async_trait::async_trait]
impl TextGenerator for OpenAiGenerator {
    async fn generate(&self, prompt: &str, temperature: f32, max_tokens: u32) -> Result<String> {
        if self.api_key.is_empty() {
            bail!("openai: missing API key");
        }
        let http = self
            .http
            .as_ref()
            .ok_or_else(|| anyhow!("openai: HTTP client unavailable"))?;

        let req = Req {
            model: &self.model,
            messages: vec![Msg {
                role: "user",
                content: prompt,
            }],
            temperature,
            max_tokens,
        };

        let body: Resp = http
            .post(ENDPOINT)
            .bearer_auth(&self.api_key)
            .json(&req)
            .send()
            .await
            .context("openai request")?
            .error_for_status()
            .context("openai non-2xx")?
            .json()
            .await
            .context("openai response body")?;

        Ok(body
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default())
    }

    fn provider_name(&self) -> &'static str {
        "openai"
    }
}
