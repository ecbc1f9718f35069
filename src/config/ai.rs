// src/config/ai.rs
use serde::{Deserialize, Serialize};
use std::{env, fs, path::Path};

use tracing::warn;

pub const DEFAULT_AI_CONFIG_PATH: &str = "config/ai.json";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AiConfig {
    #[serde(default)]
    pub enabled: bool,
    /// "openai" | "workers-ai" (case-insensitive)
    #[serde(default)]
    pub provider: String,
    /// Optional model override; each provider has its own default.
    #[serde(default)]
    pub model: Option<String>,
    /// "ENV" means: read from OPENAI_API_KEY / CLOUDFLARE_API_TOKEN (by provider)
    #[serde(default)]
    pub api_key: String,
    /// Workers AI only. "ENV" means: read from CLOUDFLARE_ACCOUNT_ID.
    #[serde(default)]
    pub account_id: Option<String>,
}

impl AiConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let data = fs::read_to_string(path)?;
        let mut cfg: AiConfig = serde_json::from_str(&data)?;

        cfg.provider = cfg.provider.trim().to_lowercase();

        if cfg.api_key.trim().eq_ignore_ascii_case("env") {
            cfg.api_key = match cfg.provider.as_str() {
                "openai" => env::var("OPENAI_API_KEY")
                    .map_err(|_| anyhow::anyhow!("Missing OPENAI_API_KEY env var"))?,
                "workers-ai" => env::var("CLOUDFLARE_API_TOKEN")
                    .map_err(|_| anyhow::anyhow!("Missing CLOUDFLARE_API_TOKEN env var"))?,
                other => anyhow::bail!("Unsupported provider in config: {other}"),
            };
        }

        if let Some(acc) = cfg.account_id.as_deref() {
            if acc.trim().eq_ignore_ascii_case("env") {
                cfg.account_id = Some(
                    env::var("CLOUDFLARE_ACCOUNT_ID")
                        .map_err(|_| anyhow::anyhow!("Missing CLOUDFLARE_ACCOUNT_ID env var"))?,
                );
            }
        }

        Ok(cfg)
    }

    /// Like `load_from_file`, but any read/parse/env failure yields a disabled config.
    pub fn load_or_disabled<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match Self::load_from_file(path) {
            Ok(cfg) => cfg,
            Err(e) => {
                warn!(error = %e, path = %path.display(), "AI config unavailable; generation disabled");
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn provider_is_normalized() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        write!(f, r#"{{"enabled":true,"provider":" OpenAI ","api_key":"sk-test"}}"#).unwrap();
        let cfg = AiConfig::load_from_file(f.path()).unwrap();
        assert_eq!(cfg.provider, "openai");
        assert!(cfg.enabled);
        assert_eq!(cfg.api_key, "sk-test");
    }

    #[test]
    fn missing_file_disables_ai() {
        let cfg = AiConfig::load_or_disabled("definitely/not/here.json");
        assert!(!cfg.enabled);
    }

    #[test]
    fn unsupported_provider_with_env_key_fails() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        write!(f, r#"{{"enabled":true,"provider":"bard","api_key":"ENV"}}"#).unwrap();
        assert!(AiConfig::load_from_file(f.path()).is_err());
    }
}
