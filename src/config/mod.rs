// src/config/mod.rs
//! Process-level settings, read from the environment (after `.env`).

pub mod ai;

use std::path::PathBuf;

pub use ai::AiConfig;

pub const ENV_STORE_DIR: &str = "FEEDBACK_STORE_DIR";
pub const ENV_AI_CONFIG_PATH: &str = "AI_CONFIG_PATH";
pub const DEFAULT_STORE_DIR: &str = "data/kv";

#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub store_dir: PathBuf,
    pub ai_config_path: PathBuf,
}

impl ServiceConfig {
    pub fn from_env() -> Self {
        let store_dir = std::env::var(ENV_STORE_DIR)
            .ok()
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STORE_DIR));
        let ai_config_path = std::env::var(ENV_AI_CONFIG_PATH)
            .ok()
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(ai::DEFAULT_AI_CONFIG_PATH));
        Self {
            store_dir,
            ai_config_path,
        }
    }

    pub fn ai(&self) -> AiConfig {
        AiConfig::load_or_disabled(&self.ai_config_path)
    }
}
