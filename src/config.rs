//! Environment configuration
//!
//! Loaded once at startup. `.env` is honored when present. The API key is
//! optional here so extraction-only commands run without one; scoring asks
//! for it through `chat_config`.

use std::time::Duration;

use thiserror::Error;

use crate::fetch::{self, FetchConfig};
use crate::scoring::{self, ChatConfig};

/// Value shipped in the example secrets file.
const TEMPLATE_API_KEY: &str = "your-openai-api-key-here";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("required environment variable '{0}' is not set")]
    Missing(&'static str),

    #[error("environment variable '{0}' still holds the template value")]
    Template(&'static str),

    #[error("environment variable '{key}' has invalid value {value:?}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub openai_api_key: Option<String>,
    pub openai_base_url: String,
    pub openai_model: String,
    pub fetch_timeout: Duration,
    pub scoring_timeout: Duration,
    pub user_agent: String,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Ok(Config {
            openai_api_key: get("OPENAI_API_KEY"),
            openai_base_url: get("OPENAI_BASE_URL")
                .unwrap_or_else(|| scoring::DEFAULT_BASE_URL.to_string()),
            openai_model: get("OPENAI_MODEL").unwrap_or_else(|| scoring::DEFAULT_MODEL.to_string()),
            fetch_timeout: secs(
                "FETCH_TIMEOUT_SECS",
                get("FETCH_TIMEOUT_SECS"),
                fetch::DEFAULT_TIMEOUT_SECS,
            )?,
            scoring_timeout: secs(
                "SCORING_TIMEOUT_SECS",
                get("SCORING_TIMEOUT_SECS"),
                scoring::DEFAULT_TIMEOUT_SECS,
            )?,
            user_agent: get("FETCH_USER_AGENT")
                .unwrap_or_else(|| fetch::DEFAULT_USER_AGENT.to_string()),
            rust_log: get("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }

    pub fn fetch_config(&self) -> FetchConfig {
        FetchConfig {
            timeout: self.fetch_timeout,
            user_agent: self.user_agent.clone(),
        }
    }

    pub fn chat_config(&self) -> Result<ChatConfig, ConfigError> {
        let api_key = self
            .openai_api_key
            .clone()
            .ok_or(ConfigError::Missing("OPENAI_API_KEY"))?;
        if api_key == TEMPLATE_API_KEY {
            return Err(ConfigError::Template("OPENAI_API_KEY"));
        }

        Ok(ChatConfig {
            api_key,
            base_url: self.openai_base_url.clone(),
            model: self.openai_model.clone(),
            timeout: self.scoring_timeout,
        })
    }
}

fn secs(key: &'static str, value: Option<String>, default: u64) -> Result<Duration, ConfigError> {
    match value {
        None => Ok(Duration::from_secs(default)),
        Some(raw) => match raw.trim().parse::<u64>() {
            Ok(n) if n > 0 => Ok(Duration::from_secs(n)),
            _ => Err(ConfigError::Invalid { key, value: raw }),
        },
    }
}
