//! Server configuration
//!
//! Values come from Shuttle secrets (`Secrets.toml`) with the process environment as fallback.
//! `.env` files are loaded by `dotenvy` before lookup.

use std::collections::HashMap;
use std::time::Duration;

use thiserror::Error;

pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_LLM_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_RATE_LIMIT_MAX_REQUESTS: u32 = 100;
pub const DEFAULT_RATE_LIMIT_WINDOW_SECS: u64 = 60;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{key} must be a positive integer, got '{value}'")]
    InvalidNumber { key: &'static str, value: String },

    #[error("TIGHT5_API_KEYS entry '{0}' is not of the form owner:token")]
    InvalidApiKey(String),
}

/// OpenAI-compatible chat completions settings
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    pub max_requests: u32,
    pub window: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: DEFAULT_RATE_LIMIT_MAX_REQUESTS,
            window: Duration::from_secs(DEFAULT_RATE_LIMIT_WINDOW_SECS),
        }
    }
}

/// Typed application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// `None` when no API key is set; assistant calls then use local fallbacks
    pub llm: Option<LlmConfig>,
    pub llm_timeout: Duration,
    /// token -> owner. Empty disables authentication.
    pub api_keys: HashMap<String, String>,
    pub rate_limit: RateLimitConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            llm: None,
            llm_timeout: Duration::from_secs(DEFAULT_LLM_TIMEOUT_SECS),
            api_keys: HashMap::new(),
            rate_limit: RateLimitConfig::default(),
        }
    }
}

impl AppConfig {
    /// Build from Shuttle secrets, falling back to environment variables
    pub fn from_secrets(secrets: &shuttle_runtime::SecretStore) -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| secrets.get(key).or_else(|| std::env::var(key).ok()))
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let llm_timeout = Duration::from_secs(parse_number(
            "LLM_TIMEOUT_SECS",
            get("LLM_TIMEOUT_SECS"),
            DEFAULT_LLM_TIMEOUT_SECS,
        )?);

        let llm = get("OPENAI_API_KEY").map(|api_key| LlmConfig {
            api_key,
            model: get("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            base_url: get("OPENAI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            timeout: llm_timeout,
        });

        let api_keys = match get("TIGHT5_API_KEYS") {
            Some(raw) => parse_api_keys(&raw)?,
            None => HashMap::new(),
        };

        let rate_limit = RateLimitConfig {
            max_requests: parse_number(
                "RATE_LIMIT_MAX_REQUESTS",
                get("RATE_LIMIT_MAX_REQUESTS"),
                DEFAULT_RATE_LIMIT_MAX_REQUESTS,
            )?,
            window: Duration::from_secs(parse_number(
                "RATE_LIMIT_WINDOW_SECS",
                get("RATE_LIMIT_WINDOW_SECS"),
                DEFAULT_RATE_LIMIT_WINDOW_SECS,
            )?),
        };

        Ok(Self {
            llm,
            llm_timeout,
            api_keys,
            rate_limit,
        })
    }
}

fn parse_number<T>(key: &'static str, value: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr + PartialOrd + Default,
{
    match value {
        None => Ok(default),
        Some(value) => match value.parse::<T>() {
            Ok(n) if n > T::default() => Ok(n),
            _ => Err(ConfigError::InvalidNumber { key, value }),
        },
    }
}

/// Parse `owner:token,owner:token` into a token -> owner map
fn parse_api_keys(raw: &str) -> Result<HashMap<String, String>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| match entry.split_once(':') {
            Some((owner, token)) if !owner.trim().is_empty() && !token.trim().is_empty() => {
                Ok((token.trim().to_string(), owner.trim().to_string()))
            }
            _ => Err(ConfigError::InvalidApiKey(entry.to_string())),
        })
        .collect()
}
