use crate::render::{DEFAULT_PLACEHOLDER, DEFAULT_REVEAL_INTERVAL};
use crate::stream::{DEFAULT_MAX_BACKLOG_CHARS, DEFAULT_MIN_INTERVAL, ThrottleConfig};
use crate::validation::DEFAULT_PAGE_LIMIT;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_STORE_URL: &str = "http://localhost:8888/.netlify/functions";
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Root of `config.toml`. Every section and field is optional.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct QuillConfig {
    pub store: StoreConfig,
    pub generation: GenerationConfig,
    pub display: DisplayConfig,
    pub history: HistoryConfig,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct StoreConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_STORE_URL.to_string(),
            timeout_secs: 30,
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct GenerationConfig {
    pub model: String,
    /// Language the prompts ask the model to write in
    pub language: String,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            language: "Greek".to_string(),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct DisplayConfig {
    pub throttle_interval_ms: u64,
    pub throttle_backlog_chars: usize,
    pub reveal_interval_ms: u64,
    pub reveal_placeholder: String,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            throttle_interval_ms: DEFAULT_MIN_INTERVAL.as_millis() as u64,
            throttle_backlog_chars: DEFAULT_MAX_BACKLOG_CHARS,
            reveal_interval_ms: DEFAULT_REVEAL_INTERVAL.as_millis() as u64,
            reveal_placeholder: DEFAULT_PLACEHOLDER.to_string(),
        }
    }
}

impl DisplayConfig {
    pub fn throttle(&self) -> ThrottleConfig {
        ThrottleConfig {
            min_interval: Duration::from_millis(self.throttle_interval_ms),
            max_backlog_chars: self.throttle_backlog_chars,
        }
    }

    pub fn reveal_interval(&self) -> Duration {
        Duration::from_millis(self.reveal_interval_ms)
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct HistoryConfig {
    pub page_size: u32,
    pub preview_chars: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_LIMIT,
            preview_chars: 60,
        }
    }
}

/// Root structure of `secret.json`.
#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct SecretConfig {
    #[serde(default)]
    pub gemini: Option<GeminiSecret>,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct GeminiSecret {
    pub api_key: String,
}
