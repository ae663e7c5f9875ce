use std::time::Duration;

use serde::{Deserialize, Serialize};

pub const DEFAULT_BASE_URL: &str = "https://api.intelligence.io.solutions/api/v1/";
pub const DEFAULT_MODEL: &str = "meta-llama/Llama-3.3-70B-Instruct";

/// Sampling parameters for one kind of completion.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CompletionParams {
    pub temperature: f32,
    pub max_tokens: u32,
}

/// Settings for the OpenAI-compatible model API.
#[derive(Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub connect_timeout_seconds: u32,
    pub request_timeout_seconds: u32,
    pub analysis: CompletionParams,
    pub improvements: CompletionParams,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            connect_timeout_seconds: 10,
            request_timeout_seconds: 120,
            analysis: CompletionParams {
                temperature: 0.3,
                max_tokens: 2000,
            },
            improvements: CompletionParams {
                temperature: 0.4,
                max_tokens: 1500,
            },
        }
    }
}

impl std::fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("connect_timeout_seconds", &self.connect_timeout_seconds)
            .field("request_timeout_seconds", &self.request_timeout_seconds)
            .field("analysis", &self.analysis)
            .field("improvements", &self.improvements)
            .finish()
    }
}

impl LlmConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            api_key: non_empty_var("IO_INTELLIGENCE_API_KEY"),
            base_url: non_empty_var("IO_INTELLIGENCE_BASE_URL").unwrap_or(defaults.base_url),
            model: non_empty_var("GDPR_CHECK_MODEL").unwrap_or(defaults.model),
            ..defaults
        }
    }

    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub const fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(u64::from(self.connect_timeout_seconds))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(u64::from(self.request_timeout_seconds))
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = LlmConfig::default();

        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.model, DEFAULT_MODEL);
        assert!(!config.has_api_key());
        assert_eq!(config.analysis.max_tokens, 2000);
        assert_eq!(config.improvements.max_tokens, 1500);
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let config = LlmConfig::default().with_api_key("sk-secret");

        let debug = format!("{config:?}");

        assert!(!debug.contains("sk-secret"));
        assert!(debug.contains("<redacted>"));
    }
}
