use gdpr_check_core::ingest::DEFAULT_MAX_UPLOAD_BYTES;
use serde::{Deserialize, Serialize};

pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_CLIENT_URL: &str = "http://localhost:3000";

/// Room for multipart framing on top of the file itself.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    /// Origin allowed to call the API from a browser
    pub client_url: String,
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            client_url: DEFAULT_CLIENT_URL.to_string(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            port: std::env::var("PORT")
                .ok()
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(defaults.port),
            client_url: std::env::var("CLIENT_URL")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.client_url),
            ..defaults
        }
    }

    /// Request body limit for uploads. Anything over `max_upload_bytes` that
    /// still fits is rejected by the ingest pipeline with a precise message.
    pub const fn body_limit(&self) -> usize {
        self.max_upload_bytes + MULTIPART_OVERHEAD_BYTES
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();

        assert_eq!(config.port, 5000);
        assert_eq!(config.client_url, "http://localhost:3000");
        assert_eq!(config.max_upload_bytes, 10 * 1024 * 1024);
        assert!(config.body_limit() > config.max_upload_bytes);
    }
}
