use std::time::Duration;

const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8780";
const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Console connection settings, sourced from environment variables with
/// local-development defaults.
#[derive(Debug, Clone)]
pub struct ConsoleConfig {
    /// Base URL of the directory service, without a trailing slash.
    pub base_url: String,
    pub request_timeout: Duration,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
        }
    }
}

impl ConsoleConfig {
    pub fn from_env() -> Self {
        let base_url = std::env::var("KEEL_API_URL")
            .map(|value| value.trim_end_matches('/').to_string())
            .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let request_timeout = std::env::var("KEEL_API_TIMEOUT_MS")
            .ok()
            .and_then(|value| value.parse::<u64>().ok())
            .filter(|value| *value > 0)
            .map(Duration::from_millis)
            .unwrap_or_else(|| Duration::from_millis(DEFAULT_TIMEOUT_MS));
        Self {
            base_url,
            request_timeout,
        }
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            ..Self::default()
        }
    }
}
