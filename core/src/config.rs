//! Client configuration.
//!
//! Defaults target the development API without a token. `from_env` lets
//! scripts switch endpoint and credentials without code changes.

use std::env;
use std::time::Duration;

/// Production MERMAID API root.
pub const API_URL: &str = "https://api.datamermaid.org/v1";
/// Development MERMAID API root.
pub const API_DEV_URL: &str = "https://dev-api.datamermaid.org/v1";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

pub const ENV_API_URL: &str = "MERMAID_API_URL";
pub const ENV_TOKEN: &str = "MERMAID_TOKEN";
pub const ENV_TIMEOUT_SECS: &str = "MERMAID_TIMEOUT_SECS";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    /// JWT bearer token. Without one, only public resources are reachable.
    pub token: Option<String>,
    /// Upper bound on one request/response round trip.
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: API_DEV_URL.to_string(),
            token: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ClientConfig {
    pub fn production() -> Self {
        Self::default().with_base_url(API_URL)
    }

    /// Read overrides from `MERMAID_API_URL`, `MERMAID_TOKEN` and
    /// `MERMAID_TIMEOUT_SECS`. Unset, empty or unparsable values keep the
    /// defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();
        if let Some(url) = get(ENV_API_URL) {
            config.base_url = url;
        }
        config.token = get(ENV_TOKEN);
        if let Some(secs) = get(ENV_TIMEOUT_SECS).and_then(|v| v.trim().parse::<u64>().ok()) {
            config.timeout = Duration::from_secs(secs);
        }
        config
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}
