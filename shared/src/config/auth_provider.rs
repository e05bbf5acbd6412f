//! Hosted auth provider configuration

use serde::{Deserialize, Serialize};

/// Which auth provider implementation to wire up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// In-process mock that logs codes instead of delivering them
    #[default]
    Mock,
    /// Hosted auth REST API
    Hosted,
}

impl std::str::FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mock" => Ok(ProviderKind::Mock),
            "hosted" => Ok(ProviderKind::Hosted),
            _ => Err(format!("Invalid auth provider: {}", s)),
        }
    }
}

/// Auth provider connection settings
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AuthProviderConfig {
    /// Provider implementation
    pub provider: ProviderKind,

    /// Base URL of the hosted auth API (e.g. `https://project.example.co`)
    pub base_url: String,

    /// Public API key sent with every request
    pub api_key: String,

    /// Timeout for a single request in seconds
    pub request_timeout_secs: u64,

    /// Maximum attempts for retryable failures (429, 5xx, transport errors)
    pub max_retries: u32,

    /// Initial retry delay in milliseconds, doubled after every attempt
    pub retry_delay_ms: u64,
}

impl Default for AuthProviderConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::Mock,
            base_url: String::from("http://localhost:54321"),
            api_key: String::new(),
            request_timeout_secs: 10,
            max_retries: 3,
            retry_delay_ms: 500,
        }
    }
}

impl AuthProviderConfig {
    /// Create from environment variables
    pub fn from_env(default_provider: ProviderKind) -> Self {
        let defaults = Self::default();
        Self {
            provider: std::env::var("AUTH_PROVIDER")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default_provider),
            base_url: std::env::var("AUTH_PROVIDER_URL").unwrap_or(defaults.base_url),
            api_key: std::env::var("AUTH_PROVIDER_API_KEY").unwrap_or_default(),
            request_timeout_secs: std::env::var("AUTH_PROVIDER_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.request_timeout_secs),
            max_retries: std::env::var("AUTH_PROVIDER_MAX_RETRIES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_retries),
            retry_delay_ms: std::env::var("AUTH_PROVIDER_RETRY_DELAY_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.retry_delay_ms),
        }
    }

    /// Create a hosted provider configuration
    pub fn hosted(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            provider: ProviderKind::Hosted,
            base_url: base_url.into(),
            api_key: api_key.into(),
            ..Default::default()
        }
    }

    /// Build an endpoint URL below the configured base URL
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}
