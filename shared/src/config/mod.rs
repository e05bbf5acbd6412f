//! Configuration module with business-specific sub-modules
//!
//! This module organizes configuration into logical areas:
//! - `auth_provider` - Hosted auth provider connection settings
//! - `environment` - Environment detection
//! - `logging` - Log level and output format
//! - `verification` - Session TTLs, code expiry and resend cooldown

pub mod auth_provider;
pub mod environment;
pub mod logging;
pub mod verification;

use serde::{Deserialize, Serialize};
use std::path::Path;

// Re-export commonly used types
pub use auth_provider::{AuthProviderConfig, ProviderKind};
pub use environment::Environment;
pub use logging::{LogFormat, LoggingConfig};
pub use verification::VerificationConfig;

/// Prefix for environment variables read by [`AppConfig::load`]
pub const ENV_PREFIX: &str = "MEDREG";

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Environment configuration
    #[serde(default)]
    pub environment: Environment,

    /// Verification session and code challenge configuration
    #[serde(default)]
    pub verification: VerificationConfig,

    /// Auth provider configuration
    #[serde(default)]
    pub auth_provider: AuthProviderConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        let env = Environment::default();
        Self {
            environment: env,
            verification: VerificationConfig::default(),
            auth_provider: AuthProviderConfig::default(),
            logging: LoggingConfig::for_environment(env),
        }
    }
}

impl AppConfig {
    /// Create configuration for development environment
    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            verification: VerificationConfig::default(),
            auth_provider: AuthProviderConfig::default(),
            logging: LoggingConfig::for_environment(Environment::Development),
        }
    }

    /// Create configuration for production environment
    pub fn production() -> Self {
        Self {
            environment: Environment::Production,
            verification: VerificationConfig::default(),
            auth_provider: AuthProviderConfig {
                provider: ProviderKind::Hosted,
                ..Default::default()
            },
            logging: LoggingConfig::for_environment(Environment::Production),
        }
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let env = Environment::from_env();
        let mut config = match env {
            Environment::Production => Self::production(),
            Environment::Development | Environment::Staging => Self::development(),
        };
        config.environment = env;
        config.logging = LoggingConfig::for_environment(env);
        config.verification = VerificationConfig::from_env();
        config.auth_provider = AuthProviderConfig::from_env(config.auth_provider.provider);
        config
    }

    /// Load layered configuration: an optional TOML file, then
    /// `MEDREG__SECTION__KEY` environment variables on top of it.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ::config::ConfigError> {
        ::config::Config::builder()
            .add_source(::config::File::from(path.as_ref()).required(false))
            .add_source(
                ::config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_uses_mock_provider() {
        let config = AppConfig::default();
        assert_eq!(config.environment, Environment::Development);
        assert_eq!(config.auth_provider.provider, ProviderKind::Mock);
        assert!(!config.verification.auto_verify_phone);
    }

    #[test]
    fn test_production_config() {
        let config = AppConfig::production();
        assert!(config.environment.is_production());
        assert_eq!(config.auth_provider.provider, ProviderKind::Hosted);
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn test_deserialize_partial_toml() {
        let raw = r#"
            environment = "staging"

            [verification]
            email_session_ttl_seconds = 900
            auto_verify_phone = true

            [auth_provider]
            provider = "hosted"
            base_url = "https://auth.example.org"
            api_key = "anon-key"
        "#;

        let config: AppConfig = toml::from_str(raw).unwrap();
        assert_eq!(config.environment, Environment::Staging);
        assert_eq!(config.verification.email_session_ttl_seconds, 900);
        assert_eq!(config.verification.phone_session_ttl_seconds, 600);
        assert!(config.verification.auto_verify_phone);
        assert_eq!(config.auth_provider.provider, ProviderKind::Hosted);
        assert_eq!(config.auth_provider.request_timeout_secs, 10);
    }

    #[test]
    fn test_load_missing_file_falls_back_to_defaults() {
        let config = AppConfig::load("does-not-exist.toml").unwrap();
        assert_eq!(config.verification.code_expiry_seconds, 600);
        assert_eq!(config.auth_provider.max_retries, 3);
    }
}
