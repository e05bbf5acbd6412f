//! # Infrastructure Layer
//!
//! This crate wires the verification core to the outside world:
//!
//! - **Auth provider**: REST client for the hosted auth API and a mock
//!   implementation for development
//! - **Configuration**: `.env` files and layered TOML/environment loading
//! - **Composition root**: builds one session store per channel and the
//!   verification services on top of them, to be handed to form components

use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

use mr_core::services::{
    AuthProviderTrait, Clock, EmailSessionStore, EmailVerificationService, PhoneSessionStore,
    PhoneVerificationService, RegistrationContacts, SystemClock, VerificationServiceConfig,
};
use mr_shared::config::{AppConfig, Environment, ProviderKind};

// Re-export core types for convenience
pub use mr_core::errors::*;

/// Auth provider module - Hosted REST client and mock implementation
pub mod auth_provider;

pub use auth_provider::{create_auth_provider, HostedAuthProvider, MockAuthProvider};

/// Verification stores and services shared by every registration form
#[derive(Clone)]
pub struct VerificationServices {
    /// Email session tracker
    pub email_store: Arc<EmailSessionStore>,
    /// Phone session tracker
    pub phone_store: Arc<PhoneSessionStore>,
    /// Email verification service
    pub email: Arc<EmailVerificationService<dyn AuthProviderTrait>>,
    /// Phone verification service
    pub phone: Arc<PhoneVerificationService<dyn AuthProviderTrait>>,
}

impl VerificationServices {
    /// Build stores and services from configuration
    ///
    /// # Arguments
    ///
    /// * `config` - Application configuration
    /// * `provider` - Auth provider shared by both channels
    /// * `clock` - Time source for sessions and code challenges
    pub fn new(
        config: &AppConfig,
        provider: Arc<dyn AuthProviderTrait>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let email_store = Arc::new(EmailSessionStore::from_config(&config.verification, clock.clone()));
        let phone_store = Arc::new(PhoneSessionStore::from_config(&config.verification, clock));

        let email = Arc::new(EmailVerificationService::new(
            provider.clone(),
            email_store.clone(),
            VerificationServiceConfig::email(&config.verification),
        ));
        let phone = Arc::new(PhoneVerificationService::new(
            provider,
            phone_store.clone(),
            VerificationServiceConfig::phone(&config.verification),
        ));

        Self {
            email_store,
            phone_store,
            email,
            phone,
        }
    }

    /// Contact gate for a new registration form
    pub fn registration_contacts(&self) -> RegistrationContacts {
        RegistrationContacts::new(self.email_store.clone(), self.phone_store.clone())
    }
}

/// Initialize verification services
///
/// This function sets up:
/// - The auth provider selected in configuration
/// - One session store per channel on the wall clock
/// - The email and phone verification services
pub fn initialize(config: &AppConfig) -> Result<VerificationServices, InfrastructureError> {
    info!(
        environment = %config.environment,
        provider = ?config.auth_provider.provider,
        "Initializing verification services..."
    );

    validate_config(config)?;
    let provider = create_auth_provider(&config.auth_provider)?;
    let services = VerificationServices::new(config, provider, Arc::new(SystemClock));

    info!("Verification services initialized successfully");
    Ok(services)
}

/// Load configuration for the current environment
///
/// Reads the environment's `.env` file (then `.env`), and the environment's
/// TOML file with `MEDREG__` overrides when it exists. Without a TOML file
/// the plain environment variables are used.
pub fn load_config() -> Result<AppConfig, InfrastructureError> {
    let environment = Environment::from_env();
    dotenvy::from_filename(environment.env_file()).ok();
    dotenvy::dotenv().ok(); // Load .env file if present

    let config_file = environment.config_file();
    let path = Path::new(&config_file);
    let config = if path.exists() {
        info!(path = %path.display(), "Loading configuration file");
        AppConfig::load(path)?
    } else {
        AppConfig::from_env()
    };

    validate_config(&config)?;
    Ok(config)
}

/// Reject configurations that cannot work at runtime
pub fn validate_config(config: &AppConfig) -> Result<(), InfrastructureError> {
    let verification = &config.verification;
    if verification.email_session_ttl_seconds == 0 || verification.phone_session_ttl_seconds == 0 {
        return Err(InfrastructureError::Config(
            "Verification session TTL must be greater than zero".to_string(),
        ));
    }
    if verification.max_attempts == 0 {
        return Err(InfrastructureError::Config(
            "Verification max_attempts must be greater than zero".to_string(),
        ));
    }

    match config.auth_provider.provider {
        ProviderKind::Hosted if config.auth_provider.api_key.is_empty() => {
            Err(InfrastructureError::Config(
                "AUTH_PROVIDER_API_KEY must be set for the hosted auth provider".to_string(),
            ))
        }
        ProviderKind::Mock if config.environment.is_production() => {
            warn!("Mock auth provider configured in production, codes are not delivered");
            Ok(())
        }
        _ => Ok(()),
    }
}

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// HTTP request error for external services
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Configuration file or environment could not be read
    #[error("Configuration error: {0}")]
    Settings(#[from] config::ConfigError),

    /// Auth provider error
    #[error("Auth provider error: {0}")]
    Provider(String),
}
