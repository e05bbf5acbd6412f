//! Auth Provider Module
//!
//! Implementations of the core `AuthProviderTrait`, the seam through which
//! one-time codes are delivered and checked.
//!
//! - **Hosted**: REST client for a hosted auth API with retry and backoff
//! - **Mock**: Generates codes locally and logs them, for development and tests

use std::sync::Arc;
use tracing::info;

use mr_core::services::AuthProviderTrait;
use mr_shared::config::{AuthProviderConfig, ProviderKind};

use crate::InfrastructureError;

pub mod hosted;
pub mod mock;

pub use hosted::HostedAuthProvider;
pub use mock::MockAuthProvider;

/// Create an auth provider based on configuration
///
/// # Arguments
///
/// * `config` - Auth provider configuration
///
/// # Returns
///
/// The provider shared by the email and phone verification services
pub fn create_auth_provider(
    config: &AuthProviderConfig,
) -> Result<Arc<dyn AuthProviderTrait>, InfrastructureError> {
    let provider: Arc<dyn AuthProviderTrait> = match config.provider {
        ProviderKind::Mock => Arc::new(MockAuthProvider::new()),
        ProviderKind::Hosted => Arc::new(HostedAuthProvider::new(config.clone())?),
    };

    info!(provider = provider.provider_name(), "Auth provider created");
    Ok(provider)
}
