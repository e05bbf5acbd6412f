//! Trait for auth provider integration

use async_trait::async_trait;

use crate::domain::value_objects::channel::ChannelKind;

/// Trait for the external auth provider that delivers and checks one-time codes
#[async_trait]
pub trait AuthProviderTrait: Send + Sync {
    /// Deliver a one-time code (or sign-in link) to the contact value.
    /// Returns the provider's message or request id.
    async fn send_code(&self, channel: ChannelKind, contact: &str) -> Result<String, String>;

    /// Check a submitted code. `Ok(false)` means the provider rejected it.
    async fn verify_code(
        &self,
        channel: ChannelKind,
        contact: &str,
        code: &str,
    ) -> Result<bool, String>;

    /// Provider name for logs
    fn provider_name(&self) -> &'static str;
}
