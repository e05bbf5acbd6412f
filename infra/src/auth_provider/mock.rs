//! Mock Auth Provider Implementation
//!
//! Issues codes locally instead of delivering them. Codes are written to the
//! log so a developer can complete verification by hand.

use async_trait::async_trait;
use rand::Rng;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{info, warn};
use uuid::Uuid;

use mr_core::domain::value_objects::ChannelKind;
use mr_core::services::AuthProviderTrait;

/// Mock auth provider for development and testing
///
/// This implementation:
/// - Generates a random six digit code per request
/// - Remembers the last code per channel and contact value
/// - Accepts each code once
/// - Can simulate provider outages
#[derive(Default)]
pub struct MockAuthProvider {
    codes: Mutex<HashMap<(ChannelKind, String), String>>,
    sent_count: AtomicU64,
    simulate_failure: AtomicBool,
    fixed_code: Option<String>,
}

impl MockAuthProvider {
    /// Create a new mock provider with random codes
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock provider that always issues `code`
    pub fn with_fixed_code(code: impl Into<String>) -> Self {
        Self {
            fixed_code: Some(code.into()),
            ..Self::default()
        }
    }

    /// Enable or disable failure simulation
    pub fn set_simulate_failure(&self, simulate: bool) {
        self.simulate_failure.store(simulate, Ordering::SeqCst);
    }

    /// Last code issued for a contact value that was not yet accepted
    pub fn last_code(&self, channel: ChannelKind, contact: &str) -> Option<String> {
        self.codes()
            .get(&(channel, contact.to_string()))
            .cloned()
    }

    /// Get the total number of codes issued
    pub fn sent_count(&self) -> u64 {
        self.sent_count.load(Ordering::SeqCst)
    }

    fn generate_code(&self) -> String {
        match &self.fixed_code {
            Some(code) => code.clone(),
            None => format!("{:06}", rand::thread_rng().gen_range(0..1_000_000)),
        }
    }

    fn codes(&self) -> MutexGuard<'_, HashMap<(ChannelKind, String), String>> {
        self.codes.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl AuthProviderTrait for MockAuthProvider {
    async fn send_code(&self, channel: ChannelKind, contact: &str) -> Result<String, String> {
        if self.simulate_failure.load(Ordering::SeqCst) {
            warn!(
                provider = "mock",
                channel = %channel,
                contact = %channel.mask(contact),
                "Mock auth provider simulating delivery failure"
            );
            return Err("Simulated auth provider failure".to_string());
        }

        let code = self.generate_code();
        let message_id = format!("mock_{}", Uuid::new_v4());
        self.codes()
            .insert((channel, contact.to_string()), code.clone());
        self.sent_count.fetch_add(1, Ordering::SeqCst);

        info!(
            provider = "mock",
            channel = %channel,
            contact = %channel.mask(contact),
            message_id = %message_id,
            code = %code,
            "Verification code issued (mock)"
        );
        Ok(message_id)
    }

    async fn verify_code(
        &self,
        channel: ChannelKind,
        contact: &str,
        code: &str,
    ) -> Result<bool, String> {
        if self.simulate_failure.load(Ordering::SeqCst) {
            return Err("Simulated auth provider failure".to_string());
        }

        let mut codes = self.codes();
        let key = (channel, contact.to_string());
        let accepted = codes.get(&key).is_some_and(|issued| issued == code);
        if accepted {
            codes.remove(&key);
        }
        Ok(accepted)
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PHONE: &str = "+14155552671";

    #[tokio::test]
    async fn test_mock_send_code_issues_six_digits() {
        let provider = MockAuthProvider::new();
        let message_id = provider.send_code(ChannelKind::Phone, PHONE).await.unwrap();

        assert!(message_id.starts_with("mock_"));
        let code = provider.last_code(ChannelKind::Phone, PHONE).unwrap();
        assert_eq!(code.len(), 6);
        assert!(code.chars().all(|c| c.is_ascii_digit()));
        assert_eq!(provider.sent_count(), 1);
    }

    #[tokio::test]
    async fn test_mock_verify_code_accepts_once() {
        let provider = MockAuthProvider::with_fixed_code("424242");
        provider.send_code(ChannelKind::Phone, PHONE).await.unwrap();

        assert!(!provider.verify_code(ChannelKind::Phone, PHONE, "000000").await.unwrap());
        assert!(provider.verify_code(ChannelKind::Phone, PHONE, "424242").await.unwrap());
        assert!(!provider.verify_code(ChannelKind::Phone, PHONE, "424242").await.unwrap());
    }

    #[tokio::test]
    async fn test_mock_codes_are_per_channel() {
        let provider = MockAuthProvider::with_fixed_code("424242");
        provider.send_code(ChannelKind::Email, PHONE).await.unwrap();

        assert!(provider.last_code(ChannelKind::Phone, PHONE).is_none());
        assert!(!provider.verify_code(ChannelKind::Phone, PHONE, "424242").await.unwrap());
    }

    #[tokio::test]
    async fn test_mock_simulate_failure() {
        let provider = MockAuthProvider::new();
        provider.set_simulate_failure(true);

        assert!(provider.send_code(ChannelKind::Email, "a@example.com").await.is_err());
        assert!(provider
            .verify_code(ChannelKind::Email, "a@example.com", "123456")
            .await
            .is_err());
        assert_eq!(provider.sent_count(), 0);
    }
}
