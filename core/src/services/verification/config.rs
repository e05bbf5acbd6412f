//! Configuration for the verification services

use chrono::Duration;
use mr_shared::config::VerificationConfig;

use crate::domain::entities::code_challenge::{
    DEFAULT_CODE_EXPIRATION_MINUTES, DEFAULT_RESEND_COOLDOWN_SECONDS, MAX_ATTEMPTS,
};

/// Per-channel configuration for a contact verification service
#[derive(Debug, Clone)]
pub struct VerificationServiceConfig {
    /// How long a delivered code can be entered
    pub code_expiry: Duration,
    /// Minimum time between code requests for the same contact
    pub resend_cooldown: Duration,
    /// Maximum code submissions per challenge
    pub max_attempts: u32,
    /// Allow confirming contacts without a challenge
    pub allow_auto_verification: bool,
}

impl Default for VerificationServiceConfig {
    fn default() -> Self {
        Self {
            code_expiry: Duration::minutes(DEFAULT_CODE_EXPIRATION_MINUTES),
            resend_cooldown: Duration::seconds(DEFAULT_RESEND_COOLDOWN_SECONDS),
            max_attempts: MAX_ATTEMPTS,
            allow_auto_verification: false,
        }
    }
}

impl VerificationServiceConfig {
    /// Email channel settings; automatic verification is never offered for email
    pub fn email(config: &VerificationConfig) -> Self {
        Self {
            allow_auto_verification: false,
            ..Self::from_shared(config)
        }
    }

    /// Phone channel settings
    pub fn phone(config: &VerificationConfig) -> Self {
        Self {
            allow_auto_verification: config.auto_verify_phone,
            ..Self::from_shared(config)
        }
    }

    fn from_shared(config: &VerificationConfig) -> Self {
        Self {
            code_expiry: seconds(config.code_expiry_seconds),
            resend_cooldown: seconds(config.resend_cooldown_seconds),
            max_attempts: config.max_attempts,
            allow_auto_verification: false,
        }
    }
}

/// Upper bound for configured durations (ten years)
const MAX_CONFIGURED_SECONDS: u64 = 10 * 365 * 24 * 60 * 60;

/// Convert configured seconds to a duration, clamped to a sane upper bound
pub(crate) fn seconds(value: u64) -> Duration {
    Duration::seconds(value.min(MAX_CONFIGURED_SECONDS) as i64)
}
