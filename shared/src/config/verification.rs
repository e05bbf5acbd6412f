//! Verification session and code challenge configuration

use serde::{Deserialize, Serialize};

/// Verification configuration shared by the email and phone channels
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct VerificationConfig {
    /// How long an email verification session stays valid, in seconds
    pub email_session_ttl_seconds: u64,

    /// How long a phone verification session stays valid, in seconds
    pub phone_session_ttl_seconds: u64,

    /// How long a one-time code can be entered after it was sent, in seconds
    pub code_expiry_seconds: u64,

    /// Minimum seconds between two code requests for the same contact
    pub resend_cooldown_seconds: u64,

    /// Maximum code submissions per challenge
    pub max_attempts: u32,

    /// Mark syntactically valid phone numbers as verified without a challenge.
    /// Development only; there is no SMS one-time code behind it.
    pub auto_verify_phone: bool,
}

impl Default for VerificationConfig {
    fn default() -> Self {
        Self {
            email_session_ttl_seconds: 600,  // 10 minutes
            phone_session_ttl_seconds: 600,  // 10 minutes
            code_expiry_seconds: 600,        // 10 minutes
            resend_cooldown_seconds: 60,
            max_attempts: 3,
            auto_verify_phone: false,
        }
    }
}

impl VerificationConfig {
    /// Create from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            email_session_ttl_seconds: env_or("VERIFICATION_EMAIL_SESSION_TTL", defaults.email_session_ttl_seconds),
            phone_session_ttl_seconds: env_or("VERIFICATION_PHONE_SESSION_TTL", defaults.phone_session_ttl_seconds),
            code_expiry_seconds: env_or("VERIFICATION_CODE_EXPIRY", defaults.code_expiry_seconds),
            resend_cooldown_seconds: env_or("VERIFICATION_RESEND_COOLDOWN", defaults.resend_cooldown_seconds),
            max_attempts: env_or("VERIFICATION_MAX_ATTEMPTS", defaults.max_attempts),
            auto_verify_phone: env_or("VERIFICATION_AUTO_VERIFY_PHONE", defaults.auto_verify_phone),
        }
    }

    /// Set both session TTLs
    pub fn with_session_ttl(mut self, seconds: u64) -> Self {
        self.email_session_ttl_seconds = seconds;
        self.phone_session_ttl_seconds = seconds;
        self
    }

    /// Set the resend cooldown
    pub fn with_resend_cooldown(mut self, seconds: u64) -> Self {
        self.resend_cooldown_seconds = seconds;
        self
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
