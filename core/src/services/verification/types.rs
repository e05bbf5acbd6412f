//! Types for verification service results

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Result of requesting a code
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestCodeOutcome {
    /// The contact value is already verified; no code was sent
    AlreadyVerified,
    /// A code was delivered by the auth provider
    CodeSent {
        /// Identifier of the new challenge
        challenge_id: Uuid,
        /// When the delivered code stops being accepted
        code_expires_at: DateTime<Utc>,
        /// When the user can request another code
        next_resend_at: DateTime<Utc>,
    },
}

/// Why a submitted code was not accepted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerifyFailure {
    /// Not a six digit code
    InvalidFormat,
    /// No code was requested for this contact value
    NoPendingChallenge,
    /// The code entry window has passed
    CodeExpired,
    /// All submissions for this challenge were used
    MaxAttemptsExceeded,
    /// The auth provider rejected the code
    InvalidCode,
}

impl VerifyFailure {
    /// User-facing message
    pub fn message(&self) -> &'static str {
        match self {
            VerifyFailure::InvalidFormat => "Invalid verification code format",
            VerifyFailure::NoPendingChallenge => "No verification code was requested",
            VerifyFailure::CodeExpired => "Verification code has expired. Please request a new code",
            VerifyFailure::MaxAttemptsExceeded => {
                "Maximum verification attempts exceeded. Please request a new code"
            }
            VerifyFailure::InvalidCode => "Invalid verification code",
        }
    }
}

/// Result of submitting a code
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifyCodeResult {
    /// Whether the verification was successful
    pub success: bool,
    /// Number of remaining attempts (if a submission was counted and failed)
    pub remaining_attempts: Option<u32>,
    /// Failure reason if verification failed
    pub failure: Option<VerifyFailure>,
}

impl VerifyCodeResult {
    pub fn verified() -> Self {
        Self {
            success: true,
            remaining_attempts: None,
            failure: None,
        }
    }

    pub fn failed(failure: VerifyFailure) -> Self {
        Self {
            success: false,
            remaining_attempts: None,
            failure: Some(failure),
        }
    }

    pub fn rejected(remaining_attempts: u32) -> Self {
        Self {
            success: false,
            remaining_attempts: Some(remaining_attempts),
            failure: Some(VerifyFailure::InvalidCode),
        }
    }

    /// User-facing error message, if any
    pub fn error_message(&self) -> Option<String> {
        match (self.failure, self.remaining_attempts) {
            (Some(VerifyFailure::InvalidCode), Some(remaining)) if remaining > 0 => Some(format!(
                "Invalid verification code. {} attempt(s) remaining",
                remaining
            )),
            (Some(VerifyFailure::InvalidCode), Some(_)) => {
                Some("Invalid verification code. No attempts remaining".to_string())
            }
            (Some(failure), _) => Some(failure.message().to_string()),
            (None, _) => None,
        }
    }
}
