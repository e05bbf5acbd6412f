//! Code challenge entity: the client-side record of one code delivery.
//!
//! The auth provider owns the actual one-time code. A challenge only remembers
//! when the code was sent, until when it can be entered, when another one may
//! be requested, and how many submissions were made against it.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Maximum number of code submissions per challenge
pub const MAX_ATTEMPTS: u32 = 3;

/// Length of a one-time code
pub const CODE_LENGTH: usize = 6;

/// Default time a delivered code can be entered (10 minutes)
pub const DEFAULT_CODE_EXPIRATION_MINUTES: i64 = 10;

/// Default wait before another code can be requested
pub const DEFAULT_RESEND_COOLDOWN_SECONDS: i64 = 60;

/// One code delivery to a contact value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeChallenge {
    /// Unique identifier for the challenge
    pub id: Uuid,

    /// Normalized contact value the code was sent to
    pub contact: String,

    /// Request id returned by the auth provider
    pub provider_message_id: String,

    /// Number of submissions made
    pub attempts: u32,

    /// Maximum submissions allowed
    pub max_attempts: u32,

    /// When the code was sent
    pub sent_at: DateTime<Utc>,

    /// When the code stops being accepted
    pub expires_at: DateTime<Utc>,

    /// Earliest time another code may be requested
    pub resend_available_at: DateTime<Utc>,
}

impl CodeChallenge {
    /// Creates a challenge for a code sent at `now`
    pub fn new(
        contact: impl Into<String>,
        provider_message_id: impl Into<String>,
        now: DateTime<Utc>,
        code_expiry: Duration,
        resend_cooldown: Duration,
        max_attempts: u32,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            contact: contact.into(),
            provider_message_id: provider_message_id.into(),
            attempts: 0,
            max_attempts,
            sent_at: now,
            expires_at: now + code_expiry,
            resend_available_at: now + resend_cooldown,
        }
    }

    /// Checks if the code can no longer be entered
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Checks if all submissions were used up
    pub fn is_exhausted(&self) -> bool {
        self.attempts >= self.max_attempts
    }

    /// Checks if another code may be requested
    pub fn can_resend(&self, now: DateTime<Utc>) -> bool {
        now >= self.resend_available_at
    }

    /// Whole seconds until another code may be requested, rounded up
    pub fn seconds_until_resend(&self, now: DateTime<Utc>) -> i64 {
        if self.can_resend(now) {
            return 0;
        }
        let remaining = self.resend_available_at - now;
        let seconds = remaining.num_seconds();
        if remaining > Duration::seconds(seconds) {
            seconds + 1
        } else {
            seconds
        }
    }

    /// Gets the time remaining until expiration, or zero if expired
    pub fn time_until_expiration(&self, now: DateTime<Utc>) -> Duration {
        if self.expires_at > now {
            self.expires_at - now
        } else {
            Duration::zero()
        }
    }

    /// Gets the number of remaining submissions (0 if exceeded)
    pub fn remaining_attempts(&self) -> u32 {
        self.max_attempts.saturating_sub(self.attempts)
    }

    /// Counts one submission
    pub fn record_attempt(&mut self) {
        self.attempts = self.attempts.saturating_add(1);
    }
}

/// Checks that a submitted code has the expected shape
pub fn is_well_formed_code(code: &str) -> bool {
    code.len() == CODE_LENGTH && code.chars().all(|c| c.is_ascii_digit())
}
