//! Verification session entity tracking one contact value.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Default session validity window (10 minutes)
pub const DEFAULT_SESSION_TTL_MINUTES: i64 = 10;

/// Lifecycle state of a verification session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionState {
    /// Verification was never started for this contact value
    NotStarted,
    /// A challenge is outstanding
    Pending,
    /// The contact value was confirmed
    Verified,
    /// The session outlived its deadline before or after verification
    Expired,
}

/// How a contact value was confirmed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VerificationMethod {
    /// Accepted without a challenge
    Auto,
    /// One-time code entered by the user
    Code,
    /// Link opened from a delivered message
    Link,
}

/// Verification lifecycle of one contact value.
///
/// Expiry is lazy: the stored `state` is never rewritten to `Expired`. Readers
/// ask [`VerificationSession::effective_state`] with the current time instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationSession {
    /// The exact email address or phone number this session tracks
    pub contact_value: String,

    /// Stored state (`Pending` or `Verified` for sessions held by a store)
    pub state: SessionState,

    /// When verification began
    pub started_at: DateTime<Utc>,

    /// When the contact value was confirmed
    pub verified_at: Option<DateTime<Utc>>,

    /// How the contact value was confirmed
    pub verification_method: Option<VerificationMethod>,

    /// Deadline after which the session reads as expired
    pub expires_at: DateTime<Utc>,
}

impl VerificationSession {
    /// Creates a pending session starting at `now`
    pub fn pending(contact_value: impl Into<String>, now: DateTime<Utc>, ttl: Duration) -> Self {
        Self {
            contact_value: contact_value.into(),
            state: SessionState::Pending,
            started_at: now,
            verified_at: None,
            verification_method: None,
            expires_at: now + ttl,
        }
    }

    /// Creates a session that is verified from the start.
    ///
    /// Used when a contact is confirmed without a prior `start_verification`,
    /// e.g. the automatic phone path.
    pub fn verified(
        contact_value: impl Into<String>,
        method: VerificationMethod,
        now: DateTime<Utc>,
        ttl: Duration,
    ) -> Self {
        let mut session = Self::pending(contact_value, now, ttl);
        session.mark_verified(method, now);
        session
    }

    /// Whether the deadline has passed at `now`
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// State as observed at `now`, with lazy expiry applied
    pub fn effective_state(&self, now: DateTime<Utc>) -> SessionState {
        match self.state {
            SessionState::Pending | SessionState::Verified if self.is_expired_at(now) => {
                SessionState::Expired
            }
            state => state,
        }
    }

    /// Pending or verified, and not past the deadline
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        matches!(
            self.effective_state(now),
            SessionState::Pending | SessionState::Verified
        )
    }

    /// Verified and not past the deadline
    pub fn is_verified_at(&self, now: DateTime<Utc>) -> bool {
        self.effective_state(now) == SessionState::Verified
    }

    /// Transitions to `Verified`; the deadline is left unchanged
    pub fn mark_verified(&mut self, method: VerificationMethod, now: DateTime<Utc>) {
        self.state = SessionState::Verified;
        self.verified_at = Some(now);
        self.verification_method = Some(method);
    }

    /// Pushes the deadline to `now + ttl` without touching the state
    pub fn extend(&mut self, now: DateTime<Utc>, ttl: Duration) {
        self.expires_at = now + ttl;
    }

    /// Time left until the deadline, or zero once it has passed
    pub fn time_until_expiration(&self, now: DateTime<Utc>) -> Duration {
        if self.expires_at > now {
            self.expires_at - now
        } else {
            Duration::zero()
        }
    }

    /// Copy of this session with `state` replaced by the effective state
    pub fn snapshot_at(&self, now: DateTime<Utc>) -> Self {
        Self {
            state: self.effective_state(now),
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ttl() -> Duration {
        Duration::minutes(DEFAULT_SESSION_TTL_MINUTES)
    }

    #[test]
    fn test_pending_session() {
        let now = Utc::now();
        let session = VerificationSession::pending("doctor@example.com", now, ttl());

        assert_eq!(session.contact_value, "doctor@example.com");
        assert_eq!(session.state, SessionState::Pending);
        assert_eq!(session.started_at, now);
        assert_eq!(session.expires_at, now + ttl());
        assert!(session.verified_at.is_none());
        assert!(session.verification_method.is_none());
        assert!(session.is_active_at(now));
        assert!(!session.is_verified_at(now));
    }

    #[test]
    fn test_verified_session_created_directly() {
        let now = Utc::now();
        let session =
            VerificationSession::verified("+491712345678", VerificationMethod::Auto, now, ttl());

        assert_eq!(session.state, SessionState::Verified);
        assert_eq!(session.verified_at, Some(now));
        assert_eq!(session.verification_method, Some(VerificationMethod::Auto));
        assert!(session.is_verified_at(now));
    }

    #[test]
    fn test_lazy_expiry() {
        let start = Utc::now();
        let mut session = VerificationSession::pending("doctor@example.com", start, ttl());

        let before_deadline = start + ttl() - Duration::seconds(1);
        assert_eq!(session.effective_state(before_deadline), SessionState::Pending);

        let at_deadline = start + ttl();
        assert_eq!(session.effective_state(at_deadline), SessionState::Expired);
        // Stored state is untouched
        assert_eq!(session.state, SessionState::Pending);

        session.mark_verified(VerificationMethod::Code, start + Duration::seconds(5));
        assert_eq!(session.effective_state(before_deadline), SessionState::Verified);
        assert_eq!(session.effective_state(at_deadline), SessionState::Expired);
        assert!(!session.is_active_at(at_deadline));
    }

    #[test]
    fn test_mark_verified_keeps_deadline() {
        let start = Utc::now();
        let mut session = VerificationSession::pending("doctor@example.com", start, ttl());
        let deadline = session.expires_at;

        session.mark_verified(VerificationMethod::Link, start + Duration::minutes(3));
        assert_eq!(session.expires_at, deadline);
        assert_eq!(session.verification_method, Some(VerificationMethod::Link));
    }

    #[test]
    fn test_extend_moves_deadline_only() {
        let start = Utc::now();
        let mut session =
            VerificationSession::verified("doctor@example.com", VerificationMethod::Code, start, ttl());

        let later = start + Duration::minutes(5);
        session.extend(later, ttl());
        assert_eq!(session.expires_at, later + ttl());
        assert_eq!(session.state, SessionState::Verified);
        assert_eq!(session.started_at, start);
    }

    #[test]
    fn test_time_until_expiration() {
        let start = Utc::now();
        let session = VerificationSession::pending("doctor@example.com", start, ttl());

        assert_eq!(session.time_until_expiration(start), ttl());
        assert_eq!(
            session.time_until_expiration(start + Duration::minutes(15)),
            Duration::zero()
        );
    }

    #[test]
    fn test_snapshot_reports_effective_state() {
        let start = Utc::now();
        let session = VerificationSession::pending("doctor@example.com", start, ttl());

        let snapshot = session.snapshot_at(start + Duration::hours(1));
        assert_eq!(snapshot.state, SessionState::Expired);
        assert_eq!(snapshot.expires_at, session.expires_at);
    }

    #[test]
    fn test_serialization() {
        let session = VerificationSession::verified(
            "doctor@example.com",
            VerificationMethod::Code,
            Utc::now(),
            ttl(),
        );

        let json = serde_json::to_string(&session).unwrap();
        assert!(json.contains("\"VERIFIED\""));
        assert!(json.contains("\"CODE\""));

        let deserialized: VerificationSession = serde_json::from_str(&json).unwrap();
        assert_eq!(session, deserialized);
    }
}
