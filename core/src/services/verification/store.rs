//! Verification session tracker.
//!
//! One store exists per channel. It is an in-memory map from the exact contact
//! string to its [`VerificationSession`], shared through `Arc` by every
//! component of a registration flow. Sessions are never removed; the map keeps
//! history by contact value until the store is dropped.
//!
//! No operation fails. Absent, empty and expired keys read as "not active" and
//! "not verified", mutators on them are no-ops where creating state would
//! produce a false positive.

use chrono::{DateTime, Duration, Utc};
use mr_shared::config::VerificationConfig;
use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::debug;

use crate::domain::entities::verification_session::{
    SessionState, VerificationMethod, VerificationSession,
};
use crate::domain::value_objects::channel::{Channel, ChannelKind, Email, Phone};
use crate::services::clock::{Clock, SystemClock};

use super::config::seconds;

/// Session store for email addresses
pub type EmailSessionStore = VerificationSessionStore<Email>;

/// Session store for phone numbers
pub type PhoneSessionStore = VerificationSessionStore<Phone>;

/// Verification session tracker for one channel
pub struct VerificationSessionStore<C: Channel> {
    sessions: Mutex<HashMap<String, VerificationSession>>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
    _channel: PhantomData<fn() -> C>,
}

impl<C: Channel> VerificationSessionStore<C> {
    /// Create a store on the wall clock
    pub fn new(ttl: Duration) -> Self {
        Self::with_clock(ttl, Arc::new(SystemClock))
    }

    /// Create a store on an injected clock
    pub fn with_clock(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            ttl,
            clock,
            _channel: PhantomData,
        }
    }

    /// Create a store with the channel's configured TTL
    pub fn from_config(config: &VerificationConfig, clock: Arc<dyn Clock>) -> Self {
        let ttl = match C::KIND {
            ChannelKind::Email => config.email_session_ttl_seconds,
            ChannelKind::Phone => config.phone_session_ttl_seconds,
        };
        Self::with_clock(seconds(ttl), clock)
    }

    /// Session validity window
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Current time on the store's clock
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Channel this store tracks
    pub fn channel(&self) -> ChannelKind {
        C::KIND
    }

    /// True if a pending or verified session exists and has not expired.
    pub fn has_active_session(&self, contact: &str) -> bool {
        let now = self.clock.now();
        self.lock()
            .get(contact)
            .is_some_and(|session| session.is_active_at(now))
    }

    /// True only if the session is verified and has not expired.
    pub fn is_verified(&self, contact: &str) -> bool {
        let now = self.clock.now();
        self.lock()
            .get(contact)
            .is_some_and(|session| session.is_verified_at(now))
    }

    /// Effective state at the current time
    pub fn state(&self, contact: &str) -> SessionState {
        let now = self.clock.now();
        self.lock()
            .get(contact)
            .map_or(SessionState::NotStarted, |session| session.effective_state(now))
    }

    /// Snapshot of the session with lazy expiry applied to `state`
    pub fn session(&self, contact: &str) -> Option<VerificationSession> {
        let now = self.clock.now();
        self.lock()
            .get(contact)
            .map(|session| session.snapshot_at(now))
    }

    /// Begin verification for a contact value.
    ///
    /// Creates a pending session, or re-arms an expired one. A session that is
    /// still pending or verified is left untouched so its deadline does not
    /// restart.
    pub fn start_verification(&self, contact: &str) {
        if contact.is_empty() {
            debug!(channel = %C::KIND, "Ignoring start_verification for empty contact value");
            return;
        }

        let now = self.clock.now();
        let mut sessions = self.lock();

        if let Some(session) = sessions.get(contact) {
            if session.is_active_at(now) {
                debug!(
                    channel = %C::KIND,
                    contact = %C::mask(contact),
                    state = ?session.state,
                    "Verification session already active"
                );
                return;
            }
        }

        sessions.insert(
            contact.to_string(),
            VerificationSession::pending(contact, now, self.ttl),
        );
        debug!(
            channel = %C::KIND,
            contact = %C::mask(contact),
            event = "verification_started",
            "Verification session started"
        );
    }

    /// Replace any session for the contact value with a fresh pending one.
    ///
    /// Cancel-and-restart, used when a new code is delivered.
    pub fn restart_verification(&self, contact: &str) {
        if contact.is_empty() {
            debug!(channel = %C::KIND, "Ignoring restart_verification for empty contact value");
            return;
        }

        let now = self.clock.now();
        self.lock().insert(
            contact.to_string(),
            VerificationSession::pending(contact, now, self.ttl),
        );
        debug!(
            channel = %C::KIND,
            contact = %C::mask(contact),
            event = "verification_restarted",
            "Verification session restarted"
        );
    }

    /// Record that the contact value was confirmed.
    ///
    /// Creates the session when none is active, so callers that confirm a
    /// contact without a prior `start_verification` still get a verified
    /// session with a full validity window.
    pub fn mark_as_verified(&self, contact: &str, method: VerificationMethod) {
        if contact.is_empty() {
            debug!(channel = %C::KIND, "Ignoring mark_as_verified for empty contact value");
            return;
        }

        let now = self.clock.now();
        let mut sessions = self.lock();

        match sessions.get_mut(contact) {
            Some(session) if session.is_active_at(now) => session.mark_verified(method, now),
            _ => {
                sessions.insert(
                    contact.to_string(),
                    VerificationSession::verified(contact, method, now, self.ttl),
                );
            }
        }
        debug!(
            channel = %C::KIND,
            contact = %C::mask(contact),
            method = ?method,
            event = "verification_completed",
            "Contact marked as verified"
        );
    }

    /// Push the deadline of an active session to now + TTL.
    ///
    /// Absent or already expired sessions are left alone; extending must never
    /// bring a verified state back to life.
    pub fn extend_session(&self, contact: &str) {
        let now = self.clock.now();
        let mut sessions = self.lock();

        match sessions.get_mut(contact) {
            Some(session) if session.is_active_at(now) => {
                session.extend(now, self.ttl);
                debug!(
                    channel = %C::KIND,
                    contact = %C::mask(contact),
                    expires_at = %session.expires_at,
                    "Verification session extended"
                );
            }
            Some(_) => {
                debug!(
                    channel = %C::KIND,
                    contact = %C::mask(contact),
                    "Not extending expired verification session"
                );
            }
            None => {}
        }
    }

    /// Number of contact values ever tracked
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, VerificationSession>> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<C: Channel> std::fmt::Debug for VerificationSessionStore<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VerificationSessionStore")
            .field("channel", &C::KIND)
            .field("ttl", &self.ttl)
            .field("sessions", &self.len())
            .finish()
    }
}
