//! Contact verification service implementation

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{error, info, warn};

use crate::domain::entities::code_challenge::{is_well_formed_code, CodeChallenge};
use crate::domain::entities::verification_session::{SessionState, VerificationMethod};
use crate::domain::value_objects::channel::{Channel, ChannelKind, Email, Phone};
use crate::errors::{DomainError, DomainResult};

use super::config::VerificationServiceConfig;
use super::store::VerificationSessionStore;
use super::traits::AuthProviderTrait;
use super::types::{RequestCodeOutcome, VerifyCodeResult, VerifyFailure};

/// Verification service for email addresses
pub type EmailVerificationService<A> = ContactVerificationService<A, Email>;

/// Verification service for phone numbers
pub type PhoneVerificationService<A> = ContactVerificationService<A, Phone>;

/// Drives verification of one channel against the auth provider.
///
/// The service owns the code challenges of its channel and records every
/// positive outcome in the channel's session store. Form components read
/// verification status from the store (directly or through this service)
/// without another round trip to the provider.
pub struct ContactVerificationService<A, C>
where
    A: AuthProviderTrait + ?Sized,
    C: Channel,
{
    /// Auth provider delivering and checking codes
    provider: Arc<A>,
    /// Session tracker for this channel
    store: Arc<VerificationSessionStore<C>>,
    /// Outstanding code challenges by normalized contact value
    challenges: Mutex<HashMap<String, CodeChallenge>>,
    /// Service configuration
    config: VerificationServiceConfig,
}

impl<A, C> ContactVerificationService<A, C>
where
    A: AuthProviderTrait + ?Sized,
    C: Channel,
{
    /// Create a new verification service
    ///
    /// # Arguments
    ///
    /// * `provider` - Auth provider implementation
    /// * `store` - Session tracker for the channel, shared with form components
    /// * `config` - Service configuration
    pub fn new(
        provider: Arc<A>,
        store: Arc<VerificationSessionStore<C>>,
        config: VerificationServiceConfig,
    ) -> Self {
        Self {
            provider,
            store,
            challenges: Mutex::new(HashMap::new()),
            config,
        }
    }

    /// Channel handled by this service
    pub fn channel(&self) -> ChannelKind {
        C::KIND
    }

    /// Session tracker backing this service
    pub fn store(&self) -> &Arc<VerificationSessionStore<C>> {
        &self.store
    }

    /// Service configuration
    pub fn config(&self) -> &VerificationServiceConfig {
        &self.config
    }

    /// Request a one-time code for a contact value
    ///
    /// This method:
    /// 1. Normalizes and validates the contact value
    /// 2. Skips the provider entirely if the contact is already verified
    /// 3. Enforces the resend cooldown of the previous challenge
    /// 4. Asks the auth provider to deliver a code
    /// 5. Starts (or restarts) the verification session and records the challenge
    ///
    /// # Returns
    ///
    /// * `Ok(RequestCodeOutcome)` - Code sent, or contact already verified
    /// * `Err(DomainError)` - Invalid contact, cooldown active, or provider failure
    pub async fn request_code(&self, raw_contact: &str) -> DomainResult<RequestCodeOutcome> {
        let contact = self.validated_contact(raw_contact)?;
        let masked = C::mask(&contact);

        if self.store.is_verified(&contact) {
            info!(
                channel = %C::KIND,
                contact = %masked,
                event = "code_request_skipped",
                "Contact already verified, no code sent"
            );
            return Ok(RequestCodeOutcome::AlreadyVerified);
        }

        let now = self.store.now();
        let is_resend = match self.challenges().get(&contact) {
            Some(previous) if !previous.can_resend(now) => {
                let retry_after_seconds = previous.seconds_until_resend(now);
                warn!(
                    channel = %C::KIND,
                    contact = %masked,
                    retry_after_seconds = retry_after_seconds,
                    event = "rate_limit_exceeded",
                    "Verification code requested during resend cooldown"
                );
                return Err(DomainError::RateLimited { retry_after_seconds });
            }
            Some(_) => true,
            None => false,
        };

        let message_id = self
            .provider
            .send_code(C::KIND, &contact)
            .await
            .map_err(|e| {
                error!(
                    channel = %C::KIND,
                    contact = %masked,
                    provider = self.provider.provider_name(),
                    error = %e,
                    event = "code_delivery_failed",
                    "Auth provider failed to deliver verification code"
                );
                DomainError::Provider {
                    message: format!("Failed to send verification code: {}", e),
                }
            })?;

        let sent_at = self.store.now();
        let challenge = CodeChallenge::new(
            contact.as_str(),
            message_id,
            sent_at,
            self.config.code_expiry,
            self.config.resend_cooldown,
            self.config.max_attempts,
        );

        // A delivered code replaces the previous one, so its session restarts too
        if is_resend {
            self.store.restart_verification(&contact);
        } else {
            self.store.start_verification(&contact);
        }

        let outcome = RequestCodeOutcome::CodeSent {
            challenge_id: challenge.id,
            code_expires_at: challenge.expires_at,
            next_resend_at: challenge.resend_available_at,
        };

        info!(
            channel = %C::KIND,
            contact = %masked,
            challenge_id = %challenge.id,
            resend = is_resend,
            event = "code_sent",
            "Verification code sent"
        );
        self.challenges().insert(contact, challenge);

        Ok(outcome)
    }

    /// Submit a one-time code for a contact value
    ///
    /// Expected failures (malformed, expired, exhausted or rejected codes) are
    /// reported in the result, not as errors. A successful check marks the
    /// contact as verified by code.
    ///
    /// # Returns
    ///
    /// * `Ok(VerifyCodeResult)` - Verification status and details
    /// * `Err(DomainError)` - Invalid contact or provider failure
    pub async fn submit_code(&self, raw_contact: &str, code: &str) -> DomainResult<VerifyCodeResult> {
        let contact = self.validated_contact(raw_contact)?;
        let masked = C::mask(&contact);
        let code = code.trim();

        if !is_well_formed_code(code) {
            warn!(
                channel = %C::KIND,
                contact = %masked,
                code_length = code.len(),
                event = "invalid_code_format",
                "Invalid verification code format provided"
            );
            return Ok(VerifyCodeResult::failed(VerifyFailure::InvalidFormat));
        }

        let now = self.store.now();
        // The attempt is counted before the provider call so concurrent
        // submissions cannot exceed the limit.
        let remaining_attempts = {
            let mut challenges = self.challenges();
            let Some(challenge) = challenges.get_mut(&contact) else {
                return Ok(VerifyCodeResult::failed(VerifyFailure::NoPendingChallenge));
            };
            if challenge.is_expired(now) {
                return Ok(VerifyCodeResult::failed(VerifyFailure::CodeExpired));
            }
            if challenge.is_exhausted() {
                return Ok(VerifyCodeResult::failed(VerifyFailure::MaxAttemptsExceeded));
            }
            challenge.record_attempt();
            challenge.remaining_attempts()
        };

        match self.provider.verify_code(C::KIND, &contact, code).await {
            Ok(true) => {
                self.store.mark_as_verified(&contact, VerificationMethod::Code);
                self.challenges().remove(&contact);
                info!(
                    channel = %C::KIND,
                    contact = %masked,
                    event = "code_verified",
                    "Verification code accepted"
                );
                Ok(VerifyCodeResult::verified())
            }
            Ok(false) => {
                warn!(
                    channel = %C::KIND,
                    contact = %masked,
                    remaining_attempts = remaining_attempts,
                    event = "code_rejected",
                    "Verification code rejected"
                );
                Ok(VerifyCodeResult::rejected(remaining_attempts))
            }
            Err(e) => {
                error!(
                    channel = %C::KIND,
                    contact = %masked,
                    provider = self.provider.provider_name(),
                    error = %e,
                    event = "code_verification_error",
                    "Auth provider failed to check verification code"
                );
                Err(DomainError::Provider {
                    message: format!("Failed to verify code: {}", e),
                })
            }
        }
    }

    /// Record a verification completed through a delivered sign-in link
    pub fn confirm_link(&self, raw_contact: &str) -> DomainResult<()> {
        let contact = self.validated_contact(raw_contact)?;

        self.store.mark_as_verified(&contact, VerificationMethod::Link);
        self.challenges().remove(&contact);
        info!(
            channel = %C::KIND,
            contact = %C::mask(&contact),
            event = "link_verified",
            "Contact verified through link"
        );
        Ok(())
    }

    /// Mark a syntactically valid contact as verified without a challenge.
    ///
    /// Only available when enabled in configuration. There is no delivery
    /// behind it, so production deployments keep it disabled.
    pub fn auto_verify(&self, raw_contact: &str) -> DomainResult<()> {
        if !self.config.allow_auto_verification {
            return Err(DomainError::BusinessRule {
                message: format!("Automatic {} verification is disabled", C::KIND),
            });
        }

        let contact = self.validated_contact(raw_contact)?;
        self.store.mark_as_verified(&contact, VerificationMethod::Auto);
        warn!(
            channel = %C::KIND,
            contact = %C::mask(&contact),
            event = "auto_verified",
            "Contact verified automatically without a challenge"
        );
        Ok(())
    }

    /// Whether the contact value is verified and unexpired
    pub fn is_verified(&self, raw_contact: &str) -> bool {
        self.store.is_verified(&C::normalize(raw_contact))
    }

    /// Whether verification is pending or complete and unexpired
    pub fn has_active_session(&self, raw_contact: &str) -> bool {
        self.store.has_active_session(&C::normalize(raw_contact))
    }

    /// Effective session state of the contact value
    pub fn session_state(&self, raw_contact: &str) -> SessionState {
        self.store.state(&C::normalize(raw_contact))
    }

    /// Keep a displayed contact's session from expiring
    pub fn keep_alive(&self, raw_contact: &str) {
        self.store.extend_session(&C::normalize(raw_contact));
    }

    /// Outstanding challenge for the contact value, for countdown displays
    pub fn challenge(&self, raw_contact: &str) -> Option<CodeChallenge> {
        self.challenges().get(&C::normalize(raw_contact)).cloned()
    }

    fn validated_contact(&self, raw_contact: &str) -> DomainResult<String> {
        let contact = C::normalize(raw_contact);
        if contact.is_empty() || !C::is_valid(&contact) {
            return Err(DomainError::Validation {
                message: format!("Invalid {} format", C::KIND),
            });
        }
        Ok(contact)
    }

    fn challenges(&self) -> MutexGuard<'_, HashMap<String, CodeChallenge>> {
        self.challenges.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
