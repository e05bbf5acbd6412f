//! Contact gate for the registration wizard.
//!
//! A registration form shows one email and one phone field. The values can be
//! edited at any time, so verification is always checked against what is
//! currently entered: a verified old address does not carry over to a new one.

use std::sync::Arc;
use tracing::debug;

use crate::domain::value_objects::channel::{Channel, ChannelKind, Email, Phone};
use crate::services::verification::{EmailSessionStore, PhoneSessionStore};

/// Which contacts must be verified before the wizard may continue
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContactRequirements {
    pub email: bool,
    pub phone: bool,
}

impl ContactRequirements {
    /// Both email and phone required
    pub fn all() -> Self {
        Self {
            email: true,
            phone: true,
        }
    }
}

/// Current contact values of one registration form
#[derive(Debug)]
pub struct RegistrationContacts {
    email_store: Arc<EmailSessionStore>,
    phone_store: Arc<PhoneSessionStore>,
    email: String,
    phone: String,
}

impl RegistrationContacts {
    pub fn new(email_store: Arc<EmailSessionStore>, phone_store: Arc<PhoneSessionStore>) -> Self {
        Self {
            email_store,
            phone_store,
            email: String::new(),
            phone: String::new(),
        }
    }

    /// Replace the entered email address
    pub fn set_email(&mut self, value: &str) {
        self.email = Email::normalize(value);
        debug!(contact = %Email::mask(&self.email), "Registration email changed");
    }

    /// Replace the entered phone number
    pub fn set_phone(&mut self, value: &str) {
        self.phone = Phone::normalize(value);
        debug!(contact = %Phone::mask(&self.phone), "Registration phone changed");
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn phone(&self) -> &str {
        &self.phone
    }

    pub fn is_email_verified(&self) -> bool {
        self.email_store.is_verified(&self.email)
    }

    pub fn is_phone_verified(&self) -> bool {
        self.phone_store.is_verified(&self.phone)
    }

    /// Required channels whose current value is not verified
    pub fn missing_verifications(&self, requirements: &ContactRequirements) -> Vec<ChannelKind> {
        let mut missing = Vec::new();
        if requirements.email && !self.is_email_verified() {
            missing.push(ChannelKind::Email);
        }
        if requirements.phone && !self.is_phone_verified() {
            missing.push(ChannelKind::Phone);
        }
        missing
    }

    /// Whether the wizard may move past the contact step
    pub fn can_proceed(&self, requirements: &ContactRequirements) -> bool {
        self.missing_verifications(requirements).is_empty()
    }

    /// Extend the sessions of both current values while the form is shown
    pub fn keep_alive(&self) {
        self.email_store.extend_session(&self.email);
        self.phone_store.extend_session(&self.phone);
    }
}
