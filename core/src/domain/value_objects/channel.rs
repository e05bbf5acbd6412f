//! Verification channels.
//!
//! Email and phone verification share one implementation but never share
//! storage. Each channel is a zero-sized marker type, so a store or service
//! for one channel cannot be handed to code expecting the other, and an email
//! address and a phone number that happen to be the same string never meet in
//! the same map.

use mr_shared::utils::{email, phone};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Runtime name of a channel, used in logs and provider requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelKind {
    Email,
    Phone,
}

impl ChannelKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChannelKind::Email => "email",
            ChannelKind::Phone => "phone",
        }
    }

    /// Log-safe rendering of a contact value of this channel
    pub fn mask(&self, value: &str) -> String {
        match self {
            ChannelKind::Email => Email::mask(value),
            ChannelKind::Phone => Phone::mask(value),
        }
    }
}

impl fmt::Display for ChannelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A contact channel that can be verified.
pub trait Channel: Send + Sync + 'static {
    /// Runtime identity of the channel
    const KIND: ChannelKind;

    /// Canonical form of a raw contact value as typed into a form
    fn normalize(raw: &str) -> String;

    /// Syntactic validity of an already normalized contact value
    fn is_valid(normalized: &str) -> bool;

    /// Log-safe rendering of a contact value
    fn mask(value: &str) -> String;
}

/// Email channel marker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Email;

/// Phone channel marker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Phone;

impl Channel for Email {
    const KIND: ChannelKind = ChannelKind::Email;

    fn normalize(raw: &str) -> String {
        email::normalize_email(raw)
    }

    fn is_valid(normalized: &str) -> bool {
        email::is_valid_email(normalized)
    }

    fn mask(value: &str) -> String {
        email::mask_email(value)
    }
}

impl Channel for Phone {
    const KIND: ChannelKind = ChannelKind::Phone;

    fn normalize(raw: &str) -> String {
        phone::normalize_phone_number(raw)
    }

    fn is_valid(normalized: &str) -> bool {
        phone::is_valid_phone(normalized)
    }

    fn mask(value: &str) -> String {
        phone::mask_phone_number(value)
    }
}
