//! Verification module for email and phone contact values
//!
//! This module provides:
//! - The verification session tracker (one store per channel) answering
//!   "has verification started?", "is it active?" and "is it verified?"
//!   without calling the auth provider
//! - A per-channel service that requests and checks one-time codes through the
//!   auth provider and records positive outcomes in the tracker
//! - Resend cooldown, code expiry and attempt tracking for code challenges

mod config;
mod service;
mod store;
mod traits;
mod types;

#[cfg(test)]
mod tests;

pub use config::VerificationServiceConfig;
pub use service::{ContactVerificationService, EmailVerificationService, PhoneVerificationService};
pub use store::{EmailSessionStore, PhoneSessionStore, VerificationSessionStore};
pub use traits::AuthProviderTrait;
pub use types::{RequestCodeOutcome, VerifyCodeResult, VerifyFailure};
