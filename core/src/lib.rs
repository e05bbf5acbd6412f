//! # MedReg Core
//!
//! Core domain layer for clinician and pharmacy registration.
//! This crate contains the verification session tracker used by the
//! registration wizard, the services that drive email and phone verification
//! against an external auth provider, and the domain error types.

pub mod domain;
pub mod errors;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::*;
pub use errors::*;
pub use services::*;
