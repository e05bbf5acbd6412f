//! Shared utilities and common types for MedReg services
//!
//! This crate provides common functionality used across all workspace crates:
//! - Configuration types
//! - Logging bootstrap
//! - Contact utilities (email and phone normalization, validation, masking)

pub mod config;
pub mod logging;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, AuthProviderConfig, Environment, LogFormat, LoggingConfig, ProviderKind,
    VerificationConfig,
};
pub use logging::init_logging;
pub use utils::{email, phone};
