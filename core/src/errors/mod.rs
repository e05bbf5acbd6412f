//! Domain-specific error types and error handling.

use thiserror::Error;

/// Core domain errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Too many requests. Please wait {retry_after_seconds} seconds before requesting a new code")]
    RateLimited { retry_after_seconds: i64 },

    #[error("Auth provider error: {message}")]
    Provider { message: String },

    #[error("Business rule violation: {message}")]
    BusinessRule { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DomainError {
    /// Stable error code for programmatic handling by form components
    pub fn code(&self) -> &'static str {
        match self {
            DomainError::Validation { .. } => "VALIDATION_ERROR",
            DomainError::RateLimited { .. } => "RATE_LIMIT_EXCEEDED",
            DomainError::Provider { .. } => "AUTH_PROVIDER_FAILURE",
            DomainError::BusinessRule { .. } => "BUSINESS_RULE_VIOLATION",
            DomainError::Internal { .. } => "INTERNAL_ERROR",
        }
    }

    /// Whether retrying the same call later can succeed
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            DomainError::RateLimited { .. } | DomainError::Provider { .. }
        )
    }
}

pub type DomainResult<T> = Result<T, DomainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = DomainError::RateLimited { retry_after_seconds: 42 };
        assert_eq!(
            err.to_string(),
            "Too many requests. Please wait 42 seconds before requesting a new code"
        );

        let err = DomainError::Validation {
            message: "Invalid email address".to_string(),
        };
        assert_eq!(err.to_string(), "Validation error: Invalid email address");
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(
            DomainError::Provider { message: "timeout".into() }.code(),
            "AUTH_PROVIDER_FAILURE"
        );
        assert_eq!(
            DomainError::BusinessRule { message: "disabled".into() }.code(),
            "BUSINESS_RULE_VIOLATION"
        );
    }

    #[test]
    fn test_retryable() {
        assert!(DomainError::RateLimited { retry_after_seconds: 1 }.is_retryable());
        assert!(DomainError::Provider { message: "503".into() }.is_retryable());
        assert!(!DomainError::Validation { message: "bad".into() }.is_retryable());
    }
}
