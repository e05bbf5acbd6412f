//! Email address utilities

use once_cell::sync::Lazy;
use regex::Regex;

// Pragmatic address check: local part, one @, dotted domain with a 2+ letter TLD
static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9\-]+(\.[A-Za-z0-9\-]+)*\.[A-Za-z]{2,}$")
        .expect("valid email regex")
});

/// Maximum length of an address (RFC 5321 path limit)
pub const MAX_EMAIL_LENGTH: usize = 254;

/// Normalize an email address: trim whitespace and lower-case it
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Check if an email address is syntactically valid
pub fn is_valid_email(email: &str) -> bool {
    let normalized = normalize_email(email);
    normalized.len() <= MAX_EMAIL_LENGTH && EMAIL_REGEX.is_match(&normalized)
}

/// Mask an email address for logs (e.g. d***@example.com)
pub fn mask_email(email: &str) -> String {
    match email.trim().split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => {
            let first: String = local.chars().take(1).collect();
            format!("{}***@{}", first, domain)
        }
        _ => "***".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Doctor@Example.COM "), "doctor@example.com");
        assert_eq!(normalize_email("pharmacy@example.org"), "pharmacy@example.org");
    }

    #[test]
    fn test_is_valid_email() {
        assert!(is_valid_email("doctor@example.com"));
        assert!(is_valid_email("dr.jane+clinic@mail.hospital.de"));
        assert!(is_valid_email(" Doctor@Example.com "));
        assert!(!is_valid_email("doctor@example"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("doctor.example.com"));
        assert!(!is_valid_email("doctor@@example.com"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn test_is_valid_email_rejects_overlong() {
        let local = "a".repeat(250);
        assert!(!is_valid_email(&format!("{}@example.com", local)));
    }

    #[test]
    fn test_mask_email() {
        assert_eq!(mask_email("doctor@example.com"), "d***@example.com");
        assert_eq!(mask_email("not-an-email"), "***");
        assert_eq!(mask_email("@example.com"), "***");
    }
}
