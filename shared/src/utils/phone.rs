//! Phone number utilities

use once_cell::sync::Lazy;
use regex::Regex;

// International phone number regex (E.164 format)
static INTERNATIONAL_PHONE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\+[1-9]\d{6,14}$").expect("valid E.164 regex")
});

// National number with a trunk prefix, e.g. 0412345678 or 01712345678
static NATIONAL_PHONE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^0\d{8,11}$").expect("valid national phone regex")
});

/// Normalize a phone number by removing common formatting characters
pub fn normalize_phone_number(phone: &str) -> String {
    phone
        .trim()
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '+')
        .collect()
}

/// Check if a phone number is valid (international E.164 format)
pub fn is_valid_international_phone(phone: &str) -> bool {
    let normalized = normalize_phone_number(phone);
    INTERNATIONAL_PHONE_REGEX.is_match(&normalized)
}

/// Check if a phone number is valid (E.164 or national with trunk prefix)
pub fn is_valid_phone(phone: &str) -> bool {
    let normalized = normalize_phone_number(phone);
    INTERNATIONAL_PHONE_REGEX.is_match(&normalized) || NATIONAL_PHONE_REGEX.is_match(&normalized)
}

/// Mask a phone number for logs, keeping the last 4 digits (e.g. +*******8901)
pub fn mask_phone_number(phone: &str) -> String {
    let normalized = normalize_phone_number(phone);
    let digits = normalized.trim_start_matches('+');
    if digits.len() < 7 {
        return "****".to_string();
    }

    let prefix = if normalized.starts_with('+') { "+" } else { "" };
    let visible = &digits[digits.len() - 4..];
    format!("{}{}{}", prefix, "*".repeat(digits.len() - 4), visible)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_phone_number() {
        assert_eq!(normalize_phone_number("0412-345-678"), "0412345678");
        assert_eq!(normalize_phone_number(" +49 171 234 5678 "), "+491712345678");
        assert_eq!(normalize_phone_number("(0412) 345 678"), "0412345678");
    }

    #[test]
    fn test_is_valid_international_phone() {
        assert!(is_valid_international_phone("+491712345678"));
        assert!(is_valid_international_phone("+14155552671"));
        assert!(is_valid_international_phone("+44 20 7183 8750"));
        assert!(!is_valid_international_phone("0412345678")); // Missing +
        assert!(!is_valid_international_phone("+0123456789")); // Invalid country code
        assert!(!is_valid_international_phone("+12345")); // Too short
    }

    #[test]
    fn test_is_valid_phone_accepts_national_numbers() {
        assert!(is_valid_phone("0412 345 678"));
        assert!(is_valid_phone("+61412345678"));
        assert!(!is_valid_phone("412"));
        assert!(!is_valid_phone("not a number"));
        assert!(!is_valid_phone(""));
    }

    #[test]
    fn test_mask_phone_number() {
        assert_eq!(mask_phone_number("+12345678901"), "+*******8901");
        assert_eq!(mask_phone_number("0412345678"), "******5678");
        assert_eq!(mask_phone_number("12345"), "****");
    }
}
