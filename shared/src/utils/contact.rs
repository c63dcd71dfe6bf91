//! Contact identifier validation and masking
//!
//! Supports the two contact forms used as throttling keys: phone numbers in
//! E.164 format (SMS and chat channels) and email addresses (email channel).
//! Identifiers are personal data, so anything that reaches a log line goes
//! through [`mask_contact`] first.

use once_cell::sync::Lazy;
use regex::Regex;

/// Regular expression for valid E.164 format
/// E.164 format: + followed by 1-3 digit country code (no leading 0) and up to 14 total digits
static E164_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\+[1-9]\d{6,14}$").unwrap());

/// Regular expression for email addresses; intentionally permissive, the
/// delivery provider is the final arbiter
static EMAIL_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap());

/// Validates that a phone number is in E.164 format
pub fn is_valid_e164(phone: &str) -> bool {
    E164_REGEX.is_match(phone)
}

/// Validates an email address
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_REGEX.is_match(email)
}

/// Normalizes a phone number: strips spaces, dashes, and parentheses
pub fn normalize_phone(raw: &str) -> String {
    raw.chars()
        .filter(|c| !matches!(c, ' ' | '-' | '(' | ')' | '.'))
        .collect()
}

/// Normalizes an email address: trims whitespace and lowercases
pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Masks a contact identifier for logging
///
/// Phone numbers keep the country prefix and the last two digits; emails keep
/// the first character of the local part and the domain.
pub fn mask_contact(contact: &str) -> String {
    if contact.contains('@') {
        match contact.split_once('@') {
            Some((local, domain)) if !local.is_empty() => {
                let first = local.chars().next().unwrap_or('*');
                format!("{}***@{}", first, domain)
            }
            _ => String::from("***"),
        }
    } else {
        // Raw input may carry multibyte characters; split on char counts,
        // never byte offsets.
        let chars: Vec<char> = contact.chars().collect();
        if chars.len() > 6 {
            let head: String = chars[..4].iter().collect();
            let tail: String = chars[chars.len() - 2..].iter().collect();
            format!("{}****{}", head, tail)
        } else {
            String::from("****")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_e164_numbers() {
        assert!(is_valid_e164("+237698765432"));
        assert!(is_valid_e164("+61412345678"));
        assert!(is_valid_e164("+8613812345678"));
    }

    #[test]
    fn invalid_e164_numbers() {
        assert!(!is_valid_e164("698765432")); // missing +
        assert!(!is_valid_e164("+0123456789")); // leading zero country code
        assert!(!is_valid_e164("+12")); // too short
        assert!(!is_valid_e164("+1234567890123456789")); // too long
        assert!(!is_valid_e164("+1-234-567")); // punctuation
    }

    #[test]
    fn valid_emails() {
        assert!(is_valid_email("user@example.com"));
        assert!(is_valid_email("first.last@sub.example.org"));
    }

    #[test]
    fn invalid_emails() {
        assert!(!is_valid_email("user"));
        assert!(!is_valid_email("user@"));
        assert!(!is_valid_email("user@domain"));
        assert!(!is_valid_email("us er@example.com"));
    }

    #[test]
    fn normalize_phone_strips_punctuation() {
        assert_eq!(normalize_phone("+1 (234) 567-8901"), "+12345678901");
    }

    #[test]
    fn normalize_email_lowercases() {
        assert_eq!(normalize_email("  User@Example.COM "), "user@example.com");
    }

    #[test]
    fn mask_phone_keeps_prefix_and_tail() {
        let masked = mask_contact("+237698765432");
        assert!(masked.starts_with("+237"));
        assert!(masked.ends_with("32"));
        assert!(!masked.contains("69876"));
    }

    #[test]
    fn mask_email_hides_local_part() {
        assert_eq!(mask_contact("user@example.com"), "u***@example.com");
    }

    #[test]
    fn mask_short_contact_hides_everything() {
        assert_eq!(mask_contact("+1234"), "****");
    }

    #[test]
    fn mask_handles_multibyte_input() {
        // Rejected raw input still gets masked for the error message; a
        // multibyte character across the split points must not panic.
        assert_eq!(mask_contact("++\u{20AC}12345"), "++\u{20AC}1****45");
        assert_eq!(mask_contact("\u{20AC}\u{20AC}\u{20AC}"), "****");
        let masked = mask_contact("+49\u{20AC}1765432109");
        assert!(masked.starts_with("+49\u{20AC}"));
        assert!(masked.ends_with("09"));
    }
}
