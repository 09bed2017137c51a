//! Signup confirmation codes.
//!
//! A code is issued once per account at registration and exchanged for an
//! access token. Codes are not rotated after a successful exchange.

use rand::Rng;
use subtle::ConstantTimeEq;

/// Length of a confirmation code (alphanumeric characters).
pub const CONFIRMATION_CODE_LENGTH: usize = 32;

/// Subject line of the confirmation email.
pub const CONFIRMATION_SUBJECT: &str = "YaMDb signup confirmation code";

/// Generate a new random confirmation code.
///
/// Uses the thread-local CSPRNG, which is seeded from the operating system.
pub fn generate_confirmation_code() -> String {
    rand::rng()
        .sample_iter(&rand::distr::Alphanumeric)
        .take(CONFIRMATION_CODE_LENGTH)
        .map(char::from)
        .collect()
}

/// Compare a supplied code against the stored one in constant time.
pub fn confirmation_code_matches(stored: &str, supplied: &str) -> bool {
    stored.len() == supplied.len() && bool::from(stored.as_bytes().ct_eq(supplied.as_bytes()))
}

/// Plain-text body of the confirmation email.
pub fn confirmation_message(username: &str, code: &str) -> String {
    format!("{username}, your confirmation code: {code}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_code_has_fixed_length_and_alphabet() {
        let code = generate_confirmation_code();
        assert_eq!(code.len(), CONFIRMATION_CODE_LENGTH);
        assert!(code.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn consecutive_codes_differ() {
        assert_ne!(generate_confirmation_code(), generate_confirmation_code());
    }

    #[test]
    fn matching_requires_exact_equality() {
        let code = "AbCdEfGhIjKlMnOpQrStUvWxYz012345";
        assert!(confirmation_code_matches(code, code));
        assert!(!confirmation_code_matches(code, &code.to_lowercase()));
        assert!(!confirmation_code_matches(code, "AbCdEfGhIjKlMnOpQrStUvWxYz012346"));
        assert!(!confirmation_code_matches(code, &code[..CONFIRMATION_CODE_LENGTH - 1]));
        assert!(!confirmation_code_matches(code, ""));
    }

    #[test]
    fn codes_differing_only_in_the_last_byte_do_not_match() {
        let stored = generate_confirmation_code();
        let mut supplied = stored.clone();
        let last = supplied.pop().unwrap();
        supplied.push(if last == 'a' { 'b' } else { 'a' });
        assert!(!confirmation_code_matches(&stored, &supplied));
        assert!(confirmation_code_matches(&stored, &stored.clone()));
    }

    #[test]
    fn message_contains_username_and_code() {
        let body = confirmation_message("alice", "abc123");
        assert!(body.contains("alice"));
        assert!(body.contains("abc123"));
    }
}
