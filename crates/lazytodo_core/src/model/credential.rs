//! Credential domain model and input policy.
//!
//! # Responsibility
//! - Define the registry record `username -> password -> home_dir`.
//! - Own username format and password strength rules.
//!
//! # Invariants
//! - Fields never contain commas or line breaks (the registry format has no
//!   escaping).
//! - Usernames are safe to use as a single directory name.
//! - Passwords are stored as entered; there is no hashing.

use super::ValidationError;
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::PathBuf;

/// Inclusive password length bounds, counted in characters.
pub const PASSWORD_MIN_CHARS: usize = 4;
pub const PASSWORD_MAX_CHARS: usize = 8;

static USERNAME_FORBIDDEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[,/\\\r\n]").expect("valid username regex"));

/// One registered user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    pub username: String,
    pub password: String,
    pub home_dir: PathBuf,
}

impl Credential {
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        home_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            home_dir: home_dir.into(),
        }
    }

    /// Byte-for-byte password comparison.
    pub fn password_matches(&self, candidate: &str) -> bool {
        self.password.as_bytes() == candidate.as_bytes()
    }
}

/// Validates username format (not uniqueness).
pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    if username.trim().is_empty() {
        return Err(ValidationError::EmptyUsername);
    }
    if username != username.trim()
        || username == "."
        || username == ".."
        || USERNAME_FORBIDDEN_RE.is_match(username)
    {
        return Err(ValidationError::InvalidUsername(username.to_string()));
    }
    Ok(())
}

/// Validates password strength.
///
/// Accepts when `4 <= len <= 8` and the value has at least one ASCII digit and
/// one uppercase letter. Commas and line breaks are rejected because they
/// cannot be stored in the registry.
pub fn validate_password_strength(password: &str) -> Result<(), ValidationError> {
    let length = password.chars().count();
    if !(PASSWORD_MIN_CHARS..=PASSWORD_MAX_CHARS).contains(&length) {
        return Err(ValidationError::PasswordLength(length));
    }
    if password.contains([',', '\r', '\n']) {
        return Err(ValidationError::PasswordHasForbiddenChars);
    }
    let has_digit = password.chars().any(|ch| ch.is_ascii_digit());
    let has_upper = password.chars().any(char::is_uppercase);
    if !(has_digit && has_upper) {
        return Err(ValidationError::PasswordTooWeak);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{validate_password_strength, validate_username, Credential};
    use crate::model::ValidationError;

    #[test]
    fn password_rule_accepts_bounds() {
        assert!(validate_password_strength("Ab12").is_ok());
        assert!(validate_password_strength("Abcdefg1").is_ok());
    }

    #[test]
    fn password_rule_rejects_weak_values() {
        assert_eq!(
            validate_password_strength("abc1"),
            Err(ValidationError::PasswordTooWeak)
        );
        assert_eq!(
            validate_password_strength("AB"),
            Err(ValidationError::PasswordLength(2))
        );
        assert_eq!(
            validate_password_strength("Abcdefghi1"),
            Err(ValidationError::PasswordLength(10))
        );
        assert_eq!(
            validate_password_strength("ABCD"),
            Err(ValidationError::PasswordTooWeak)
        );
        assert_eq!(
            validate_password_strength("Ab1,"),
            Err(ValidationError::PasswordHasForbiddenChars)
        );
    }

    #[test]
    fn username_rule_rejects_separators() {
        assert!(validate_username("alice").is_ok());
        assert_eq!(validate_username(""), Err(ValidationError::EmptyUsername));
        for bad in ["a,b", "a/b", "..", " alice"] {
            assert!(matches!(
                validate_username(bad),
                Err(ValidationError::InvalidUsername(_))
            ));
        }
    }

    #[test]
    fn password_match_is_exact() {
        let credential = Credential::new("alice", "Ab12", "/tmp/Users/alice");
        assert!(credential.password_matches("Ab12"));
        assert!(!credential.password_matches("ab12"));
        assert!(!credential.password_matches("Ab12 "));
    }
}
