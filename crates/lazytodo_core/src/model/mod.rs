//! Domain model for credentials, notes and tasks.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Own input validation rules shared by services and the shell.
//!
//! # Invariants
//! - Every value that reaches a flat file has passed validation here, so the
//!   delimiters of the on-disk formats never appear inside a field.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod credential;
pub mod note;
pub mod task;

/// Input validation failure. Always recoverable by re-prompting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    EmptyUsername,
    InvalidUsername(String),
    PasswordLength(usize),
    PasswordTooWeak,
    PasswordHasForbiddenChars,
    EmptyTitle,
    InvalidTitle(String),
    EmptyDescription,
    DescriptionHasControlChars,
    InvalidPriority(String),
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyUsername => write!(f, "username cannot be empty"),
            Self::InvalidUsername(value) => write!(
                f,
                "invalid username `{value}`: no commas, slashes or surrounding spaces"
            ),
            Self::PasswordLength(len) => write!(
                f,
                "password must be {}-{} characters long, got {len}",
                credential::PASSWORD_MIN_CHARS,
                credential::PASSWORD_MAX_CHARS
            ),
            Self::PasswordTooWeak => write!(
                f,
                "password must contain a number and an uppercase letter"
            ),
            Self::PasswordHasForbiddenChars => {
                write!(f, "password cannot contain commas or line breaks")
            }
            Self::EmptyTitle => write!(f, "note title cannot be empty"),
            Self::InvalidTitle(value) => write!(f, "invalid note title `{value}`"),
            Self::EmptyDescription => write!(f, "task description cannot be empty"),
            Self::DescriptionHasControlChars => {
                write!(f, "task description cannot contain tabs or line breaks")
            }
            Self::InvalidPriority(value) => {
                write!(f, "invalid priority `{value}`; expected High|Medium|Low")
            }
        }
    }
}

impl Error for ValidationError {}
