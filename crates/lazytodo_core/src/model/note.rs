//! Note identity.
//!
//! # Responsibility
//! - Map user-entered titles to filesystem-safe file names.
//!
//! # Invariants
//! - A `NoteTitle` is never empty and never starts with `.`.
//! - The `.txt` extension is an internal detail of `file_name()`.

use super::ValidationError;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt::{Display, Formatter};

/// Extension appended to every note file.
pub const NOTE_FILE_EXTENSION: &str = "txt";

static UNSAFE_TITLE_CHARS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^A-Za-z0-9 _.\-]").expect("valid title regex"));

/// Sanitized note title.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NoteTitle(String);

impl NoteTitle {
    /// Sanitizes raw input into a title.
    ///
    /// Characters outside `[A-Za-z0-9 _.-]` are replaced with `_`.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
        let sanitized = UNSAFE_TITLE_CHARS_RE.replace_all(trimmed, "_");
        if sanitized.starts_with('.') {
            return Err(ValidationError::InvalidTitle(trimmed.to_string()));
        }
        Ok(Self(sanitized.into_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// File name inside the owner's home directory.
    pub fn file_name(&self) -> String {
        format!("{}.{NOTE_FILE_EXTENSION}", self.0)
    }
}

impl Display for NoteTitle {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
