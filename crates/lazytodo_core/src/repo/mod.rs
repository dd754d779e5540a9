//! Repository layer abstractions and flat-file implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts.
//! - Isolate file formats and filesystem details from services.
//!
//! # Invariants
//! - Repository writes only accept validated model values.
//! - Repository APIs return semantic errors (`NotFound`, `AlreadyExists`,
//!   `IndexOutOfRange`) in addition to I/O and parse errors.
//! - Malformed persisted data is reported, never silently dropped.

use crate::model::ValidationError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod credential_repo;
pub mod note_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error shared by credential and note persistence.
#[derive(Debug)]
pub enum RepoError {
    Validation(ValidationError),
    Io(std::io::Error),
    /// Malformed persisted record. `line` is 1-based.
    Parse {
        origin: String,
        line: usize,
        reason: String,
    },
    AlreadyExists(String),
    NotFound(String),
    /// `index` is the 1-based position the caller asked for.
    IndexOutOfRange {
        index: usize,
        len: usize,
    },
    InvalidData(String),
}

impl RepoError {
    /// Stable short code for log events.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::Io(_) => "io_failure",
            Self::Parse { .. } => "parse_error",
            Self::AlreadyExists(_) => "already_exists",
            Self::NotFound(_) => "not_found",
            Self::IndexOutOfRange { .. } => "index_out_of_range",
            Self::InvalidData(_) => "invalid_data",
        }
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Io(err) => write!(f, "i/o failure: {err}"),
            Self::Parse {
                origin,
                line,
                reason,
            } => write!(f, "malformed record in {origin} at line {line}: {reason}"),
            Self::AlreadyExists(name) => write!(f, "`{name}` already exists"),
            Self::NotFound(name) => write!(f, "`{name}` not found"),
            Self::IndexOutOfRange { index, len } => {
                if *len == 0 {
                    write!(f, "task {index} does not exist; the note has no tasks")
                } else {
                    write!(f, "task {index} does not exist; choose 1-{len}")
                }
            }
            Self::InvalidData(message) => write!(f, "invalid data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<std::io::Error> for RepoError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}
