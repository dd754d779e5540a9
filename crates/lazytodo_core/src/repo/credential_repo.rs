//! Credential registry contracts and flat-file implementation.
//!
//! # Responsibility
//! - Hold the in-memory registry with O(1) username lookup.
//! - Load and append the `username,password,home_dir` registry file.
//!
//! # Invariants
//! - Usernames in a registry are pairwise distinct.
//! - Persistence appends one line per registration; earlier records are never
//!   truncated or rewritten.
//! - A malformed or duplicate line aborts loading with `RepoError::Parse`.

use crate::model::credential::{validate_username, Credential};
use crate::repo::{RepoError, RepoResult};
use log::{error, info};
use std::collections::HashMap;
use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::PathBuf;

const FIELD_DELIMITER: char = ',';
const FIELD_COUNT: usize = 3;

/// Ordered set of credentials keyed by username.
#[derive(Debug, Clone, Default)]
pub struct CredentialRegistry {
    records: Vec<Credential>,
    by_username: HashMap<String, usize>,
}

impl CredentialRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` when no record uses `username`.
    pub fn is_unique(&self, username: &str) -> bool {
        !self.by_username.contains_key(username)
    }

    pub fn get(&self, username: &str) -> Option<&Credential> {
        self.by_username
            .get(username)
            .map(|position| &self.records[*position])
    }

    /// Adds one record.
    ///
    /// # Errors
    /// - `AlreadyExists` when the username is already registered.
    pub fn insert(&mut self, credential: Credential) -> RepoResult<()> {
        if !self.is_unique(&credential.username) {
            return Err(RepoError::AlreadyExists(credential.username));
        }
        self.by_username
            .insert(credential.username.clone(), self.records.len());
        self.records.push(credential);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterates records in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Credential> {
        self.records.iter()
    }
}

/// Persistence contract for the credential registry.
pub trait CredentialStore {
    /// Loads every persisted record.
    fn load(&self) -> RepoResult<CredentialRegistry>;
    /// Persists one new record without touching existing ones.
    fn append(&mut self, credential: &Credential) -> RepoResult<()>;
}

/// Registry stored as a line-oriented text file.
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CredentialStore for FileCredentialStore {
    fn load(&self) -> RepoResult<CredentialRegistry> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!("event=registry_load module=repo status=ok records=0 reason=missing_file");
                return Ok(CredentialRegistry::new());
            }
            Err(err) => {
                error!(
                    "event=registry_load module=repo status=error error_code=read_failed error={}",
                    err
                );
                return Err(err.into());
            }
        };

        let registry = parse_registry(&content, &self.path.display().to_string())
            .inspect_err(|err| {
                error!(
                    "event=registry_load module=repo status=error error_code=parse_failed error={}",
                    err
                );
            })?;
        info!(
            "event=registry_load module=repo status=ok records={}",
            registry.len()
        );
        Ok(registry)
    }

    fn append(&mut self, credential: &Credential) -> RepoResult<()> {
        let line = format_credential_line(credential)?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(line.as_bytes())?;
        file.write_all(b"\n")?;
        file.flush()?;
        info!("event=registry_append module=repo status=ok");
        Ok(())
    }
}

/// Registry kept in memory, using the same line format as the file store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCredentialStore {
    lines: Vec<String>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the store with raw registry lines.
    pub fn with_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }
}

impl CredentialStore for InMemoryCredentialStore {
    fn load(&self) -> RepoResult<CredentialRegistry> {
        parse_registry(&self.lines.join("\n"), "<memory>")
    }

    fn append(&mut self, credential: &Credential) -> RepoResult<()> {
        self.lines.push(format_credential_line(credential)?);
        Ok(())
    }
}

/// Formats one registry line without the trailing newline.
///
/// # Errors
/// - `InvalidData` when a field contains the delimiter or a line break, or
///   the home directory is not valid UTF-8.
pub fn format_credential_line(credential: &Credential) -> RepoResult<String> {
    let home_dir = credential.home_dir.to_str().ok_or_else(|| {
        RepoError::InvalidData(format!(
            "home directory `{}` is not valid UTF-8",
            credential.home_dir.display()
        ))
    })?;

    for (name, value) in [
        ("username", credential.username.as_str()),
        ("password", credential.password.as_str()),
        ("home_dir", home_dir),
    ] {
        if value.contains([FIELD_DELIMITER, '\n', '\r']) {
            return Err(RepoError::InvalidData(format!(
                "{name} cannot contain commas or line breaks"
            )));
        }
    }

    Ok(format!(
        "{}{FIELD_DELIMITER}{}{FIELD_DELIMITER}{home_dir}",
        credential.username, credential.password
    ))
}

/// Parses one registry line into a credential.
///
/// Returns the failure reason on error; the caller attaches the position.
pub fn parse_credential_line(line: &str) -> Result<Credential, String> {
    let fields: Vec<&str> = line.split(FIELD_DELIMITER).collect();
    if fields.len() != FIELD_COUNT {
        return Err(format!(
            "expected {FIELD_COUNT} comma-separated fields, found {}",
            fields.len()
        ));
    }
    validate_username(fields[0]).map_err(|err| err.to_string())?;
    if fields[2].is_empty() {
        return Err("home directory is empty".to_string());
    }
    Ok(Credential::new(fields[0], fields[1], fields[2]))
}

fn parse_registry(content: &str, origin: &str) -> RepoResult<CredentialRegistry> {
    let mut registry = CredentialRegistry::new();
    for (offset, raw_line) in content.lines().enumerate() {
        let line = raw_line.trim_end_matches('\r');
        if line.trim().is_empty() {
            continue;
        }
        let parse_error = |reason: String| RepoError::Parse {
            origin: origin.to_string(),
            line: offset + 1,
            reason,
        };

        let credential = parse_credential_line(line).map_err(parse_error)?;
        if !registry.is_unique(&credential.username) {
            return Err(parse_error(format!(
                "duplicate username `{}`",
                credential.username
            )));
        }
        registry.insert(credential)?;
    }
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::{
        format_credential_line, parse_credential_line, CredentialRegistry, CredentialStore,
        InMemoryCredentialStore,
    };
    use crate::model::credential::Credential;
    use crate::repo::RepoError;

    #[test]
    fn registry_rejects_duplicate_usernames() {
        let mut registry = CredentialRegistry::new();
        registry
            .insert(Credential::new("alice", "Ab12", "/r/Users/alice"))
            .unwrap();
        assert!(!registry.is_unique("alice"));
        assert!(registry.is_unique("bob"));

        let err = registry
            .insert(Credential::new("alice", "Cd34", "/r/Users/alice"))
            .unwrap_err();
        assert!(matches!(err, RepoError::AlreadyExists(name) if name == "alice"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn line_format_is_comma_separated() {
        let credential = Credential::new("alice", "Ab12", "/r/Users/alice");
        let line = format_credential_line(&credential).unwrap();
        assert_eq!(line, "alice,Ab12,/r/Users/alice");
        assert_eq!(parse_credential_line(&line).unwrap(), credential);
    }

    #[test]
    fn format_rejects_commas_inside_fields() {
        let credential = Credential::new("alice", "Ab1,", "/r/Users/alice");
        assert!(matches!(
            format_credential_line(&credential),
            Err(RepoError::InvalidData(_))
        ));
    }

    #[test]
    fn parse_rejects_wrong_field_count() {
        let reason = parse_credential_line("alice,Ab12").unwrap_err();
        assert!(reason.contains("found 2"));
        assert!(parse_credential_line("alice,Ab12,/x,extra").is_err());
    }

    #[test]
    fn in_memory_store_reports_line_numbers() {
        let store = InMemoryCredentialStore::with_lines(["alice,Ab12,/r/Users/alice", "broken"]);
        let err = store.load().unwrap_err();
        match err {
            RepoError::Parse { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn in_memory_store_rejects_duplicate_lines() {
        let store = InMemoryCredentialStore::with_lines([
            "alice,Ab12,/r/Users/alice",
            "alice,Cd34,/r/Users/alice",
        ]);
        let err = store.load().unwrap_err();
        assert!(err.to_string().contains("duplicate username"));
    }
}
