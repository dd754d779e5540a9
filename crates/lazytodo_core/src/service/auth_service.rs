//! Registration and login flows.
//!
//! # Responsibility
//! - Drive interactive registration (username, password strength,
//!   confirmation, home directory) and login (lookup, password check).
//! - Own the in-memory credential registry and keep it in step with the
//!   backing store.
//!
//! # Invariants
//! - A record is appended to the store before it becomes visible in the
//!   registry; a failed append leaves the registry unchanged.
//! - Login never locks an account; every retry is the user's choice.
//! - Passwords are never written to logs or terminal output.

use crate::model::credential::{validate_password_strength, validate_username, Credential};
use crate::repo::credential_repo::{CredentialRegistry, CredentialStore};
use crate::repo::RepoError;
use crate::terminal::Terminal;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

const RETRY_CHOICE: &str = "1";

pub type AuthResult<T> = Result<T, AuthError>;

/// Failure that ends an auth flow without a user decision.
#[derive(Debug)]
pub enum AuthError {
    /// Registry or home-directory persistence failure.
    Store(RepoError),
    /// Terminal read/write failure.
    Terminal(std::io::Error),
}

impl Display for AuthError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Store(err) => write!(f, "{err}"),
            Self::Terminal(err) => write!(f, "terminal failure: {err}"),
        }
    }
}

impl Error for AuthError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            Self::Terminal(err) => Some(err),
        }
    }
}

impl From<RepoError> for AuthError {
    fn from(value: RepoError) -> Self {
        Self::Store(value)
    }
}

impl From<std::io::Error> for AuthError {
    fn from(value: std::io::Error) -> Self {
        Self::Terminal(value)
    }
}

/// Authenticated user and the directory holding their notes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub username: String,
    pub home_dir: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegisterOutcome {
    Registered(Identity),
    /// User cancelled or declined to retry after a username collision.
    Aborted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    Authenticated(Identity),
    /// User cancelled or declined to retry.
    Declined,
}

/// Auth service over a credential store.
pub struct AuthService<S: CredentialStore> {
    store: S,
    registry: CredentialRegistry,
    users_dir: PathBuf,
}

impl<S: CredentialStore> AuthService<S> {
    /// Loads the registry from `store`.
    ///
    /// # Errors
    /// - `Store(RepoError::Parse)` when a persisted record is malformed.
    pub fn open(store: S, users_dir: impl Into<PathBuf>) -> AuthResult<Self> {
        let registry = store.load()?;
        Ok(Self {
            store,
            registry,
            users_dir: users_dir.into(),
        })
    }

    pub fn registry(&self) -> &CredentialRegistry {
        &self.registry
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn users_dir(&self) -> &Path {
        &self.users_dir
    }

    /// Runs the interactive registration flow.
    ///
    /// A store failure while saving the record is reported and the flow
    /// starts over at the username prompt. Terminal failures end it.
    pub fn register<T: Terminal + ?Sized>(&mut self, term: &mut T) -> AuthResult<RegisterOutcome> {
        loop {
            let Some(username) = self.read_new_username(term)? else {
                return Ok(RegisterOutcome::Aborted);
            };
            term.write_line("You are a step closer!")?;
            let Some(password) = read_confirmed_password(term)? else {
                return Ok(RegisterOutcome::Aborted);
            };

            match self.register_credential(&username, &password) {
                Ok(identity) => {
                    term.write_line("Registration successful!")?;
                    return Ok(RegisterOutcome::Registered(identity));
                }
                Err(AuthError::Store(err)) => {
                    warn!(
                        "event=auth_register module=auth status=error error_code={}",
                        err.code()
                    );
                    term.write_line(&format!("Error: {err}"))?;
                    term.write_line("Please try again with another username")?;
                }
                Err(err) => return Err(err),
            }
        }
    }

    fn read_new_username<T: Terminal + ?Sized>(&self, term: &mut T) -> AuthResult<Option<String>> {
        loop {
            let Some(input) = term.read_line("Enter a unique username:")? else {
                return Ok(None);
            };
            let candidate = input.trim().to_string();
            if let Err(err) = validate_username(&candidate) {
                term.write_line(&err.to_string())?;
                continue;
            }
            if self.registry.is_unique(&candidate) {
                return Ok(Some(candidate));
            }
            term.write_line("Username already exists!")?;
            if !ask_retry(term, "Enter 1 to try with another username, 0 to exit")? {
                info!("event=auth_register module=auth status=aborted reason=username_taken");
                return Ok(None);
            }
        }
    }

    /// Registers a user without prompting.
    ///
    /// Creates `<users_dir>/<username>` if absent, appends the record to the
    /// store, then adds it to the registry.
    ///
    /// # Errors
    /// - `Store(Validation)` for a malformed username or weak password.
    /// - `Store(AlreadyExists)` when the username is taken.
    /// - `Store(Io)` when the home directory cannot be created.
    pub fn register_credential(&mut self, username: &str, password: &str) -> AuthResult<Identity> {
        validate_username(username).map_err(RepoError::from)?;
        if !self.registry.is_unique(username) {
            return Err(RepoError::AlreadyExists(username.to_string()).into());
        }
        validate_password_strength(password).map_err(RepoError::from)?;

        let home_dir = home_dir_for(&self.users_dir, username);
        std::fs::create_dir_all(&home_dir).map_err(RepoError::from)?;

        let credential = Credential::new(username, password, home_dir.clone());
        self.store.append(&credential)?;
        self.registry.insert(credential)?;
        info!(
            "event=auth_register module=auth status=ok users={}",
            self.registry.len()
        );

        Ok(Identity {
            username: username.to_string(),
            home_dir,
        })
    }

    /// Runs the interactive login flow.
    ///
    /// Unknown usernames and wrong passwords both offer an unbounded retry.
    pub fn login<T: Terminal + ?Sized>(&self, term: &mut T) -> AuthResult<LoginOutcome> {
        let credential = loop {
            let Some(input) = term.read_line("Enter your username:")? else {
                return Ok(LoginOutcome::Declined);
            };
            let username = input.trim();
            if let Some(credential) = self.registry.get(username) {
                break credential;
            }
            term.write_line(&format!("No registered user named `{username}`"))?;
            if !ask_retry(term, "Press 1 to retry, anything else to exit")? {
                return Ok(LoginOutcome::Declined);
            }
        };

        loop {
            let Some(password) = term.read_secret("Enter your password:")? else {
                return Ok(LoginOutcome::Declined);
            };
            if credential.password_matches(&password) {
                info!("event=auth_login module=auth status=ok");
                return Ok(LoginOutcome::Authenticated(Identity {
                    username: credential.username.clone(),
                    home_dir: credential.home_dir.clone(),
                }));
            }
            warn!("event=auth_login module=auth status=error error_code=password_mismatch");
            term.write_line("Incorrect password")?;
            if !ask_retry(term, "Press 1 to retry, anything else to exit")? {
                return Ok(LoginOutcome::Declined);
            }
        }
    }
}

fn home_dir_for(users_dir: &Path, username: &str) -> PathBuf {
    users_dir.join(username)
}

fn read_strong_password<T: Terminal + ?Sized>(term: &mut T) -> AuthResult<Option<String>> {
    term.write_line(
        "A strong password contains a number and an uppercase letter (min len: 4, max len: 8)",
    )?;
    loop {
        let Some(password) = term.read_secret("Enter a strong password:")? else {
            return Ok(None);
        };
        match validate_password_strength(&password) {
            Ok(()) => return Ok(Some(password)),
            Err(err) => term.write_line(&format!("Please provide a strong password: {err}"))?,
        }
    }
}

fn read_confirmed_password<T: Terminal + ?Sized>(term: &mut T) -> AuthResult<Option<String>> {
    loop {
        let Some(password) = read_strong_password(term)? else {
            return Ok(None);
        };
        let Some(confirmation) = term.read_secret("Confirm the password:")? else {
            return Ok(None);
        };
        if password == confirmation {
            return Ok(Some(password));
        }
        term.write_line("Passwords do not match, please re-enter the passwords")?;
    }
}

fn ask_retry<T: Terminal + ?Sized>(term: &mut T, prompt: &str) -> AuthResult<bool> {
    Ok(term
        .read_line(prompt)?
        .is_some_and(|answer| answer.trim() == RETRY_CHOICE))
}
