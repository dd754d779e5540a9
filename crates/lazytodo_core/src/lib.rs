//! Core domain logic for LazyTodo.
//! This crate is the single source of truth for credential and task-list
//! invariants; the CLI only supplies a terminal and configuration.

pub mod config;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod shell;
pub mod terminal;

pub use config::AppConfig;
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::credential::{validate_password_strength, validate_username, Credential};
pub use model::note::NoteTitle;
pub use model::task::{Priority, Task, TaskStatus};
pub use model::ValidationError;
pub use repo::credential_repo::{
    CredentialRegistry, CredentialStore, FileCredentialStore, InMemoryCredentialStore,
};
pub use repo::note_repo::{FileNoteRepository, NoteRepository};
pub use repo::{RepoError, RepoResult};
pub use service::auth_service::{
    AuthError, AuthResult, AuthService, Identity, LoginOutcome, RegisterOutcome,
};
pub use service::note_service::NoteService;
pub use shell::{authenticate, Flow, MenuChoice, SessionShell};
pub use terminal::{ScriptedTerminal, Terminal};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
