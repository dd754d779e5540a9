//! LazyTodo interactive entry point.
//!
//! # Responsibility
//! - Resolve configuration and start file logging.
//! - Bootstrap the users directory and load the credential registry.
//! - Authenticate once, then hand the terminal to the session shell.
//!
//! # Exit codes
//! - `0` after a normal exit or a declined login/registration.
//! - `1` when startup fails (logging, directories, malformed registry).

mod terminal;

use anyhow::{anyhow, Context, Result};
use lazytodo_core::{
    authenticate, init_logging, AppConfig, AuthService, FileCredentialStore, FileNoteRepository,
    NoteService, SessionShell, Terminal,
};
use log::{error, info};
use std::process::ExitCode;
use terminal::StdTerminal;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=app_exit module=cli status=error error={err:#}");
            eprintln!("lazytodo: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let config = AppConfig::from_env().context("failed to resolve the working directory")?;
    init_logging(&config.log_level, &config.log_dir)
        .map_err(|err| anyhow!(err))
        .context("failed to start logging")?;

    let mut term = StdTerminal::new();
    let created = config.ensure_users_dir().with_context(|| {
        format!(
            "failed to create users directory `{}`",
            config.users_dir().display()
        )
    })?;
    if created {
        term.write_line("created dir Users")?;
    }
    term.write_line("Welcome to TO-DO list")?;

    let registry_path = config.registry_path();
    let mut auth = AuthService::open(FileCredentialStore::new(&registry_path), config.users_dir())
        .with_context(|| format!("failed to load user registry `{}`", registry_path.display()))?;

    let Some(identity) = authenticate(&mut auth, &mut term)? else {
        term.write_line("Hope to see you again soon!")?;
        info!("event=app_exit module=cli status=ok reason=not_authenticated");
        return Ok(());
    };

    let shell = SessionShell::new(NoteService::new(FileNoteRepository::new(
        &identity.home_dir,
    )));
    shell.run(&mut term)?;
    info!("event=app_exit module=cli status=ok reason=session_end");
    Ok(())
}
