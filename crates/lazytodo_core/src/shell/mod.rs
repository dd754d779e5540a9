//! Interactive session shell.
//!
//! # Responsibility
//! - Gate the session behind login or registration.
//! - Read one numeric menu choice per iteration and run exactly one note
//!   operation for it.
//!
//! # Invariants
//! - Choices are compared by parsed value, never by string identity.
//! - Operation errors are reported and the session continues; only choice 0
//!   or a cancelled menu prompt ends it.
//! - Blank input at any operation prompt cancels that operation.

pub mod menu;

pub use menu::MenuChoice;

use crate::model::note::NoteTitle;
use crate::model::task::{validate_description, Priority, Task, TaskStatus};
use crate::model::ValidationError;
use crate::repo::credential_repo::CredentialStore;
use crate::repo::note_repo::NoteRepository;
use crate::repo::{RepoError, RepoResult};
use crate::service::auth_service::{
    AuthResult, AuthService, Identity, LoginOutcome, RegisterOutcome,
};
use crate::service::note_service::{numbered_tasks, NoteService};
use crate::terminal::Terminal;
use log::{debug, info, warn};
use std::io;

/// Result of dispatching one menu choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// Asks whether the user is registered, then runs login or registration.
///
/// Returns `None` when the user cancels or declines.
pub fn authenticate<S, T>(auth: &mut AuthService<S>, term: &mut T) -> AuthResult<Option<Identity>>
where
    S: CredentialStore,
    T: Terminal + ?Sized,
{
    let identity = loop {
        let Some(answer) = term.read_line("Are you a registered user? y/n")? else {
            return Ok(None);
        };
        match answer.trim().to_ascii_lowercase().as_str() {
            "y" => match auth.login(term)? {
                LoginOutcome::Authenticated(identity) => break identity,
                LoginOutcome::Declined => return Ok(None),
            },
            "n" => match auth.register(term)? {
                RegisterOutcome::Registered(identity) => break identity,
                RegisterOutcome::Aborted => return Ok(None),
            },
            _ => term.write_line("Please answer y or n")?,
        }
    };
    term.write_line(&format!("Welcome {}!", identity.username))?;
    Ok(Some(identity))
}

/// Menu loop bound to one user's notes.
pub struct SessionShell<R: NoteRepository> {
    notes: NoteService<R>,
}

impl<R: NoteRepository> SessionShell<R> {
    pub fn new(notes: NoteService<R>) -> Self {
        Self { notes }
    }

    pub fn notes(&self) -> &NoteService<R> {
        &self.notes
    }

    /// Runs until the user picks exit or input ends.
    pub fn run<T: Terminal + ?Sized>(&self, term: &mut T) -> io::Result<()> {
        loop {
            for choice in MenuChoice::ALL {
                term.write_line(&choice.to_string())?;
            }
            let Some(input) = term.read_line("Enter your choice:")? else {
                info!("event=session_end module=shell status=ok reason=input_closed");
                return Ok(());
            };
            let Some(choice) = MenuChoice::parse(&input) else {
                term.write_line("Invalid choice, please enter a number from 0 to 7")?;
                continue;
            };
            if self.dispatch(choice, term)? == Flow::Exit {
                info!("event=session_end module=shell status=ok reason=exit_choice");
                return Ok(());
            }
        }
    }

    /// Runs the operation for one choice.
    pub fn dispatch<T: Terminal + ?Sized>(&self, choice: MenuChoice, term: &mut T) -> io::Result<Flow> {
        debug!("event=menu_choice module=shell choice={}", choice.code());
        match choice {
            MenuChoice::Exit => {
                term.write_line("Hope to see you again soon!")?;
                return Ok(Flow::Exit);
            }
            MenuChoice::CreateNote => self.create_note(term)?,
            MenuChoice::AddTask => self.add_task(term)?,
            MenuChoice::DeleteTask => self.delete_task(term)?,
            MenuChoice::ListNotes => self.list_notes(term)?,
            MenuChoice::ShowTasks => self.show_tasks(term)?,
            MenuChoice::CompleteTask => self.complete_task(term)?,
            MenuChoice::DeleteNote => self.delete_note(term)?,
        }
        Ok(Flow::Continue)
    }

    fn create_note<T: Terminal + ?Sized>(&self, term: &mut T) -> io::Result<()> {
        let Some(title) = read_title(term)? else {
            return Ok(());
        };
        match self.notes.create_note(title.as_str()) {
            Ok(title) => term.write_line(&format!("Created note `{title}`")),
            Err(err) => report(term, "note_create", &err),
        }
    }

    fn add_task<T: Terminal + ?Sized>(&self, term: &mut T) -> io::Result<()> {
        let Some(title) = read_title(term)? else {
            return Ok(());
        };
        if let Err(err) = self.notes.read_tasks(title.as_str()) {
            return report(term, "task_append", &err);
        }
        let Some(description) = read_field(term, "Enter the task (blank to cancel):", |raw| {
            validate_description(raw).map(|()| raw.to_string())
        })?
        else {
            return Ok(());
        };
        let Some(priority) = read_field(
            term,
            "Enter the priority High/Medium/Low (blank to cancel):",
            Priority::parse_level,
        )?
        else {
            return Ok(());
        };

        match self.notes.append_task(title.as_str(), &description, priority) {
            Ok(task) => term.write_line(&format!(
                "Added task with priority {} to `{title}`",
                task.priority
            )),
            Err(err) => report(term, "task_append", &err),
        }
    }

    fn delete_task<T: Terminal + ?Sized>(&self, term: &mut T) -> io::Result<()> {
        let Some(title) = read_title(term)? else {
            return Ok(());
        };
        let removed = self.pick_task(term, &title, |index| {
            self.notes.delete_task(title.as_str(), index)
        })?;
        if let Some(task) = removed {
            term.write_line(&format!("Deleted task `{}`", task.description))?;
        }
        Ok(())
    }

    fn list_notes<T: Terminal + ?Sized>(&self, term: &mut T) -> io::Result<()> {
        match self.notes.list_notes() {
            Ok(titles) if titles.is_empty() => term.write_line("You have no notes yet"),
            Ok(titles) => {
                term.write_line("Your notes:")?;
                for title in titles {
                    term.write_line(&format!("- {title}"))?;
                }
                Ok(())
            }
            Err(err) => report(term, "note_list", &err),
        }
    }

    fn show_tasks<T: Terminal + ?Sized>(&self, term: &mut T) -> io::Result<()> {
        let Some(title) = read_title(term)? else {
            return Ok(());
        };
        match self.notes.read_tasks(title.as_str()) {
            Ok(tasks) => print_tasks(term, &title, &tasks),
            Err(err) => report(term, "task_read", &err),
        }
    }

    fn complete_task<T: Terminal + ?Sized>(&self, term: &mut T) -> io::Result<()> {
        let Some(title) = read_title(term)? else {
            return Ok(());
        };
        let updated = self.pick_task(term, &title, |index| {
            self.notes.set_status(title.as_str(), index, TaskStatus::Complete)
        })?;
        if let Some(task) = updated {
            term.write_line(&format!("Marked `{}` as {}", task.description, task.status))?;
        }
        Ok(())
    }

    fn delete_note<T: Terminal + ?Sized>(&self, term: &mut T) -> io::Result<()> {
        let Some(title) = read_title(term)? else {
            return Ok(());
        };
        match self.notes.delete_note(title.as_str()) {
            Ok(()) => term.write_line(&format!("Deleted note `{title}`")),
            Err(err) => report(term, "note_delete", &err),
        }
    }

    /// Shows the note, then asks for a task number until `apply` accepts it.
    ///
    /// Out-of-range numbers re-prompt; any other error ends the operation.
    fn pick_task<T, F>(&self, term: &mut T, title: &NoteTitle, apply: F) -> io::Result<Option<Task>>
    where
        T: Terminal + ?Sized,
        F: Fn(usize) -> RepoResult<Task>,
    {
        let tasks = match self.notes.read_tasks(title.as_str()) {
            Ok(tasks) => tasks,
            Err(err) => {
                report(term, "task_pick", &err)?;
                return Ok(None);
            }
        };
        print_tasks(term, title, &tasks)?;
        if tasks.is_empty() {
            return Ok(None);
        }

        loop {
            let Some(input) = term.read_line("Enter the task number (blank to cancel):")? else {
                return Ok(None);
            };
            let input = input.trim();
            if input.is_empty() {
                return Ok(None);
            }
            let Ok(index) = input.parse::<usize>() else {
                term.write_line("Please enter a task number")?;
                continue;
            };
            match apply(index) {
                Ok(task) => return Ok(Some(task)),
                Err(err @ RepoError::IndexOutOfRange { .. }) => report(term, "task_pick", &err)?,
                Err(err) => {
                    report(term, "task_pick", &err)?;
                    return Ok(None);
                }
            }
        }
    }
}

fn read_title<T: Terminal + ?Sized>(term: &mut T) -> io::Result<Option<NoteTitle>> {
    read_field(term, "Enter the note title (blank to cancel):", NoteTitle::parse)
}

/// Prompts until `parse` accepts the input. Blank input or EOF cancels.
fn read_field<T, V, P>(term: &mut T, prompt: &str, parse: P) -> io::Result<Option<V>>
where
    T: Terminal + ?Sized,
    P: Fn(&str) -> Result<V, ValidationError>,
{
    loop {
        let Some(input) = term.read_line(prompt)? else {
            return Ok(None);
        };
        if input.trim().is_empty() {
            return Ok(None);
        }
        match parse(&input) {
            Ok(value) => return Ok(Some(value)),
            Err(err) => term.write_line(&err.to_string())?,
        }
    }
}

fn print_tasks<T: Terminal + ?Sized>(term: &mut T, title: &NoteTitle, tasks: &[Task]) -> io::Result<()> {
    if tasks.is_empty() {
        return term.write_line(&format!("`{title}` has no tasks"));
    }
    term.write_line(&format!("Tasks in `{title}`:"))?;
    for (number, task) in numbered_tasks(tasks) {
        term.write_line(&format!(
            "{number}. {} | Priority: {} | Status: {}",
            task.description, task.priority, task.status
        ))?;
    }
    Ok(())
}

fn report<T: Terminal + ?Sized>(term: &mut T, event: &str, err: &RepoError) -> io::Result<()> {
    warn!(
        "event={} module=shell status=error error_code={}",
        event,
        err.code()
    );
    term.write_line(&format!("Error: {err}"))
}
