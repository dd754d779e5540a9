//! Note repository contracts and flat-file implementation.
//!
//! # Responsibility
//! - Store one note per `<title>.txt` file inside a user's home directory.
//! - Own the note file format: a header line followed by delimited task rows.
//!
//! # Invariants
//! - Line 1 of every note file is the header, never a task.
//! - Task rows use `TASK_FIELD_DELIMITER` for both writing and rewriting.
//! - Every mutation is a single read-modify-write on one open file handle.
//!
//! # See also
//! - `service::note_service` for index-based use-cases.

use crate::model::note::{NoteTitle, NOTE_FILE_EXTENSION};
use crate::model::task::{Priority, Task, TaskStatus};
use crate::repo::{RepoError, RepoResult};
use log::debug;
use std::fs::{File, OpenOptions};
use std::io::{ErrorKind, Read, Seek, SeekFrom, Write};
use std::path::PathBuf;

/// Header written as the first line of every note file.
pub const NOTE_HEADER: &str = "Task\tPriority\tTask Status";
/// Separator between the fields of a task row.
pub const TASK_FIELD_DELIMITER: &str = "\t\t\t\t";

/// Repository interface for per-user note files.
pub trait NoteRepository {
    /// Creates an empty note containing only the header.
    fn create_note(&self, title: &NoteTitle) -> RepoResult<()>;
    /// Lists note titles in directory enumeration order.
    fn list_notes(&self) -> RepoResult<Vec<String>>;
    /// Reads all task rows in file order.
    fn read_tasks(&self, title: &NoteTitle) -> RepoResult<Vec<Task>>;
    /// Appends one task row.
    fn append_task(&self, title: &NoteTitle, task: &Task) -> RepoResult<()>;
    /// Reads all rows, applies `edit`, and rewrites the file with the result.
    ///
    /// The file is left untouched when `edit` fails.
    fn modify_tasks(
        &self,
        title: &NoteTitle,
        edit: &mut dyn FnMut(&mut Vec<Task>) -> RepoResult<()>,
    ) -> RepoResult<Vec<Task>>;
    /// Removes the note file.
    fn delete_note(&self, title: &NoteTitle) -> RepoResult<()>;
}

/// Note repository rooted at one user's home directory.
#[derive(Debug, Clone)]
pub struct FileNoteRepository {
    home_dir: PathBuf,
}

impl FileNoteRepository {
    pub fn new(home_dir: impl Into<PathBuf>) -> Self {
        Self {
            home_dir: home_dir.into(),
        }
    }

    fn note_path(&self, title: &NoteTitle) -> PathBuf {
        self.home_dir.join(title.file_name())
    }

    fn open_existing(&self, title: &NoteTitle, options: &OpenOptions) -> RepoResult<File> {
        options
            .open(self.note_path(title))
            .map_err(|err| map_missing(err, title))
    }
}

impl NoteRepository for FileNoteRepository {
    fn create_note(&self, title: &NoteTitle) -> RepoResult<()> {
        std::fs::create_dir_all(&self.home_dir)?;
        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(self.note_path(title))
            .map_err(|err| {
                if err.kind() == ErrorKind::AlreadyExists {
                    RepoError::AlreadyExists(title.to_string())
                } else {
                    RepoError::Io(err)
                }
            })?;
        writeln!(file, "{NOTE_HEADER}")?;
        file.flush()?;
        debug!("event=note_create module=repo status=ok");
        Ok(())
    }

    fn list_notes(&self) -> RepoResult<Vec<String>> {
        let entries = match std::fs::read_dir(&self.home_dir) {
            Ok(entries) => entries,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };

        let mut titles = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if !path.is_file() {
                continue;
            }
            if path.extension().and_then(|ext| ext.to_str()) != Some(NOTE_FILE_EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                titles.push(stem.to_string());
            }
        }
        debug!("event=note_list module=repo status=ok count={}", titles.len());
        Ok(titles)
    }

    fn read_tasks(&self, title: &NoteTitle) -> RepoResult<Vec<Task>> {
        let mut file = self.open_existing(title, OpenOptions::new().read(true))?;
        let mut content = String::new();
        file.read_to_string(&mut content)?;
        parse_note(&content, &title.file_name())
    }

    fn append_task(&self, title: &NoteTitle, task: &Task) -> RepoResult<()> {
        let mut file = self.open_existing(title, OpenOptions::new().append(true))?;
        writeln!(file, "{}", format_task_row(task))?;
        file.flush()?;
        debug!("event=task_append module=repo status=ok");
        Ok(())
    }

    fn modify_tasks(
        &self,
        title: &NoteTitle,
        edit: &mut dyn FnMut(&mut Vec<Task>) -> RepoResult<()>,
    ) -> RepoResult<Vec<Task>> {
        let mut file = self.open_existing(title, OpenOptions::new().read(true).write(true))?;
        let mut content = String::new();
        file.read_to_string(&mut content)?;
        let mut tasks = parse_note(&content, &title.file_name())?;

        edit(&mut tasks)?;

        let rendered = render_note(&tasks);
        file.set_len(0)?;
        file.seek(SeekFrom::Start(0))?;
        file.write_all(rendered.as_bytes())?;
        file.flush()?;
        debug!(
            "event=note_rewrite module=repo status=ok rows={}",
            tasks.len()
        );
        Ok(tasks)
    }

    fn delete_note(&self, title: &NoteTitle) -> RepoResult<()> {
        std::fs::remove_file(self.note_path(title)).map_err(|err| map_missing(err, title))?;
        debug!("event=note_delete module=repo status=ok");
        Ok(())
    }
}

/// Formats one task row without the trailing newline.
pub fn format_task_row(task: &Task) -> String {
    [
        task.description.as_str(),
        task.priority.as_label(),
        task.status.as_label(),
    ]
    .join(TASK_FIELD_DELIMITER)
}

/// Parses one task row.
///
/// Returns the failure reason on error; the caller attaches the position.
pub fn parse_task_row(line: &str) -> Result<Task, String> {
    let fields: Vec<&str> = line.split(TASK_FIELD_DELIMITER).collect();
    let [description, priority, status] = fields.as_slice() else {
        return Err(format!("expected 3 fields, found {}", fields.len()));
    };
    let status = TaskStatus::from_label(status)
        .ok_or_else(|| format!("unknown task status `{status}`"))?;
    Ok(Task {
        description: (*description).to_string(),
        priority: Priority::from_stored(priority),
        status,
    })
}

/// Parses a full note file body. The first line is always treated as the
/// header and skipped.
pub fn parse_note(content: &str, origin: &str) -> RepoResult<Vec<Task>> {
    let mut tasks = Vec::new();
    for (offset, raw_line) in content.lines().enumerate().skip(1) {
        let line = raw_line.trim_end_matches('\r');
        if line.trim().is_empty() {
            continue;
        }
        let task = parse_task_row(line).map_err(|reason| RepoError::Parse {
            origin: origin.to_string(),
            line: offset + 1,
            reason,
        })?;
        tasks.push(task);
    }
    Ok(tasks)
}

/// Renders a full note file body, header included.
pub fn render_note(tasks: &[Task]) -> String {
    let mut out = String::with_capacity(NOTE_HEADER.len() + 1 + tasks.len() * 32);
    out.push_str(NOTE_HEADER);
    out.push('\n');
    for task in tasks {
        out.push_str(&format_task_row(task));
        out.push('\n');
    }
    out
}

fn map_missing(err: std::io::Error, title: &NoteTitle) -> RepoError {
    if err.kind() == ErrorKind::NotFound {
        RepoError::NotFound(title.to_string())
    } else {
        RepoError::Io(err)
    }
}

#[cfg(test)]
mod tests {
    use super::{format_task_row, parse_note, parse_task_row, render_note, NOTE_HEADER};
    use crate::model::task::{Priority, Task, TaskStatus};
    use crate::repo::RepoError;

    #[test]
    fn task_row_uses_four_tab_delimiter() {
        let task = Task::new("Buy milk", Priority::High).unwrap();
        assert_eq!(format_task_row(&task), "Buy milk\t\t\t\tHigh\t\t\t\tWIP");
    }

    #[test]
    fn parse_task_row_rejects_missing_fields() {
        let reason = parse_task_row("Buy milk\t\t\t\tHigh").unwrap_err();
        assert!(reason.contains("found 2"));
    }

    #[test]
    fn parse_task_row_rejects_unknown_status() {
        let reason = parse_task_row("Buy milk\t\t\t\tHigh\t\t\t\tDone").unwrap_err();
        assert!(reason.contains("Done"));
    }

    #[test]
    fn parse_note_skips_header_and_blank_lines() {
        let body = format!("{NOTE_HEADER}\nA\t\t\t\tLow\t\t\t\tComplete\n\nB\t\t\t\tSomeday\t\t\t\tWIP\n");
        let tasks = parse_note(&body, "x.txt").unwrap();
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].status, TaskStatus::Complete);
        assert_eq!(tasks[1].priority, Priority::Custom("Someday".to_string()));
    }

    #[test]
    fn parse_note_reports_line_of_bad_row() {
        let body = format!("{NOTE_HEADER}\nA\t\t\t\tLow\t\t\t\tWIP\nbroken\n");
        match parse_note(&body, "x.txt").unwrap_err() {
            RepoError::Parse { line, origin, .. } => {
                assert_eq!(line, 3);
                assert_eq!(origin, "x.txt");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn render_note_starts_with_header() {
        assert_eq!(render_note(&[]), format!("{NOTE_HEADER}\n"));
    }
}
