//! Note use-case service.
//!
//! # Responsibility
//! - Provide title-based create/list/read/delete APIs for one user.
//! - Resolve 1-based task positions for delete and status updates.
//!
//! # Invariants
//! - Appended tasks always start as `WIP`.
//! - Positions are re-resolved against the current file contents on every
//!   call, so later tasks shift down after a delete.
//! - Status updates only touch the status field.

use crate::model::note::NoteTitle;
use crate::model::task::{Priority, Task, TaskStatus};
use crate::repo::note_repo::NoteRepository;
use crate::repo::{RepoError, RepoResult};
use log::info;

/// Note service facade over repository implementations.
pub struct NoteService<R: NoteRepository> {
    repo: R,
}

impl<R: NoteRepository> NoteService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates an empty note and returns its sanitized title.
    ///
    /// # Errors
    /// - `Validation` when the title sanitizes to nothing usable.
    /// - `AlreadyExists` when a note with that title exists.
    pub fn create_note(&self, title: &str) -> RepoResult<NoteTitle> {
        let title = NoteTitle::parse(title)?;
        self.repo.create_note(&title)?;
        info!("event=note_create module=service status=ok");
        Ok(title)
    }

    /// Lists note titles. Order follows directory enumeration.
    pub fn list_notes(&self) -> RepoResult<Vec<String>> {
        self.repo.list_notes()
    }

    /// Reads tasks in file order.
    pub fn read_tasks(&self, title: &str) -> RepoResult<Vec<Task>> {
        let title = NoteTitle::parse(title)?;
        self.repo.read_tasks(&title)
    }

    /// Appends a task with status `WIP`.
    pub fn append_task(&self, title: &str, description: &str, priority: Priority) -> RepoResult<Task> {
        let title = NoteTitle::parse(title)?;
        let task = Task::new(description, priority)?;
        self.repo.append_task(&title, &task)?;
        info!(
            "event=task_append module=service status=ok description_len={}",
            task.description.chars().count()
        );
        Ok(task)
    }

    /// Removes the task at 1-based `index` and returns it.
    ///
    /// # Errors
    /// - `NotFound` when the note does not exist.
    /// - `IndexOutOfRange` when `index` is outside `1..=len`.
    pub fn delete_task(&self, title: &str, index: usize) -> RepoResult<Task> {
        let title = NoteTitle::parse(title)?;
        let mut removed = None;
        let remaining = self.repo.modify_tasks(&title, &mut |tasks: &mut Vec<Task>| {
            let position = resolve_index(index, tasks.len())?;
            removed = Some(tasks.remove(position));
            Ok(())
        })?;
        info!(
            "event=task_delete module=service status=ok index={} remaining={}",
            index,
            remaining.len()
        );
        removed.ok_or_else(|| RepoError::InvalidData("deleted task missing after rewrite".to_string()))
    }

    /// Sets the status of the task at 1-based `index` and returns the task.
    ///
    /// # Errors
    /// - `NotFound` when the note does not exist.
    /// - `IndexOutOfRange` when `index` is outside `1..=len`.
    pub fn set_status(&self, title: &str, index: usize, status: TaskStatus) -> RepoResult<Task> {
        let title = NoteTitle::parse(title)?;
        let mut position = 0;
        let tasks = self.repo.modify_tasks(&title, &mut |tasks: &mut Vec<Task>| {
            position = resolve_index(index, tasks.len())?;
            tasks[position].status = status;
            Ok(())
        })?;
        info!(
            "event=task_status module=service status=ok index={} task_status={}",
            index, status
        );
        tasks
            .get(position)
            .cloned()
            .ok_or_else(|| RepoError::InvalidData("updated task missing after rewrite".to_string()))
    }

    /// Deletes a note file irreversibly.
    pub fn delete_note(&self, title: &str) -> RepoResult<()> {
        let title = NoteTitle::parse(title)?;
        self.repo.delete_note(&title)?;
        info!("event=note_delete module=service status=ok");
        Ok(())
    }
}

/// Pairs each task with its 1-based display number.
pub fn numbered_tasks(tasks: &[Task]) -> impl Iterator<Item = (usize, &Task)> {
    tasks.iter().enumerate().map(|(offset, task)| (offset + 1, task))
}

/// Converts a 1-based index into a vector position.
fn resolve_index(index: usize, len: usize) -> RepoResult<usize> {
    if index == 0 || index > len {
        return Err(RepoError::IndexOutOfRange { index, len });
    }
    Ok(index - 1)
}

#[cfg(test)]
mod tests {
    use super::{numbered_tasks, resolve_index};
    use crate::model::task::{Priority, Task};
    use crate::repo::RepoError;

    #[test]
    fn resolve_index_is_one_based() {
        assert_eq!(resolve_index(1, 3).unwrap(), 0);
        assert_eq!(resolve_index(3, 3).unwrap(), 2);
        assert!(matches!(
            resolve_index(0, 3),
            Err(RepoError::IndexOutOfRange { index: 0, len: 3 })
        ));
        assert!(matches!(
            resolve_index(1, 0),
            Err(RepoError::IndexOutOfRange { index: 1, len: 0 })
        ));
    }

    #[test]
    fn numbering_starts_at_one() {
        let tasks = vec![
            Task::new("a", Priority::Low).unwrap(),
            Task::new("b", Priority::High).unwrap(),
        ];
        let numbers: Vec<usize> = numbered_tasks(&tasks).map(|(n, _)| n).collect();
        assert_eq!(numbers, vec![1, 2]);
    }
}
