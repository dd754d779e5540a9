//! Task domain model.
//!
//! # Responsibility
//! - Define the task row stored inside a note file.
//! - Own label parsing for priority and status values.
//!
//! # Invariants
//! - New tasks always start as `TaskStatus::Wip`.
//! - `description` is non-empty and free of tabs and line breaks, because the
//!   note file format has no escaping.
//! - Tasks have no stable ID; position inside the note is the identity.

use super::ValidationError;
use std::fmt::{Display, Formatter};

/// Task lifecycle state.
///
/// The only transition is `Wip -> Complete`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    /// Work in progress (default for new tasks).
    Wip,
    /// Finished.
    Complete,
}

impl TaskStatus {
    /// Canonical on-disk label.
    pub fn as_label(self) -> &'static str {
        match self {
            Self::Wip => "WIP",
            Self::Complete => "Complete",
        }
    }

    /// Parses a status label, case-insensitively.
    pub fn from_label(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "wip" => Some(Self::Wip),
            "complete" => Some(Self::Complete),
            _ => None,
        }
    }
}

impl Display for TaskStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_label())
    }
}

/// Priority label attached to a task.
///
/// Interactive input is limited to the three named levels. `Custom` exists so
/// hand-edited files with other labels still read back unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Priority {
    High,
    Medium,
    Low,
    Custom(String),
}

impl Priority {
    /// Parses one of `High|Medium|Low`, case-insensitively.
    pub fn parse_level(value: &str) -> Result<Self, ValidationError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "high" => Ok(Self::High),
            "medium" => Ok(Self::Medium),
            "low" => Ok(Self::Low),
            _ => Err(ValidationError::InvalidPriority(value.trim().to_string())),
        }
    }

    /// Maps a persisted label back to a priority, keeping unknown text.
    pub fn from_stored(value: &str) -> Self {
        Self::parse_level(value).unwrap_or_else(|_| Self::Custom(value.to_string()))
    }

    pub fn as_label(&self) -> &str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
            Self::Custom(value) => value.as_str(),
        }
    }
}

impl Display for Priority {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_label())
    }
}

/// One row of a note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub description: String,
    pub priority: Priority,
    pub status: TaskStatus,
}

impl Task {
    /// Creates a validated task in `WIP` state.
    pub fn new(description: impl Into<String>, priority: Priority) -> Result<Self, ValidationError> {
        let description = description.into();
        validate_description(&description)?;
        Ok(Self {
            description,
            priority,
            status: TaskStatus::Wip,
        })
    }

    pub fn is_complete(&self) -> bool {
        self.status == TaskStatus::Complete
    }
}

/// Checks that a description can be stored as one delimited field.
pub fn validate_description(description: &str) -> Result<(), ValidationError> {
    if description.trim().is_empty() {
        return Err(ValidationError::EmptyDescription);
    }
    if description.contains(['\t', '\n', '\r']) {
        return Err(ValidationError::DescriptionHasControlChars);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{Priority, Task, TaskStatus};
    use crate::model::ValidationError;

    #[test]
    fn new_task_defaults_to_wip() {
        let task = Task::new("Buy milk", Priority::High).unwrap();
        assert_eq!(task.status, TaskStatus::Wip);
        assert!(!task.is_complete());
    }

    #[test]
    fn priority_levels_parse_case_insensitively() {
        assert_eq!(Priority::parse_level(" high ").unwrap(), Priority::High);
        assert_eq!(Priority::parse_level("MEDIUM").unwrap(), Priority::Medium);
        assert!(matches!(
            Priority::parse_level("urgent"),
            Err(ValidationError::InvalidPriority(_))
        ));
    }

    #[test]
    fn stored_priority_keeps_unknown_labels() {
        assert_eq!(
            Priority::from_stored("Someday"),
            Priority::Custom("Someday".to_string())
        );
        assert_eq!(Priority::from_stored("Low"), Priority::Low);
    }

    #[test]
    fn description_rejects_tabs_and_blank_text() {
        assert_eq!(
            Task::new("   ", Priority::Low).unwrap_err(),
            ValidationError::EmptyDescription
        );
        assert_eq!(
            Task::new("a\tb", Priority::Low).unwrap_err(),
            ValidationError::DescriptionHasControlChars
        );
    }

    #[test]
    fn status_labels_roundtrip() {
        for status in [TaskStatus::Wip, TaskStatus::Complete] {
            assert_eq!(TaskStatus::from_label(status.as_label()), Some(status));
        }
        assert_eq!(TaskStatus::from_label("done"), None);
    }
}
