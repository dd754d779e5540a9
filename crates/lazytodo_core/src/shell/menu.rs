//! Post-login command table.

use std::fmt::{Display, Formatter};

/// One numeric menu entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MenuChoice {
    Exit,
    CreateNote,
    AddTask,
    DeleteTask,
    ListNotes,
    ShowTasks,
    CompleteTask,
    DeleteNote,
}

impl MenuChoice {
    /// Every entry in menu order.
    pub const ALL: [MenuChoice; 8] = [
        MenuChoice::Exit,
        MenuChoice::CreateNote,
        MenuChoice::AddTask,
        MenuChoice::DeleteTask,
        MenuChoice::ListNotes,
        MenuChoice::ShowTasks,
        MenuChoice::CompleteTask,
        MenuChoice::DeleteNote,
    ];

    pub fn code(self) -> u8 {
        match self {
            Self::Exit => 0,
            Self::CreateNote => 1,
            Self::AddTask => 2,
            Self::DeleteTask => 3,
            Self::ListNotes => 4,
            Self::ShowTasks => 5,
            Self::CompleteTask => 6,
            Self::DeleteNote => 7,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|choice| choice.code() == code)
    }

    /// Parses user input by numeric value, so `"1"`, `" 1 "` and `"01"` are
    /// the same choice.
    pub fn parse(input: &str) -> Option<Self> {
        input.trim().parse::<u8>().ok().and_then(Self::from_code)
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Exit => "Exit",
            Self::CreateNote => "Create a new note",
            Self::AddTask => "Add a task to a note",
            Self::DeleteTask => "Delete a task",
            Self::ListNotes => "List your notes",
            Self::ShowTasks => "Display the tasks of a note",
            Self::CompleteTask => "Mark a task as complete",
            Self::DeleteNote => "Delete a note",
        }
    }
}

impl Display for MenuChoice {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}. {}", self.code(), self.label())
    }
}
