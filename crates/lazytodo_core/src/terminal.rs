//! Terminal collaborator contract.
//!
//! # Responsibility
//! - Abstract interactive prompts so auth and session flows stay testable.
//! - Provide a scripted implementation for tests and non-interactive runs.
//!
//! # Invariants
//! - `Ok(None)` from a read means the user cancelled (EOF or interrupt).
//! - Returned lines never include the trailing newline.
//! - `read_secret` implementations must not echo input.

use std::collections::VecDeque;
use std::io;

/// Prompt/print surface used by interactive flows.
pub trait Terminal {
    /// Prints `prompt` and reads one line.
    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>>;
    /// Prints `prompt` and reads one line without echoing it.
    fn read_secret(&mut self, prompt: &str) -> io::Result<Option<String>>;
    /// Prints one line of output.
    fn write_line(&mut self, message: &str) -> io::Result<()>;
}

/// Terminal fed from a fixed list of answers.
///
/// Prompts and output are recorded in `transcript` so tests can assert on
/// what the user would have seen. Running out of answers reads as a cancel.
#[derive(Debug, Default)]
pub struct ScriptedTerminal {
    answers: VecDeque<String>,
    transcript: Vec<String>,
}

impl ScriptedTerminal {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            transcript: Vec::new(),
        }
    }

    /// Everything printed so far, prompts included.
    pub fn transcript(&self) -> &[String] {
        &self.transcript
    }

    /// Returns `true` when any printed line contains `needle`.
    pub fn printed(&self, needle: &str) -> bool {
        self.transcript.iter().any(|line| line.contains(needle))
    }

    pub fn remaining_answers(&self) -> usize {
        self.answers.len()
    }

    fn next_answer(&mut self, prompt: &str) -> Option<String> {
        self.transcript.push(prompt.to_string());
        self.answers.pop_front()
    }
}

impl Terminal for ScriptedTerminal {
    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        Ok(self.next_answer(prompt))
    }

    fn read_secret(&mut self, prompt: &str) -> io::Result<Option<String>> {
        Ok(self.next_answer(prompt))
    }

    fn write_line(&mut self, message: &str) -> io::Result<()> {
        self.transcript.push(message.to_string());
        Ok(())
    }
}
