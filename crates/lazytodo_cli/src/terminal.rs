//! Stdin/stdout terminal with no-echo secret input.
//!
//! # Invariants
//! - Raw mode is only held while a secret is being typed and is always
//!   restored, including on read errors.
//! - When stdin is not a TTY, secrets are read as plain lines so piped input
//!   keeps working.

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use lazytodo_core::Terminal;
use std::io::{self, BufRead, IsTerminal, Write};

pub struct StdTerminal {
    stdin: io::Stdin,
    stdout: io::Stdout,
}

impl Default for StdTerminal {
    fn default() -> Self {
        Self::new()
    }
}

impl StdTerminal {
    pub fn new() -> Self {
        Self {
            stdin: io::stdin(),
            stdout: io::stdout(),
        }
    }

    fn print_prompt(&mut self, prompt: &str) -> io::Result<()> {
        writeln!(self.stdout, "{prompt}")?;
        self.stdout.flush()
    }

    fn read_plain(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.stdin.lock().read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    fn read_hidden(&mut self) -> io::Result<Option<String>> {
        let guard = RawModeGuard::enable()?;
        let mut secret = String::new();
        let entered = loop {
            let Event::Key(KeyEvent {
                code,
                modifiers,
                kind,
                ..
            }) = event::read()?
            else {
                continue;
            };
            if kind == KeyEventKind::Release {
                continue;
            }
            match code {
                KeyCode::Enter => break true,
                KeyCode::Esc => break false,
                KeyCode::Char('c' | 'd') if modifiers.contains(KeyModifiers::CONTROL) => {
                    break false
                }
                KeyCode::Char(ch) => secret.push(ch),
                KeyCode::Backspace => {
                    secret.pop();
                }
                _ => {}
            }
        };
        drop(guard);
        // Raw mode swallowed the newline.
        writeln!(self.stdout)?;
        Ok(entered.then_some(secret))
    }
}

impl Terminal for StdTerminal {
    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        self.print_prompt(prompt)?;
        self.read_plain()
    }

    fn read_secret(&mut self, prompt: &str) -> io::Result<Option<String>> {
        self.print_prompt(prompt)?;
        if self.stdin.is_terminal() {
            self.read_hidden()
        } else {
            self.read_plain()
        }
    }

    fn write_line(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.stdout, "{message}")
    }
}

struct RawModeGuard;

impl RawModeGuard {
    fn enable() -> io::Result<Self> {
        enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
    }
}
