//! Line editor adapter.
//!
//! The console drives an editor through [`LineEditor`]: one blocking
//! `read_line` at a time, plus prompt updates and redraw requests that may
//! arrive from the heartbeat task while a read is in progress.

pub mod buffer;
pub mod complete;
pub mod keymap;
pub mod piped;
pub mod terminal;

use std::fmt;
use std::io;
use std::str::FromStr;

pub use piped::PipedEditor;
pub use terminal::TerminalEditor;

/// Key-binding style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditMode {
    Vi,
    #[default]
    Emacs,
}

impl FromStr for EditMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "vi" => Ok(EditMode::Vi),
            "emacs" => Ok(EditMode::Emacs),
            other => Err(other.to_string()),
        }
    }
}

impl fmt::Display for EditMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EditMode::Vi => f.write_str("vi"),
            EditMode::Emacs => f.write_str("emacs"),
        }
    }
}

/// Result of one line solicitation.
#[derive(Debug)]
pub enum ReadOutcome {
    Line(String),
    /// Ctrl-C; carries whatever had been typed so far.
    Interrupted(String),
    EndOfInput,
    Failed(io::Error),
}

pub trait LineEditor: Send + Sync {
    /// Block until the operator submits a line, interrupts, or input ends.
    fn read_line(&self) -> ReadOutcome;

    fn set_prompt(&self, prompt: &str);

    /// Repaint prompt and pending input. No-op when no read is in progress.
    fn redraw(&self);

    fn set_edit_mode(&self, mode: EditMode);
}
