// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// TERMINAL LINE EDITOR (crossterm)
//
// Raw mode is held only for the duration of one `read_line`. The editor state
// sits behind a std mutex that is never held across the blocking event read,
// so `set_prompt` + `redraw` from the heartbeat can repaint mid-typing.
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use super::buffer::LineBuffer;
use super::complete::{complete, console_tree, Completion, Item};
use super::keymap::{action_for, Action, Motion};
use super::{EditMode, LineEditor, ReadOutcome};
use crossterm::cursor::{MoveTo, MoveToColumn};
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::style::Print;
use crossterm::terminal::{self, Clear, ClearType};
use crossterm::{queue, QueueableCommand};
use std::io::{self, IsTerminal, Write};
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Default)]
struct State {
    prompt: String,
    line: LineBuffer,
    mode: EditMode,
    /// vi command mode
    normal: bool,
    reading: bool,
    history: Vec<String>,
    history_pos: Option<usize>,
    /// Line being typed before history browsing started.
    stash: String,
}

impl State {
    fn history_prev(&mut self) {
        if self.history.is_empty() {
            return;
        }
        let pos = match self.history_pos {
            None => {
                self.stash = self.line.text();
                self.history.len() - 1
            }
            Some(p) => p.saturating_sub(1),
        };
        self.history_pos = Some(pos);
        self.line.set(&self.history[pos]);
    }

    fn history_next(&mut self) {
        match self.history_pos {
            None => {}
            Some(p) if p + 1 < self.history.len() => {
                self.history_pos = Some(p + 1);
                self.line.set(&self.history[p + 1]);
            }
            Some(_) => {
                self.history_pos = None;
                let stash = std::mem::take(&mut self.stash);
                self.line.set(&stash);
            }
        }
    }

    fn remember(&mut self, text: &str) {
        if text.trim().is_empty() || self.history.last().map(String::as_str) == Some(text) {
            return;
        }
        self.history.push(text.to_string());
    }
}

/// Display width of `s` ignoring ANSI escape sequences.
fn visible_width(s: &str) -> usize {
    let mut width = 0;
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\x1b' {
            if chars.peek() == Some(&'[') {
                chars.next();
                for c in chars.by_ref() {
                    if ('@'..='~').contains(&c) {
                        break;
                    }
                }
            }
            continue;
        }
        width += 1;
    }
    width
}

fn render(state: &State) -> io::Result<()> {
    let mut out = io::stdout().lock();
    let column = visible_width(&state.prompt) + state.line.head().chars().count();
    queue!(
        out,
        MoveToColumn(0),
        Clear(ClearType::CurrentLine),
        Print(&state.prompt),
        Print(state.line.text()),
        MoveToColumn(u16::try_from(column).unwrap_or(u16::MAX)),
    )?;
    out.flush()
}

fn finish_line(marker: &str) -> io::Result<()> {
    let mut out = io::stdout().lock();
    out.queue(Print(format!("{}\r\n", marker)))?;
    out.flush()
}

/// Disables raw mode when dropped, including on early returns.
struct RawMode;

impl RawMode {
    fn enable() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        Ok(RawMode)
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        if let Err(e) = terminal::disable_raw_mode() {
            log::error!("failed to leave raw mode: {}", e);
        }
    }
}

pub struct TerminalEditor {
    state: Mutex<State>,
    tree: Vec<Item>,
}

impl TerminalEditor {
    /// Fails when stdin/stdout are not attached to a terminal.
    pub fn new(prompt: &str) -> io::Result<Self> {
        if !io::stdin().is_terminal() || !io::stdout().is_terminal() {
            return Err(io::Error::new(
                io::ErrorKind::Unsupported,
                "standard input is not a terminal",
            ));
        }
        // Probe raw mode once so an unusable terminal fails at startup.
        drop(RawMode::enable()?);
        Ok(Self {
            state: Mutex::new(State {
                prompt: prompt.to_string(),
                ..State::default()
            }),
            tree: console_tree(),
        })
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn apply(&self, state: &mut State, action: Action) -> io::Result<Option<ReadOutcome>> {
        match action {
            Action::Insert(c) => state.line.insert(c),
            Action::Backspace => state.line.backspace(),
            Action::Delete => state.line.delete(),
            Action::Left => state.line.left(),
            Action::Right => state.line.right(),
            Action::Home => state.line.home(),
            Action::End => state.line.end(),
            Action::WordLeft => state.line.word_left(),
            Action::WordRight => state.line.word_right(),
            Action::KillToEnd => state.line.kill_to_end(),
            Action::KillToStart => state.line.kill_to_start(),
            Action::KillWordBack => state.line.kill_word_back(),
            Action::HistoryPrev => state.history_prev(),
            Action::HistoryNext => state.history_next(),
            Action::Complete => match complete(&self.tree, &state.line.head()) {
                Completion::None => {}
                Completion::Insert(text) => state.line.insert_str(&text),
                Completion::Ambiguous(words) => finish_line(&format!("\r\n{}", words.join("  ")))?,
            },
            Action::ClearScreen => {
                let mut out = io::stdout().lock();
                queue!(out, Clear(ClearType::All), MoveTo(0, 0))?;
                out.flush()?;
            }
            Action::Submit => {
                let text = state.line.text();
                state.reading = false;
                finish_line("")?;
                state.remember(&text);
                return Ok(Some(ReadOutcome::Line(text)));
            }
            Action::Interrupt => {
                state.reading = false;
                finish_line("^C")?;
                return Ok(Some(ReadOutcome::Interrupted(state.line.text())));
            }
            Action::EndOrDelete => {
                if state.line.is_empty() {
                    state.reading = false;
                    finish_line("exit")?;
                    return Ok(Some(ReadOutcome::EndOfInput));
                }
                state.line.delete();
            }
            Action::NormalMode => {
                state.normal = true;
                state.line.left();
            }
            Action::InsertMode(motion) => {
                state.normal = false;
                match motion {
                    Motion::Stay => {}
                    Motion::Right => state.line.right(),
                    Motion::Home => state.line.home(),
                    Motion::End => state.line.end(),
                }
            }
            Action::Ignore => {}
        }
        if state.normal {
            state.line.clamp_for_normal_mode();
        }
        Ok(None)
    }

    fn read_raw(&self) -> io::Result<ReadOutcome> {
        let _raw = RawMode::enable()?;
        {
            let mut state = self.lock();
            state.line.clear();
            state.normal = false;
            state.history_pos = None;
            state.reading = true;
            render(&state)?;
        }

        loop {
            let key = match event::read()? {
                Event::Key(key) if key.kind != KeyEventKind::Release => key,
                Event::Resize(..) => {
                    self.redraw();
                    continue;
                }
                _ => continue,
            };

            let mut state = self.lock();
            let action = action_for(&key, state.mode, state.normal);
            if let Some(outcome) = self.apply(&mut state, action)? {
                return Ok(outcome);
            }
            render(&state)?;
        }
    }
}

impl LineEditor for TerminalEditor {
    fn read_line(&self) -> ReadOutcome {
        match self.read_raw() {
            Ok(outcome) => outcome,
            Err(e) => {
                self.lock().reading = false;
                ReadOutcome::Failed(e)
            }
        }
    }

    fn set_prompt(&self, prompt: &str) {
        self.lock().prompt = prompt.to_string();
    }

    fn redraw(&self) {
        let state = self.lock();
        if state.reading {
            if let Err(e) = render(&state) {
                log::debug!("redraw failed: {}", e);
            }
        }
    }

    fn set_edit_mode(&self, mode: EditMode) {
        let mut state = self.lock();
        state.mode = mode;
        state.normal = false;
    }
}
