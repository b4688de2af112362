//! Key event -> editing action, for emacs and vi bindings.

use super::EditMode;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Insert(char),
    Backspace,
    Delete,
    Left,
    Right,
    Home,
    End,
    WordLeft,
    WordRight,
    KillToEnd,
    KillToStart,
    KillWordBack,
    HistoryPrev,
    HistoryNext,
    Complete,
    ClearScreen,
    Submit,
    Interrupt,
    /// Ctrl-D: end of input on an empty line, delete otherwise.
    EndOrDelete,
    /// vi: leave insert mode.
    NormalMode,
    /// vi: enter insert mode, moving the cursor first.
    InsertMode(Motion),
    Ignore,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion {
    Stay,
    Right,
    Home,
    End,
}

/// Keys shared by every mode and vi insert mode.
fn common(key: &KeyEvent) -> Action {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Enter => Action::Submit,
        KeyCode::Char('c') if ctrl => Action::Interrupt,
        KeyCode::Char('d') if ctrl => Action::EndOrDelete,
        // Suspend is filtered out.
        KeyCode::Char('z') if ctrl => Action::Ignore,
        KeyCode::Char('l') if ctrl => Action::ClearScreen,
        KeyCode::Char('u') if ctrl => Action::KillToStart,
        KeyCode::Char('w') if ctrl => Action::KillWordBack,
        KeyCode::Tab => Action::Complete,
        KeyCode::Backspace => Action::Backspace,
        KeyCode::Delete => Action::Delete,
        KeyCode::Left => Action::Left,
        KeyCode::Right => Action::Right,
        KeyCode::Home => Action::Home,
        KeyCode::End => Action::End,
        KeyCode::Up => Action::HistoryPrev,
        KeyCode::Down => Action::HistoryNext,
        KeyCode::Char(_) if ctrl => Action::Ignore,
        KeyCode::Char(c) => Action::Insert(c),
        _ => Action::Ignore,
    }
}

fn emacs(key: &KeyEvent) -> Action {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let alt = key.modifiers.contains(KeyModifiers::ALT);
    match key.code {
        KeyCode::Char('a') if ctrl => Action::Home,
        KeyCode::Char('e') if ctrl => Action::End,
        KeyCode::Char('b') if ctrl => Action::Left,
        KeyCode::Char('f') if ctrl => Action::Right,
        KeyCode::Char('k') if ctrl => Action::KillToEnd,
        KeyCode::Char('p') if ctrl => Action::HistoryPrev,
        KeyCode::Char('n') if ctrl => Action::HistoryNext,
        KeyCode::Char('b') if alt => Action::WordLeft,
        KeyCode::Char('f') if alt => Action::WordRight,
        _ => common(key),
    }
}

fn vi_normal(key: &KeyEvent) -> Action {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return common(key);
    }
    match key.code {
        KeyCode::Char('h') => Action::Left,
        KeyCode::Char('l') | KeyCode::Char(' ') => Action::Right,
        KeyCode::Char('0') | KeyCode::Char('^') => Action::Home,
        KeyCode::Char('$') => Action::End,
        KeyCode::Char('w') => Action::WordRight,
        KeyCode::Char('b') => Action::WordLeft,
        KeyCode::Char('x') => Action::Delete,
        KeyCode::Char('D') => Action::KillToEnd,
        KeyCode::Char('k') => Action::HistoryPrev,
        KeyCode::Char('j') => Action::HistoryNext,
        KeyCode::Char('i') => Action::InsertMode(Motion::Stay),
        KeyCode::Char('a') => Action::InsertMode(Motion::Right),
        KeyCode::Char('I') => Action::InsertMode(Motion::Home),
        KeyCode::Char('A') => Action::InsertMode(Motion::End),
        KeyCode::Char(_) | KeyCode::Tab | KeyCode::Esc => Action::Ignore,
        _ => common(key),
    }
}

/// Map a key press to an action given the mode and, for vi, whether
/// the editor is in normal (command) mode.
pub fn action_for(key: &KeyEvent, mode: EditMode, normal: bool) -> Action {
    match mode {
        EditMode::Emacs => emacs(key),
        EditMode::Vi if normal => vi_normal(key),
        EditMode::Vi => match key.code {
            KeyCode::Esc => Action::NormalMode,
            _ => common(key),
        },
    }
}
