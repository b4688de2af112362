// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// PROMPT LOCK
//
// The heartbeat and the confirmation gate both rewrite and repaint the same
// prompt. The prompt can only be changed through a `PromptSession`, which is
// a held lock; a line solicited through the session blocks the heartbeat
// until the session is dropped.
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use crate::editor::{EditMode, LineEditor, ReadOutcome};
use std::io;
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptState {
    pub text: String,
    pub mode: EditMode,
}

pub struct PromptLock {
    state: Mutex<PromptState>,
    editor: Arc<dyn LineEditor>,
}

impl PromptLock {
    pub fn new(editor: Arc<dyn LineEditor>, initial: &str) -> Self {
        editor.set_prompt(initial);
        Self {
            state: Mutex::new(PromptState {
                text: initial.to_string(),
                mode: EditMode::default(),
            }),
            editor,
        }
    }

    pub async fn lock(&self) -> PromptSession<'_> {
        PromptSession {
            state: self.state.lock().await,
            editor: &self.editor,
        }
    }

    /// Editor handle for reads that happen outside the lock (the main loop).
    pub fn editor(&self) -> Arc<dyn LineEditor> {
        Arc::clone(&self.editor)
    }
}

/// Exclusive access to the prompt; released on drop.
pub struct PromptSession<'a> {
    state: MutexGuard<'a, PromptState>,
    editor: &'a Arc<dyn LineEditor>,
}

impl PromptSession<'_> {
    pub fn text(&self) -> &str {
        &self.state.text
    }

    pub fn mode(&self) -> EditMode {
        self.state.mode
    }

    /// Replace the prompt and repaint it.
    pub fn set(&mut self, text: &str) {
        if self.state.text != text {
            self.state.text = text.to_string();
            self.editor.set_prompt(text);
        }
        self.editor.redraw();
    }

    pub fn set_mode(&mut self, mode: EditMode) {
        self.state.mode = mode;
        self.editor.set_edit_mode(mode);
    }

    /// Read one line while holding the lock.
    pub async fn solicit(&mut self) -> ReadOutcome {
        let editor = Arc::clone(self.editor);
        match tokio::task::spawn_blocking(move || editor.read_line()).await {
            Ok(outcome) => outcome,
            Err(e) => ReadOutcome::Failed(io::Error::new(io::ErrorKind::Other, e)),
        }
    }
}
