use super::{EditMode, LineEditor, ReadOutcome};
use std::io::{self, BufRead, Write};
use std::sync::Mutex;

/// Line source for non-interactive stdin (pipes, here-docs, scripts).
///
/// Prints the current prompt before each read; redraws and edit modes are
/// meaningless without a terminal and are ignored.
pub struct PipedEditor<R> {
    input: Mutex<R>,
    prompt: Mutex<String>,
}

impl PipedEditor<io::BufReader<io::Stdin>> {
    pub fn stdin() -> Self {
        Self::new(io::BufReader::new(io::stdin()))
    }
}

impl<R: BufRead + Send> PipedEditor<R> {
    pub fn new(input: R) -> Self {
        Self {
            input: Mutex::new(input),
            prompt: Mutex::new(String::new()),
        }
    }
}

impl<R: BufRead + Send> LineEditor for PipedEditor<R> {
    fn read_line(&self) -> ReadOutcome {
        {
            let prompt = self.prompt.lock().unwrap_or_else(|p| p.into_inner());
            let mut out = io::stdout().lock();
            if let Err(e) = out.write_all(prompt.as_bytes()).and_then(|_| out.flush()) {
                return ReadOutcome::Failed(e);
            }
        }

        let mut input = self.input.lock().unwrap_or_else(|p| p.into_inner());
        let mut line = String::new();
        match input.read_line(&mut line) {
            Ok(0) => ReadOutcome::EndOfInput,
            Ok(_) => {
                let trimmed = line.trim_end_matches(['\r', '\n']);
                // Echo so transcripts read like an interactive session.
                println!("{}", trimmed);
                ReadOutcome::Line(trimmed.to_string())
            }
            Err(e) => ReadOutcome::Failed(e),
        }
    }

    fn set_prompt(&self, prompt: &str) {
        *self.prompt.lock().unwrap_or_else(|p| p.into_inner()) = prompt.to_string();
    }

    fn redraw(&self) {}

    fn set_edit_mode(&self, _mode: EditMode) {}
}
