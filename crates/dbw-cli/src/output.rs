//! Operator-facing output with the usual ✓ / ✗ / ℹ markers.

use colored::*;
use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

pub type Sink = Box<dyn Write + Send>;

/// Cloneable handle on the console's stdout/stderr pair.
///
/// A failed write is logged and remembered; see [`Output::has_failed`].
#[derive(Clone)]
pub struct Output {
    out: Arc<Mutex<Sink>>,
    err: Arc<Mutex<Sink>>,
    failed: Arc<AtomicBool>,
}

impl Output {
    pub fn new(out: Sink, err: Sink) -> Self {
        Self {
            out: Arc::new(Mutex::new(out)),
            err: Arc::new(Mutex::new(err)),
            failed: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn stdio() -> Self {
        Self::new(Box::new(io::stdout()), Box::new(io::stderr()))
    }

    fn write(&self, sink: &Mutex<Sink>, text: &str) {
        let mut sink = sink.lock().unwrap_or_else(|p| p.into_inner());
        if let Err(e) = writeln!(sink, "{}", text).and_then(|_| sink.flush()) {
            log::error!("console output failed: {}", e);
            self.failed.store(true, Ordering::SeqCst);
        }
    }

    /// True once any write to either sink has failed.
    pub fn has_failed(&self) -> bool {
        self.failed.load(Ordering::SeqCst)
    }

    pub fn line(&self, text: impl AsRef<str>) {
        self.write(&self.out, text.as_ref());
    }

    pub fn info(&self, msg: impl AsRef<str>) {
        self.line(format!("{} {}", "ℹ".blue().bold(), msg.as_ref()));
    }

    pub fn success(&self, msg: impl AsRef<str>) {
        self.line(format!("{} {}", "✓".green().bold(), msg.as_ref()));
    }

    pub fn error(&self, msg: impl AsRef<str>) {
        self.write(&self.err, &format!("{} {}", "✗".red().bold(), msg.as_ref()));
    }
}
