//! Yes/no gate in front of every value-moving action.

use crate::editor::ReadOutcome;
use crate::output::Output;
use crate::prompt::PromptLock;

pub const CONFIRM_PROMPT: &str = "Continue (N/y) ? ";

/// Pending action, as shown to the operator just before the gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmationRequest {
    pub description: String,
}

impl ConfirmationRequest {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
        }
    }
}

/// First non-blank character decides: `y` or `Y` accepts, anything else refuses.
pub fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().chars().next(), Some('y' | 'Y'))
}

/// Show `request`, then ask. The heartbeat is held off for the whole dialog
/// and the previous prompt is put back before the lock is released.
pub async fn confirm(prompt: &PromptLock, out: &Output, request: &ConfirmationRequest) -> bool {
    out.line(&request.description);

    let mut session = prompt.lock().await;
    let previous = session.text().to_string();
    session.set(CONFIRM_PROMPT);
    let outcome = session.solicit().await;
    session.set(&previous);
    drop(session);

    let accepted = match outcome {
        ReadOutcome::Line(answer) => is_affirmative(&answer),
        ReadOutcome::Interrupted(_) | ReadOutcome::EndOfInput => false,
        ReadOutcome::Failed(e) => {
            log::error!("confirmation read failed: {}", e);
            out.error(format!("Cannot read confirmation: {}", e));
            false
        }
    };

    if !accepted {
        out.line("Cancelled.");
    }
    accepted
}
