// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// DERO BRIDGE WALLET - interactive console
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub mod command;
pub mod confirm;
pub mod console;
pub mod editor;
pub mod error;
pub mod heartbeat;
pub mod output;
pub mod prompt;

pub use command::{Command, Entry, Verb};
pub use confirm::{confirm, is_affirmative, ConfirmationRequest, CONFIRM_PROMPT};
pub use console::{Console, Flow};
pub use editor::{EditMode, LineEditor, ReadOutcome};
pub use error::{CommandError, ConsoleError};
pub use heartbeat::{status_prompt, Heartbeat};
pub use output::Output;
pub use prompt::{PromptLock, PromptSession};
