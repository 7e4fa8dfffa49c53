//! Prompt sessions
//!
//! - **session**: options (`BasicPrompt`) and their resolved form
//! - **feedback**: per-keystroke validation and state icon
//! - **single**: single-line and masked input with retry
//! - **confirm**: y/n question
//! - **multiline**: several lines with external-editor recovery
//! - **prompter**: `Prompter`, owning the editor and theme, with shortcuts

pub mod confirm;
pub mod feedback;
pub mod multiline;
pub mod prompter;
pub mod session;
pub mod single;
pub mod validate;

pub use confirm::ConfirmPrompt;
pub use multiline::{MultilinePrompt, Recovery};
pub use prompter::Prompter;
pub use session::{BasicPrompt, SessionConfig, StylePair};
pub use single::Prompt;
pub use validate::{formatter, validator, Formatter, ValidationError, Validator};
