//! Error types for keyprompt
//!
//! Validation failures never show up here unless a session gives up on them
//! (declined recovery); they are handled inside the session loops.

use std::io;
use thiserror::Error;

/// Errors surfaced by a line read.
#[derive(Error, Debug)]
pub enum ReadError {
    #[error("Interrupt")]
    Interrupt,

    #[error("end of input")]
    Eof,

    #[error("terminal I/O failed: {0}")]
    Io(#[from] io::Error),
}

/// Errors from the external editor round trip.
#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Error open temp file: {0}")]
    Open(#[source] io::Error),

    #[error("Error write temp file: {0}")]
    Write(#[source] io::Error),

    #[error("Error close temp file: {0}")]
    Close(#[source] io::Error),

    #[error("Failed to start editor '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("Editor '{command}' exited with status {code:?}")]
    Status { command: String, code: Option<i32> },

    #[error("Error read temp file: {0}")]
    Read(#[source] io::Error),
}

/// Errors returned by the prompt runners.
#[derive(Error, Debug)]
pub enum PromptError {
    /// Ctrl-C while reading.
    #[error("^C")]
    Interrupt,

    /// Input stream closed (Ctrl-D on an empty line).
    #[error("^D")]
    Eof,

    /// Confirm default outside of Y/N.
    #[error("Incorrect default value: {0:?}")]
    IncorrectDefault(String),

    /// Input that failed validation and was not fixed.
    #[error("{message}")]
    Invalid { input: String, message: String },

    /// The external editor failed; `input` is the last known text.
    #[error("in keyprompt editor: {source}")]
    Editor {
        input: String,
        #[source]
        source: EditorError,
    },

    /// The validator reported an unrecoverable error.
    #[error("validation aborted: {0}")]
    Aborted(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("terminal I/O failed: {0}")]
    Io(#[from] io::Error),
}

impl PromptError {
    /// Text the user had entered when the session failed, if it was kept.
    pub fn input(&self) -> Option<&str> {
        match self {
            PromptError::Invalid { input, .. } | PromptError::Editor { input, .. } => Some(input),
            _ => None,
        }
    }

    pub fn is_interrupt(&self) -> bool {
        matches!(self, PromptError::Interrupt)
    }
}

impl From<ReadError> for PromptError {
    fn from(err: ReadError) -> Self {
        match err {
            ReadError::Interrupt => PromptError::Interrupt,
            ReadError::Eof => PromptError::Eof,
            ReadError::Io(e) => PromptError::Io(e),
        }
    }
}

pub type Result<T> = std::result::Result<T, PromptError>;
