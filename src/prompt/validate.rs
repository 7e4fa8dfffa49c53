//! Validators and formatters.

use std::error::Error;
use std::sync::Arc;

use thiserror::Error;

use crate::style::StyleFn;

/// Checks a candidate input.
pub type Validator = Arc<dyn Fn(&str) -> Result<(), ValidationError> + Send + Sync>;

/// Turns accepted input into the returned value.
pub type Formatter = StyleFn;

/// Why a validator refused input.
///
/// Only `Invalid` drives the bad indicator and the retry/recovery paths;
/// `Fatal` ends the session with `PromptError::Aborted`.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("{0}")]
    Invalid(String),

    #[error(transparent)]
    Fatal(Box<dyn Error + Send + Sync>),
}

impl ValidationError {
    pub fn invalid(message: impl Into<String>) -> Self {
        ValidationError::Invalid(message.into())
    }

    pub fn fatal(err: impl Into<Box<dyn Error + Send + Sync>>) -> Self {
        ValidationError::Fatal(err.into())
    }
}

/// Wrap a closure as a `Validator`.
pub fn validator<F>(check: F) -> Validator
where
    F: Fn(&str) -> Result<(), ValidationError> + Send + Sync + 'static,
{
    Arc::new(check)
}

/// Wrap a closure as a `Formatter`.
pub fn formatter<F>(format: F) -> Formatter
where
    F: Fn(&str) -> String + Send + Sync + 'static,
{
    Arc::new(format)
}

/// Accepts everything.
pub fn always_valid() -> Validator {
    Arc::new(|_: &str| Ok(()))
}
