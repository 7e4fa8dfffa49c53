//! Live validation feedback for single-line input.
//!
//! A pure state machine: each keystroke plus the resulting buffer goes in,
//! an action and the next state come out. The session turns `Redraw` into a
//! new editor prompt carrying the matching icon.

use std::error::Error;

use crate::line::Key;
use crate::theme::Indicator;

use super::validate::{ValidationError, Validator};

/// What the prompt should do after a keystroke.
#[derive(Debug)]
pub enum FeedbackAction {
    /// Leave the prompt alone
    Pass,
    /// Redraw the prompt with this indicator
    Redraw(Indicator),
    /// The validator failed for good
    Abort(Box<dyn Error + Send + Sync>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feedback {
    /// No keystroke seen yet in the current read
    pub fresh: bool,
    /// Rejected input replayed as the start of a retry
    pub stale: Option<String>,
    /// The stale input has been replayed completely
    pub caught_up: bool,
    /// Indicator currently shown
    pub indicator: Indicator,
}

impl Default for Feedback {
    fn default() -> Self {
        Self {
            fresh: true,
            stale: None,
            caught_up: false,
            indicator: Indicator::Initial,
        }
    }
}

impl Feedback {
    pub fn new() -> Self {
        Self::default()
    }

    /// State for a retry read that replays `rejected`.
    pub fn retry(rejected: &str) -> Self {
        Self {
            fresh: true,
            stale: Some(rejected.to_string()),
            caught_up: false,
            indicator: Indicator::Bad,
        }
    }

    /// Advance on `key`; `line` is the buffer after the key was applied.
    pub fn step(mut self, line: &str, key: Key, validate: &Validator) -> (FeedbackAction, Feedback) {
        if key == Key::Enter || key.is_navigation() {
            return (FeedbackAction::Pass, self);
        }

        let was_fresh = self.fresh;
        self.fresh = false;

        if let Some(stale) = &self.stale {
            if !self.caught_up {
                if line == stale {
                    self.caught_up = true;
                    return (FeedbackAction::Pass, self);
                }
                if stale.starts_with(line) {
                    // Still replaying
                    return (FeedbackAction::Pass, self);
                }
                // Edited before the replay finished
                self.caught_up = true;
            } else if line == stale {
                // Already flagged as bad
                return (FeedbackAction::Pass, self);
            }
        } else if was_fresh {
            return (FeedbackAction::Pass, self);
        }

        let indicator = match validate(line) {
            Ok(()) if line.is_empty() => Indicator::Initial,
            Ok(()) => Indicator::Good,
            Err(ValidationError::Invalid(_)) => Indicator::Bad,
            Err(ValidationError::Fatal(err)) => return (FeedbackAction::Abort(err), self),
        };
        self.indicator = indicator;
        (FeedbackAction::Redraw(indicator), self)
    }
}
