//! Yes/no prompt.
//!
//! Only the letters y and n (either case), plus one optional extra answer,
//! reach the buffer. The first of them ends the read without waiting for
//! Enter; Enter on an empty line picks the default.

use tracing::debug;

use crate::error::{PromptError, Result};
use crate::line::{Key, KeyHandler, LineState, Reaction};
use crate::theme::Indicator;

use super::session::{BasicPrompt, SessionConfig};
use super::Prompter;

/// A y/n question.
#[derive(Clone)]
pub struct ConfirmPrompt {
    /// `basic.default` must be one of Y, N, y, n or empty (meaning N)
    pub basic: BasicPrompt,
    /// Extra accepted answer; only its first character is typed
    pub confirm_opt: String,
}

impl ConfirmPrompt {
    pub fn new(basic: BasicPrompt) -> Self {
        Self {
            basic,
            confirm_opt: String::new(),
        }
    }

    pub fn with_option(mut self, option: impl Into<String>) -> Self {
        self.confirm_opt = option.into();
        self
    }

    /// The default in upper case, or `IncorrectDefault`.
    pub fn default_answer(&self) -> Result<String> {
        match self.basic.default.as_str() {
            "" => Ok("N".to_string()),
            d @ ("Y" | "N" | "y" | "n") => Ok(d.to_uppercase()),
            other => Err(PromptError::IncorrectDefault(other.to_string())),
        }
    }

    /// Answer hint: "y/N" or "Y/n", plus "/<option>" when set.
    pub fn answers(&self, default: &str) -> String {
        let mut answers = if default == "Y" { "Y/n" } else { "y/N" }.to_string();
        if !self.confirm_opt.is_empty() {
            answers.push('/');
            answers.push_str(&self.confirm_opt);
        }
        answers
    }

    /// Ask the question; returns the upper-cased, formatted answer.
    pub fn run(&self, prompter: &mut Prompter) -> Result<String> {
        let default = self.default_answer()?;
        let config = prompter.resolve(&self.basic)?;

        let suggested = format!(" {}", (config.faint)(&format!("[{}]", self.answers(&default))));
        let prompt_text = config.prompt_text("?", &suggested);
        debug!(label = %self.basic.label, %default, "confirm started");

        let editor = prompter.editor();
        editor.set_prompt(&config.edit_prompt(Indicator::Initial, &prompt_text));

        let mut handler = ConfirmInput {
            alphabet: Alphabet::new(&self.confirm_opt),
            config: &config,
            prompt_text: &prompt_text,
            state: ConfirmState::Empty,
        };
        let answer = match editor.read_line(&mut handler) {
            Ok(answer) => answer,
            Err(err) => {
                editor.write("\n")?;
                return Err(err.into());
            }
        };

        let answer = if answer.is_empty() {
            default
        } else {
            answer.to_uppercase()
        };
        let answer = (config.formatter)(&answer);
        let result_text = config.result_text("?", &suggested);
        editor.write(&config.result_line(Indicator::Good, &result_text, &answer))?;
        Ok(answer)
    }
}

/// Characters a confirm prompt lets through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Alphabet {
    extra: Option<char>,
}

impl Alphabet {
    pub fn new(option: &str) -> Self {
        Self {
            extra: option.chars().next(),
        }
    }

    pub fn contains(&self, ch: char) -> bool {
        matches!(ch, 'Y' | 'y' | 'N' | 'n')
            || self
                .extra
                .is_some_and(|extra| extra.to_lowercase().eq(ch.to_lowercase()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConfirmState {
    Empty,
    Accepted,
}

struct ConfirmInput<'a> {
    alphabet: Alphabet,
    config: &'a SessionConfig,
    prompt_text: &'a str,
    state: ConfirmState,
}

impl KeyHandler for ConfirmInput<'_> {
    fn accept(&mut self, key: Key) -> bool {
        match key {
            Key::Char(ch) => self.alphabet.contains(ch),
            other => other.is_control(),
        }
    }

    fn on_key(&mut self, line: &LineState, key: Key) -> Reaction {
        if key == Key::Enter || key.is_navigation() {
            return Reaction::pass();
        }
        if let Key::Char(ch) = key {
            self.state = ConfirmState::Accepted;
            return Reaction {
                line: Some(LineState::from_text(&ch.to_string())),
                prompt: Some(self.config.edit_prompt(Indicator::Good, self.prompt_text)),
                submit: true,
                ..Reaction::pass()
            };
        }
        // Backspace
        let indicator = if line.is_empty() {
            self.state = ConfirmState::Empty;
            Indicator::Initial
        } else {
            Indicator::Good
        };
        Reaction::redraw(self.config.edit_prompt(indicator, self.prompt_text))
    }
}
