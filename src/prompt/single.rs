//! Single-line prompt with live validation and optional masking.

use std::error::Error;
use std::io;

use tracing::debug;

use crate::error::{PromptError, ReadError, Result};
use crate::line::{Key, KeyHandler, LineEditor, LineState, Reaction};
use crate::term;
use crate::theme::Indicator;

use super::feedback::{Feedback, FeedbackAction};
use super::session::{BasicPrompt, SessionConfig};
use super::validate::ValidationError;
use super::Prompter;

/// Key that flips masking on and off while typing.
pub const DEFAULT_MASK_TOGGLE: char = '*';

/// A single line of free input.
#[derive(Clone)]
pub struct Prompt {
    pub basic: BasicPrompt,
    /// Shown instead of each typed character
    pub mask: Option<char>,
    /// Only used when `mask` is set
    pub mask_toggle: char,
}

impl Prompt {
    pub fn new(basic: BasicPrompt) -> Self {
        Self {
            basic,
            mask: None,
            mask_toggle: DEFAULT_MASK_TOGGLE,
        }
    }

    pub fn masked(basic: BasicPrompt, mask: char) -> Self {
        Self {
            mask: Some(mask),
            ..Self::new(basic)
        }
    }

    /// Read one line, re-asking until it passes validation.
    ///
    /// A rejected line comes back as the start of the retry with the error
    /// shown underneath. On success the edited line is replaced by a result
    /// line and the formatted input is returned.
    pub fn run(&self, prompter: &mut Prompter) -> Result<String> {
        let config = prompter.resolve(&self.basic)?;
        let prompt_text = config.prompt_text(":", "");
        debug!(label = %self.basic.label, masked = self.mask.is_some(), "prompt started");

        let editor = prompter.editor();
        editor.set_mask(self.mask);
        editor.set_prompt(&config.edit_prompt(Indicator::Initial, &prompt_text));
        editor.preload(&config.default);

        let mut handler = LiveInput {
            config: &config,
            prompt_text: &prompt_text,
            mask_toggle: self.mask.map(|_| self.mask_toggle),
            feedback: Feedback::new(),
            aborted: None,
        };
        let mut shown_error = false;

        let input = loop {
            let read = editor.read_line(&mut handler);
            if let Some(err) = handler.aborted.take() {
                editor.close()?;
                return Err(PromptError::Aborted(err));
            }
            let line = match read {
                Ok(line) => line,
                Err(err) => {
                    leave_failed_read(editor, &err, shown_error)?;
                    return Err(err.into());
                }
            };

            match config.check(&line) {
                Ok(()) => break line,
                Err(ValidationError::Invalid(message)) => {
                    debug!(%message, "input rejected");
                    handler.feedback = Feedback::retry(&line);
                    editor.preload(&line);
                    editor.set_prompt(&retry_prompt(&config, &prompt_text, &message));
                    shown_error = true;
                }
                Err(ValidationError::Fatal(err)) => {
                    editor.close()?;
                    return Err(PromptError::Aborted(err));
                }
            }
        };

        let echo = match self.mask {
            Some(mask) if editor.mask_enabled() => mask.to_string().repeat(input.chars().count()),
            _ => input.clone(),
        };
        let result_text = config.result_text(":", "");
        editor.write(&config.result_line(Indicator::Good, &result_text, &echo))?;
        if shown_error && editor.is_interactive() {
            // The error line sits right below the result line
            editor.write(&term::clear_line())?;
        }
        Ok((config.formatter)(&input))
    }
}

/// Move past the prompt after a failed read, wiping an error line left
/// below it by a retry.
fn leave_failed_read(
    editor: &mut dyn LineEditor,
    err: &ReadError,
    shown_error: bool,
) -> io::Result<()> {
    if !(shown_error && editor.is_interactive()) {
        return editor.write("\n");
    }
    if matches!(err, ReadError::Interrupt) {
        // The interrupt echo already moved onto the error line
        editor.write(&term::clear_line())?;
        editor.write("\n")
    } else {
        editor.write("\n")?;
        editor.write(&term::clear_line())
    }
}

/// Prompt for a retry: error on the line below, cursor back on the input.
fn retry_prompt(config: &SessionConfig, prompt_text: &str, message: &str) -> String {
    format!(
        "\r\n{}{}{}\r{}",
        term::clear_line(),
        config.error_line(message),
        term::up_line(1),
        config.edit_prompt(Indicator::Bad, prompt_text)
    )
}

/// Per-keystroke hook of a running single-line prompt.
struct LiveInput<'a> {
    config: &'a SessionConfig,
    prompt_text: &'a str,
    mask_toggle: Option<char>,
    feedback: Feedback,
    /// Set when the validator failed fatally; the read is submitted early
    aborted: Option<Box<dyn Error + Send + Sync>>,
}

impl KeyHandler for LiveInput<'_> {
    fn on_key(&mut self, line: &LineState, key: Key) -> Reaction {
        if key == Key::Enter {
            return Reaction::pass();
        }
        if let (Some(toggle), Key::Char(ch)) = (self.mask_toggle, key) {
            if ch == toggle {
                return Reaction {
                    line: Some(line.without_previous_char()),
                    toggle_mask: true,
                    ..Reaction::pass()
                };
            }
        }

        let state = std::mem::take(&mut self.feedback);
        let (action, next) = state.step(&line.text(), key, &self.config.validate);
        self.feedback = next;
        match action {
            FeedbackAction::Pass => Reaction::pass(),
            FeedbackAction::Redraw(indicator) => {
                Reaction::redraw(self.config.edit_prompt(indicator, self.prompt_text))
            }
            FeedbackAction::Abort(err) => {
                self.aborted = Some(err);
                Reaction::pass().submitted()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::testing::{scripted, scripted_terminal};
    use crate::prompt::validate::{formatter, validator};
    use crate::theme::Theme;

    fn good() -> String {
        Theme::unicode().icons.good
    }

    fn min_len(n: usize) -> crate::prompt::Validator {
        validator(move |s| {
            if s.chars().count() < n {
                Err(ValidationError::invalid(format!("at least {n} characters")))
            } else {
                Ok(())
            }
        })
    }

    #[test]
    fn test_can_read_input() {
        let (mut prompter, out) = scripted("hi\n", Theme::unicode());
        let result = Prompt::new(BasicPrompt::new("test")).run(&mut prompter).unwrap();
        assert_eq!(result, "hi");
        assert_eq!(out.text(), format!("{} test: \x1b[2mhi\x1b[0m\n", good()));
    }

    #[test]
    fn test_displays_masked_values() {
        let (mut prompter, out) = scripted("hi\n", Theme::unicode());
        let result = Prompt::masked(BasicPrompt::new("test"), '*').run(&mut prompter).unwrap();
        assert_eq!(result, "hi");
        assert_eq!(out.text(), format!("{} test: \x1b[2m**\x1b[0m\n", good()));
    }

    #[test]
    fn test_can_use_a_default() {
        let (mut prompter, out) = scripted("\n", Theme::unicode());
        let basic = BasicPrompt::new("test").with_default("hi");
        assert_eq!(Prompt::new(basic).run(&mut prompter).unwrap(), "hi");
        assert_eq!(out.text(), format!("{} test: \x1b[2mhi\x1b[0m\n", good()));
    }

    #[test]
    fn test_mask_toggle_key() {
        // Toggled off before submitting: echoed in clear, '*' never stored
        let (mut prompter, out) = scripted("se*cret\n", Theme::plain());
        let result = Prompt::masked(BasicPrompt::new("pw"), '#').run(&mut prompter).unwrap();
        assert_eq!(result, "secret");
        assert_eq!(out.text(), "✔ pw: secret\n");

        // Toggled twice: masked again
        let (mut prompter, out) = scripted("ab**c\n", Theme::plain());
        let result = Prompt::masked(BasicPrompt::new("pw"), '#').run(&mut prompter).unwrap();
        assert_eq!(result, "abc");
        assert_eq!(out.text(), "✔ pw: ###\n");
    }

    #[test]
    fn test_toggle_key_is_plain_text_without_mask() {
        let (mut prompter, _) = scripted("a*b\n", Theme::plain());
        assert_eq!(Prompt::new(BasicPrompt::new("x")).run(&mut prompter).unwrap(), "a*b");
    }

    #[test]
    fn test_retry_preloads_rejected_input() {
        // "ab" is too short; the retry starts from "ab" and "c" completes it
        let (mut prompter, out) = scripted("ab\nc\n", Theme::plain());
        let basic = BasicPrompt::new("code").with_validator(min_len(3));
        assert_eq!(Prompt::new(basic).run(&mut prompter).unwrap(), "abc");
        // Only the result line reaches a non-terminal output
        assert_eq!(out.text(), "✔ code: abc\n");
    }

    #[test]
    fn test_retry_prompt_on_terminal() {
        let (mut prompter, out) = crate::prompt::testing::scripted_terminal("ab\nc\n", Theme::plain());
        let basic = BasicPrompt::new("code").with_validator(min_len(3));
        assert_eq!(Prompt::new(basic).run(&mut prompter).unwrap(), "abc");

        let text = out.text();
        assert!(text.contains("\r\n\x1b[2KError: at least 3 characters\x1b[1A\r✗ code: "));
        // Error line below the result is cleared
        assert!(text.ends_with("✔ code: abc\n\x1b[2K"));
    }

    #[test]
    fn test_formatter_applies_to_result_only() {
        let (mut prompter, out) = scripted("bob\n", Theme::plain());
        let basic = BasicPrompt::new("name").with_formatter(formatter(|s| s.to_uppercase()));
        assert_eq!(Prompt::new(basic).run(&mut prompter).unwrap(), "BOB");
        assert_eq!(out.text(), "✔ name: bob\n");
    }

    #[test]
    fn test_interrupt_and_eof() {
        let (mut prompter, out) = scripted(b"ab\x03".to_vec(), Theme::plain());
        let err = Prompt::new(BasicPrompt::new("x")).run(&mut prompter).unwrap_err();
        assert!(err.is_interrupt());
        assert_eq!(out.text(), "\n");

        let (mut prompter, _) = scripted("", Theme::plain());
        let err = Prompt::new(BasicPrompt::new("x")).run(&mut prompter).unwrap_err();
        assert!(matches!(err, PromptError::Eof));
    }

    #[test]
    fn test_failed_retry_wipes_error_line() {
        let basic = BasicPrompt::new("x").with_validator(min_len(3));

        let (mut prompter, out) = scripted_terminal(b"ab\n\x03".to_vec(), Theme::plain());
        let err = Prompt::new(basic.clone()).run(&mut prompter).unwrap_err();
        assert!(err.is_interrupt());
        let text = out.text();
        assert!(text.contains("Error: at least 3 characters"));
        assert!(text.ends_with("^C\r\n\x1b[2K\n"));

        // Input ends while the rejected text is replayed
        let (mut prompter, out) = scripted_terminal("ab\n", Theme::plain());
        let err = Prompt::new(basic).run(&mut prompter).unwrap_err();
        assert!(matches!(err, PromptError::Eof));
        assert!(out.text().ends_with("ab\r\x1b[7C\n\x1b[2K"));
    }

    #[test]
    fn test_fatal_validator_aborts() {
        let basic = BasicPrompt::new("x").with_validator(validator(|s| {
            if s.contains('!') {
                Err(ValidationError::fatal("lookup failed"))
            } else {
                Ok(())
            }
        }));

        // Caught while typing
        let (mut prompter, _) = scripted("ab!\n", Theme::plain());
        let err = Prompt::new(basic.clone()).run(&mut prompter).unwrap_err();
        assert!(matches!(err, PromptError::Aborted(ref e) if e.to_string() == "lookup failed"));

        // First keystroke is not validated live; caught on submit instead
        let (mut prompter, _) = scripted("!\n", Theme::plain());
        let err = Prompt::new(basic).run(&mut prompter).unwrap_err();
        assert!(matches!(err, PromptError::Aborted(_)));
    }

    #[test]
    fn test_no_icons_and_indent() {
        let (mut prompter, out) = scripted("v\n", Theme::plain());
        let basic = BasicPrompt::new("x").without_icons().with_indent("  ");
        Prompt::new(basic).run(&mut prompter).unwrap();
        assert_eq!(out.text(), "  x: v\n");
    }
}
