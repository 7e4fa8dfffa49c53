//! Prompt options and their resolution into a session configuration.
//!
//! `BasicPrompt` is what callers fill in (everything optional except the
//! label); `BasicPrompt::resolve` merges it with the injected `Theme`,
//! prepares the line editor and yields a `SessionConfig` in which every
//! styler, validator and icon is present.

use std::io;

use crate::line::LineEditor;
use crate::style::{StyleFn, Styler};
use crate::theme::{IconSet, Indicator, Theme};

use super::validate::{always_valid, Formatter, ValidationError, Validator};

/// Styler pair for text shown while editing and after submission.
#[derive(Clone, Default)]
pub struct StylePair {
    pub initial: Option<StyleFn>,
    pub result: Option<StyleFn>,
}

/// Options shared by every prompt kind.
#[derive(Clone, Default)]
pub struct BasicPrompt {
    /// Text displayed in front of the input
    pub label: String,
    /// Initial input, editable in place
    pub default: String,
    /// Runs after each keystroke and on submission
    pub validate: Option<Validator>,
    /// Applied to accepted input before it is returned
    pub formatter: Option<Formatter>,
    /// Placed before the state icon
    pub indent: String,
    /// Echoed on Ctrl-C; empty keeps the editor's current one
    pub interrupt_prompt: String,
    /// Empty icons (custom icons in `icons` still win)
    pub no_icons: bool,
    /// Icon overrides; empty strings fall back to the theme
    pub icons: IconSet,
    pub label_style: StylePair,
    pub prompt_style: StylePair,
    pub input_style: StylePair,
    pub vim_mode: bool,
    /// Printed once before the prompt
    pub preamble: Option<String>,
}

impl BasicPrompt {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Self::default()
        }
    }

    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = default.into();
        self
    }

    pub fn with_validator(mut self, validate: Validator) -> Self {
        self.validate = Some(validate);
        self
    }

    pub fn with_formatter(mut self, formatter: Formatter) -> Self {
        self.formatter = Some(formatter);
        self
    }

    pub fn with_indent(mut self, indent: impl Into<String>) -> Self {
        self.indent = indent.into();
        self
    }

    pub fn with_preamble(mut self, preamble: impl Into<String>) -> Self {
        self.preamble = Some(preamble.into());
        self
    }

    pub fn without_icons(mut self) -> Self {
        self.no_icons = true;
        self
    }

    /// Fill every unset option and prepare `editor` for a new session.
    pub fn resolve(&self, theme: &Theme, editor: &mut dyn LineEditor) -> io::Result<SessionConfig> {
        let pick = |custom: &str, themed: &str| -> String {
            if !custom.is_empty() {
                custom.to_string()
            } else if self.no_icons {
                String::new()
            } else {
                themed.to_string()
            }
        };
        let icons = IconSet {
            initial: pick(&self.icons.initial, &theme.icons.initial),
            good: pick(&self.icons.good, &theme.icons.good),
            quest: pick(&self.icons.quest, &theme.icons.quest),
            warn: pick(&self.icons.warn, &theme.icons.warn),
            bad: pick(&self.icons.bad, &theme.icons.bad),
        };

        let or_identity = |style: &Option<StyleFn>| style.clone().unwrap_or_else(Styler::identity);
        let config = SessionConfig {
            label: self.label.clone(),
            default: self.default.clone(),
            indent: self.indent.clone(),
            separator: if self.no_icons { "" } else { " " },
            icons,
            label_initial: or_identity(&self.label_style.initial),
            label_result: or_identity(&self.label_style.result),
            prompt_initial: self.prompt_style.initial.clone().unwrap_or_else(|| theme.bold.clone()),
            prompt_result: or_identity(&self.prompt_style.result),
            input_initial: or_identity(&self.input_style.initial),
            input_result: self.input_style.result.clone().unwrap_or_else(|| theme.faint.clone()),
            formatter: or_identity(&self.formatter),
            validate: self.validate.clone().unwrap_or_else(always_valid),
            faint: theme.faint.clone(),
            error: theme.error.clone(),
        };

        editor.set_vim_mode(self.vim_mode);
        if !self.interrupt_prompt.is_empty() {
            editor.set_interrupt_prompt(&self.interrupt_prompt);
        }
        editor.set_mask(None);
        editor.set_unique_edit_line(true);
        editor.set_painter(Some(config.input_initial.clone()));
        if let Some(preamble) = &self.preamble {
            editor.write(&format!("{}\n", preamble))?;
        }
        Ok(config)
    }
}

/// Fully resolved options for one running session.
#[derive(Clone)]
pub struct SessionConfig {
    pub label: String,
    pub default: String,
    pub indent: String,
    /// Between icon and prompt; empty without icons
    pub separator: &'static str,
    pub icons: IconSet,
    pub label_initial: StyleFn,
    pub label_result: StyleFn,
    pub prompt_initial: StyleFn,
    pub prompt_result: StyleFn,
    pub input_initial: StyleFn,
    pub input_result: StyleFn,
    pub formatter: Formatter,
    pub validate: Validator,
    /// Hint text
    pub faint: StyleFn,
    /// "Error: " prefix
    pub error: StyleFn,
}

impl SessionConfig {
    /// `label` + punctuation + hint, as shown while editing.
    pub fn prompt_text(&self, punctuation: &str, suggested: &str) -> String {
        format!("{}{}{} ", (self.label_initial)(&self.label), punctuation, suggested)
    }

    /// Same text with the result label style.
    pub fn result_text(&self, punctuation: &str, suggested: &str) -> String {
        format!("{}{}{} ", (self.label_result)(&self.label), punctuation, suggested)
    }

    /// Editor prompt: indent, icon, styled prompt text.
    pub fn edit_prompt(&self, indicator: Indicator, prompt_text: &str) -> String {
        format!(
            "{}{}{}{}",
            self.indent,
            self.icons.get(indicator),
            self.separator,
            (self.prompt_initial)(prompt_text)
        )
    }

    /// Line left on screen once the session is over (without newline).
    pub fn result_prompt(&self, indicator: Indicator, result_text: &str) -> String {
        format!(
            "{}{}{}{}",
            self.indent,
            self.icons.get(indicator),
            self.separator,
            (self.prompt_result)(result_text)
        )
    }

    /// Result prompt followed by the styled answer and a newline.
    pub fn result_line(&self, indicator: Indicator, result_text: &str, echo: &str) -> String {
        format!("{}{}\n", self.result_prompt(indicator, result_text), (self.input_result)(echo))
    }

    /// "Error: message" in the error style.
    pub fn error_line(&self, message: &str) -> String {
        format!("{}{}", (self.error)("Error: "), message)
    }

    pub fn check(&self, input: &str) -> Result<(), ValidationError> {
        (self.validate)(input)
    }
}
