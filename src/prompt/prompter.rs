//! Entry point owning the terminal side of every prompt.

use std::io;

use tracing::debug;

use crate::config::Config;
use crate::error::Result;
use crate::external::{ExternalEditor, SystemEditor};
use crate::line::{Editor, LineEditor};
use crate::theme::Theme;

use super::confirm::ConfirmPrompt;
use super::multiline::MultilinePrompt;
use super::session::{BasicPrompt, SessionConfig};
use super::single::Prompt;

/// Line editor, external editor, theme and settings shared by the prompts
/// of one program.
pub struct Prompter {
    editor: Box<dyn LineEditor>,
    external: Box<dyn ExternalEditor>,
    theme: Theme,
    config: Config,
}

impl Prompter {
    pub fn new(editor: impl LineEditor + 'static, theme: Theme) -> Self {
        Self {
            editor: Box::new(editor),
            external: Box::new(SystemEditor::default()),
            theme,
            config: Config::default(),
        }
    }

    /// Prompter on stdin/stdout with the saved configuration.
    pub fn stdio() -> Self {
        Self::from_config(Config::load())
    }

    pub fn from_config(config: Config) -> Self {
        let theme = config.get_theme();
        debug!(theme = %theme.name, "prompter created");
        Self::new(Editor::stdio(), theme).with_config(config)
    }

    /// Apply settings: interrupt echo, editor command and prompt defaults.
    pub fn with_config(mut self, config: Config) -> Self {
        self.editor.set_interrupt_prompt(&config.interrupt_prompt);
        self.external = Box::new(SystemEditor::new(config.editor.clone()));
        self.config = config;
        self
    }

    pub fn with_external_editor(mut self, external: impl ExternalEditor + 'static) -> Self {
        self.external = Box::new(external);
        self
    }

    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn editor(&mut self) -> &mut dyn LineEditor {
        self.editor.as_mut()
    }

    pub fn external_editor(&mut self) -> &mut dyn ExternalEditor {
        self.external.as_mut()
    }

    /// Resolve `basic` against the theme and prepare the line editor.
    pub fn resolve(&mut self, basic: &BasicPrompt) -> io::Result<SessionConfig> {
        basic.resolve(&self.theme, self.editor.as_mut())
    }

    /// Options carrying the configured indent, icons and editing mode.
    pub fn basic(&self, label: &str, default: &str) -> BasicPrompt {
        BasicPrompt {
            indent: self.config.indent.clone(),
            no_icons: self.config.no_icons,
            vim_mode: self.config.vim_mode,
            ..BasicPrompt::new(label).with_default(default)
        }
    }

    /// One line of input.
    pub fn ask(&mut self, label: &str, default: &str) -> Result<String> {
        Prompt::new(self.basic(label, default)).run(self)
    }

    /// One line of input, echoed with the configured mask character.
    pub fn ask_masked(&mut self, label: &str, default: &str) -> Result<String> {
        Prompt::masked(self.basic(label, default), self.config.mask).run(self)
    }

    /// y/N question; returns "Y" or "N".
    pub fn confirm(&mut self, label: &str, default: &str, no_icons: bool) -> Result<String> {
        let mut basic = self.basic(label, default);
        basic.no_icons = no_icons;
        ConfirmPrompt::new(basic).run(self)
    }

    /// Several lines, finished by two empty lines.
    pub fn multiline(&mut self, label: &str, default: &str) -> Result<String> {
        MultilinePrompt::new(self.basic(label, default)).run(self)
    }
}
