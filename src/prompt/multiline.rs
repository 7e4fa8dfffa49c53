//! Multi-line prompt with external-editor recovery.
//!
//! ```text
//!  Collecting ──two empty lines──► Validating ──ok──► Done
//!                                    ▲      │invalid
//!                           edited   │      ▼
//!                                    └── Recovering ──declined──► Err(Invalid)
//! ```
//!
//! Every line drawn since the header is counted so that each pass through
//! Validating can erase exactly what is on screen before drawing the result.

use tracing::debug;

use crate::error::{PromptError, Result};
use crate::external::{ExternalEditor, SystemEditor};
use crate::line::{LineEditor, PassThrough};
use crate::term;
use crate::theme::Indicator;

use super::session::BasicPrompt;
use super::validate::ValidationError;
use super::Prompter;

/// Prompt of every line after the header.
pub const CONTINUATION: &str = "... ";

const HINT: &str = "Two empty lines to finish";

/// Replaces the editor round trip when input is rejected. Receives the
/// rejected text; its result is returned from `run` as is.
pub type Recovery = Box<dyn FnMut(&mut Prompter, String) -> Result<String>>;

/// Free text over several lines, finished by two empty lines.
pub struct MultilinePrompt {
    pub basic: BasicPrompt,
    pub on_error: Option<Recovery>,
    /// Editor command for recovery; the prompter's editor when unset
    pub editor: Option<String>,
}

#[derive(Debug)]
enum Phase {
    Collecting,
    Validating,
    Recovering(String),
    Done,
}

impl MultilinePrompt {
    pub fn new(basic: BasicPrompt) -> Self {
        Self {
            basic,
            on_error: None,
            editor: None,
        }
    }

    pub fn with_recovery(mut self, recovery: Recovery) -> Self {
        self.on_error = Some(recovery);
        self
    }

    pub fn with_editor(mut self, command: impl Into<String>) -> Self {
        self.editor = Some(command.into());
        self
    }

    pub fn run(&mut self, prompter: &mut Prompter) -> Result<String> {
        let config = prompter.resolve(&self.basic)?;
        let suggested = format!(" {}", (config.faint)(HINT));
        let prompt_text = config.prompt_text(":", &suggested);
        let result_text = config.result_text(":", &suggested);
        debug!(label = %self.basic.label, "multiline started");

        let editor = prompter.editor();
        let interactive = editor.is_interactive();
        editor.set_unique_edit_line(false);
        editor.preload(&config.default);
        editor.write(&format!("{}\n", config.edit_prompt(Indicator::Initial, &prompt_text)))?;
        editor.set_prompt(CONTINUATION);

        // Lines on screen that belong to this prompt, header included
        let mut rendered = 1;
        let mut buffer = String::new();
        let mut phase = Phase::Collecting;

        loop {
            phase = match phase {
                Phase::Collecting => {
                    let (text, reads) = collect(prompter.editor())?;
                    if interactive {
                        rendered += reads;
                    }
                    buffer = text;
                    Phase::Validating
                }
                Phase::Validating => {
                    buffer = (config.formatter)(buffer.trim_matches(|c| c == '\n' || c == '\r'));
                    let verdict = config.check(&buffer);
                    let indicator = if verdict.is_ok() {
                        Indicator::Good
                    } else {
                        Indicator::Bad
                    };

                    let editor = prompter.editor();
                    erase(editor, rendered)?;
                    editor.write(&format!(
                        "{}\n{}\n",
                        config.result_prompt(indicator, &result_text),
                        (config.input_result)(&buffer)
                    ))?;
                    rendered = line_count(&buffer) + 1;

                    match verdict {
                        Ok(()) => Phase::Done,
                        Err(ValidationError::Invalid(message)) => Phase::Recovering(message),
                        Err(ValidationError::Fatal(err)) => {
                            editor.close()?;
                            return Err(PromptError::Aborted(err));
                        }
                    }
                }
                Phase::Recovering(message) => {
                    if let Some(recover) = self.on_error.as_mut() {
                        debug!(%message, "rejected input passed to recovery callback");
                        return recover(prompter, buffer);
                    }

                    prompter.editor().write(&format!("{}\n", config.error_line(&message)))?;
                    rendered += 1;
                    let answer = prompter.confirm("Open editor to edit input", "", true)?;
                    rendered += 1;

                    if answer != "Y" {
                        erase(prompter.editor(), 2)?;
                        return Err(PromptError::Invalid { input: buffer, message });
                    }

                    debug!(%message, "editing rejected input externally");
                    let seed = std::mem::take(&mut buffer);
                    let edited = match &self.editor {
                        Some(command) => SystemEditor::new(Some(command.clone())).edit(&seed),
                        None => prompter.external_editor().edit(&seed),
                    };
                    buffer = edited.map_err(|source| PromptError::Editor { input: seed, source })?;
                    Phase::Validating
                }
                Phase::Done => return Ok(buffer),
            };
        }
    }
}

/// Read lines until two empty ones in a row. Returns the joined non-empty
/// lines and the number of reads.
fn collect(editor: &mut dyn LineEditor) -> Result<(String, usize)> {
    let mut lines = Vec::new();
    let mut reads = 0;
    let mut empty_run = 0;
    loop {
        let line = match editor.read_line(&mut PassThrough) {
            Ok(line) => line,
            Err(err) => {
                editor.write("\n")?;
                return Err(err.into());
            }
        };
        reads += 1;
        if line.is_empty() {
            empty_run += 1;
            if empty_run > 1 {
                return Ok((lines.join("\n"), reads));
            }
        } else {
            empty_run = 0;
            lines.push(line);
        }
    }
}

/// Clear `lines` lines above the cursor; nothing is drawn without a terminal.
fn erase(editor: &mut dyn LineEditor, lines: usize) -> Result<()> {
    if editor.is_interactive() && lines > 0 {
        editor.write(&term::clear_up_lines(lines))?;
    }
    Ok(())
}

fn line_count(text: &str) -> usize {
    text.split('\n').count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EditorError;
    use crate::prompt::testing::{scripted, scripted_terminal, FakeEditor};
    use crate::prompt::validate::{formatter, validator};
    use crate::prompt::Validator;
    use crate::theme::Theme;

    const HEADER: &str = "? notes: Two empty lines to finish \n";

    fn notes() -> MultilinePrompt {
        MultilinePrompt::new(BasicPrompt::new("notes"))
    }

    fn needs_ok() -> Validator {
        validator(|s| {
            if s.contains("ok") {
                Ok(())
            } else {
                Err(ValidationError::invalid("needs ok"))
            }
        })
    }

    #[test]
    fn test_two_empty_lines_finish() {
        let (mut prompter, out) = scripted("a\nb\n\n\n", Theme::plain());
        assert_eq!(notes().run(&mut prompter).unwrap(), "a\nb");
        assert_eq!(
            out.text(),
            format!("{HEADER}✔ notes: Two empty lines to finish \na\nb\n")
        );
    }

    #[test]
    fn test_single_empty_line_is_dropped() {
        let (mut prompter, _) = scripted("a\n\nb\n\n\n", Theme::plain());
        assert_eq!(notes().run(&mut prompter).unwrap(), "a\nb");
    }

    #[test]
    fn test_default_is_editable() {
        let (mut prompter, _) = scripted(" body\nmore\n\n\n", Theme::plain());
        let mut prompt = MultilinePrompt::new(BasicPrompt::new("notes").with_default("Request"));
        assert_eq!(prompt.run(&mut prompter).unwrap(), "Request body\nmore");
    }

    #[test]
    fn test_formatter_runs_before_validation() {
        let (mut prompter, out) = scripted("text\n\n\n", Theme::plain());
        let basic = BasicPrompt::new("notes")
            .with_formatter(formatter(|s| format!("{s} ok")))
            .with_validator(needs_ok());
        assert_eq!(MultilinePrompt::new(basic).run(&mut prompter).unwrap(), "text ok");
        assert!(out.text().ends_with("text ok\n"));
    }

    #[test]
    fn test_recovery_through_external_editor() {
        let (prompter, out) = scripted("bad\n\n\ny", Theme::plain());
        let fake = FakeEditor::replying(vec![Ok("\nok fixed\n".to_string())]);
        let mut prompter = prompter.with_external_editor(fake.clone());

        let mut prompt = MultilinePrompt::new(BasicPrompt::new("notes").with_validator(needs_ok()));
        assert_eq!(prompt.run(&mut prompter).unwrap(), "ok fixed");
        assert_eq!(fake.seeds(), vec!["bad".to_string()]);
        assert_eq!(
            out.text(),
            format!(
                "{HEADER}✗ notes: Two empty lines to finish \nbad\n\
                 Error: needs ok\n\
                 Open editor to edit input? [y/N] Y\n\
                 ✔ notes: Two empty lines to finish \nok fixed\n"
            )
        );
    }

    #[test]
    fn test_declined_recovery_returns_error() {
        let (prompter, _) = scripted("bad\n\n\nn", Theme::plain());
        let fake = FakeEditor::default();
        let mut prompter = prompter.with_external_editor(fake.clone());

        let mut prompt = MultilinePrompt::new(BasicPrompt::new("notes").with_validator(needs_ok()));
        let err = prompt.run(&mut prompter).unwrap_err();
        assert!(matches!(
            err,
            PromptError::Invalid { ref input, ref message } if input == "bad" && message == "needs ok"
        ));
        assert_eq!(err.input(), Some("bad"));
        assert!(fake.seeds().is_empty());
    }

    #[test]
    fn test_recovery_loops_until_valid() {
        let (prompter, _) = scripted("bad\n\n\nyy", Theme::plain());
        let fake = FakeEditor::replying(vec![Ok("still bad".to_string()), Ok("ok".to_string())]);
        let mut prompter = prompter.with_external_editor(fake.clone());

        let mut prompt = MultilinePrompt::new(BasicPrompt::new("notes").with_validator(needs_ok()));
        assert_eq!(prompt.run(&mut prompter).unwrap(), "ok");
        assert_eq!(fake.seeds(), vec!["bad".to_string(), "still bad".to_string()]);
    }

    #[test]
    fn test_editor_failure_keeps_text() {
        let (prompter, _) = scripted("bad\n\n\ny", Theme::plain());
        let fake = FakeEditor::replying(vec![Err(EditorError::Status {
            command: "vim".to_string(),
            code: Some(1),
        })]);
        let mut prompter = prompter.with_external_editor(fake);

        let mut prompt = MultilinePrompt::new(BasicPrompt::new("notes").with_validator(needs_ok()));
        let err = prompt.run(&mut prompter).unwrap_err();
        assert!(matches!(err, PromptError::Editor { source: EditorError::Status { .. }, .. }));
        assert_eq!(err.input(), Some("bad"));
    }

    #[test]
    fn test_recovery_callback_bypasses_editor() {
        let (prompter, out) = scripted("bad\n\n\n", Theme::plain());
        let fake = FakeEditor::default();
        let mut prompter = prompter.with_external_editor(fake.clone());

        let mut prompt = MultilinePrompt::new(BasicPrompt::new("notes").with_validator(needs_ok()))
            .with_recovery(Box::new(|_, text| Ok(format!("{text} (ok)"))));
        assert_eq!(prompt.run(&mut prompter).unwrap(), "bad (ok)");
        assert!(fake.seeds().is_empty());
        assert!(!out.text().contains("Error:"));
    }

    #[test]
    fn test_read_errors_end_the_session() {
        let (mut prompter, _) = scripted(b"line\n\x03".to_vec(), Theme::plain());
        assert!(notes().run(&mut prompter).unwrap_err().is_interrupt());

        let (mut prompter, _) = scripted("line\n", Theme::plain());
        assert!(matches!(notes().run(&mut prompter), Err(PromptError::Eof)));
    }

    #[test]
    fn test_default_lines_are_separate_reads() {
        let (prompter, out) = scripted_terminal("\n\nn", Theme::plain());
        let mut prompter = prompter.with_external_editor(FakeEditor::default());

        let basic = BasicPrompt::new("notes").with_default("a\nb").with_validator(needs_ok());
        let err = MultilinePrompt::new(basic).run(&mut prompter).unwrap_err();
        assert_eq!(err.input(), Some("a\nb"));

        let text = out.text();
        let step = "\x1b[1A\x1b[2K";
        let erase_at = text.find(step).unwrap();
        let drawn = text[..erase_at].matches('\n').count();
        // Header plus "a", "b" and the two empty lines
        assert_eq!(drawn, 5);
        assert!(text[erase_at..].starts_with(&format!("{}✗ notes", step.repeat(drawn))));
        assert!(!text[..erase_at].contains("a\nb"));
    }

    #[test]
    fn test_terminal_line_accounting() {
        let (prompter, out) = scripted_terminal("x\n\n\ny", Theme::plain());
        let fake = FakeEditor::replying(vec![Ok("ok\nok".to_string())]);
        let mut prompter = prompter.with_external_editor(fake);

        let mut prompt = MultilinePrompt::new(BasicPrompt::new("notes").with_validator(needs_ok()));
        assert_eq!(prompt.run(&mut prompter).unwrap(), "ok\nok");

        let text = out.text();
        let step = "\x1b[1A\x1b[2K";
        // Header plus three reads
        assert!(text.contains(&format!("{}✗ notes", step.repeat(4))));
        assert!(!text.contains(&step.repeat(5)));
        // Result header, "x", error line, confirm line
        assert!(text.contains(&format!("{}✔ notes", step.repeat(4))));
        assert!(text.ends_with("✔ notes: Two empty lines to finish \nok\nok\n"));
    }
}
