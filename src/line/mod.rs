//! Line editor used by every prompt.
//!
//! - **keys**: keystroke decoding from crossterm events or raw bytes
//! - **editor**: `Editor`, the blocking read-one-line implementation
//!
//! # Key handling
//!
//! ```text
//! key ──► KeyHandler::accept ──► edit applied ──► KeyHandler::on_key ──► Reaction
//!          (false = swallowed)                      (sees new buffer)     applied by editor
//! ```
//!
//! Handlers never touch the editor directly; they describe what should change
//! (new buffer, new prompt, mask toggle, early submit) and the editor applies
//! it before reading the next key.

pub mod editor;
pub mod keys;

use std::io;

pub use editor::Editor;
pub use keys::{ByteKeys, Key, KeySource, TerminalKeys};

use crate::error::ReadError;
use crate::style::StyleFn;

/// Buffer contents and cursor position of the line being edited.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineState {
    buf: Vec<char>,
    pos: usize,
}

impl LineState {
    /// Line holding `text` with the cursor at the end.
    pub fn from_text(text: &str) -> Self {
        let buf: Vec<char> = text.chars().collect();
        let pos = buf.len();
        Self { buf, pos }
    }

    pub fn with_cursor(text: &str, pos: usize) -> Self {
        let mut line = Self::from_text(text);
        line.pos = pos.min(line.buf.len());
        line
    }

    pub fn text(&self) -> String {
        self.buf.iter().collect()
    }

    pub fn chars(&self) -> &[char] {
        &self.buf
    }

    pub fn cursor(&self) -> usize {
        self.pos
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn insert(&mut self, ch: char) {
        self.buf.insert(self.pos, ch);
        self.pos += 1;
    }

    pub fn backspace(&mut self) {
        if self.pos > 0 {
            self.pos -= 1;
            self.buf.remove(self.pos);
        }
    }

    pub fn delete(&mut self) {
        if self.pos < self.buf.len() {
            self.buf.remove(self.pos);
        }
    }

    pub fn left(&mut self) {
        self.pos = self.pos.saturating_sub(1);
    }

    pub fn right(&mut self) {
        if self.pos < self.buf.len() {
            self.pos += 1;
        }
    }

    pub fn home(&mut self) {
        self.pos = 0;
    }

    pub fn end(&mut self) {
        self.pos = self.buf.len();
    }

    /// Ctrl-U
    pub fn kill_to_start(&mut self) {
        self.buf.drain(..self.pos);
        self.pos = 0;
    }

    /// Ctrl-K
    pub fn kill_to_end(&mut self) {
        self.buf.truncate(self.pos);
    }

    /// Ctrl-W: whitespace, then the word before the cursor
    pub fn kill_word_back(&mut self) {
        let end = self.pos;
        self.word_back();
        self.buf.drain(self.pos..end);
    }

    pub fn word_back(&mut self) {
        while self.pos > 0 && self.buf[self.pos - 1].is_whitespace() {
            self.pos -= 1;
        }
        while self.pos > 0 && !self.buf[self.pos - 1].is_whitespace() {
            self.pos -= 1;
        }
    }

    pub fn word_forward(&mut self) {
        let len = self.buf.len();
        while self.pos < len && !self.buf[self.pos].is_whitespace() {
            self.pos += 1;
        }
        while self.pos < len && self.buf[self.pos].is_whitespace() {
            self.pos += 1;
        }
    }

    /// The line with the character just before the cursor removed.
    pub fn without_previous_char(&self) -> Self {
        let mut line = self.clone();
        line.backspace();
        line
    }
}

/// What a key handler wants done after a keystroke was applied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reaction {
    /// Replace the buffer (and cursor)
    pub line: Option<LineState>,
    /// New prompt; the line is redrawn with it
    pub prompt: Option<String>,
    /// Flip masking on or off
    pub toggle_mask: bool,
    /// End the read now, as if Enter was pressed
    pub submit: bool,
}

impl Reaction {
    /// Leave everything as it is.
    pub fn pass() -> Self {
        Self::default()
    }

    pub fn replace(line: LineState) -> Self {
        Self {
            line: Some(line),
            ..Self::default()
        }
    }

    pub fn redraw(prompt: String) -> Self {
        Self {
            prompt: Some(prompt),
            ..Self::default()
        }
    }

    pub fn submitted(mut self) -> Self {
        self.submit = true;
        self
    }

    pub fn is_pass(&self) -> bool {
        *self == Self::default()
    }
}

/// Per-keystroke decision hook passed into `LineEditor::read_line`.
pub trait KeyHandler {
    /// Return `false` to swallow the key before it reaches the buffer.
    fn accept(&mut self, _key: Key) -> bool {
        true
    }

    /// Called after `key` has been applied; `line` is the resulting buffer.
    fn on_key(&mut self, _line: &LineState, _key: Key) -> Reaction {
        Reaction::pass()
    }
}

/// Handler that accepts everything and reacts to nothing.
#[derive(Debug, Default)]
pub struct PassThrough;

impl KeyHandler for PassThrough {}

/// The line editing primitive prompts are built on.
pub trait LineEditor {
    fn set_prompt(&mut self, prompt: &str);

    /// Redraw prompt and buffer in place.
    fn refresh(&mut self) -> io::Result<()>;

    /// Whether keystrokes come from a terminal that is redrawn.
    fn is_interactive(&self) -> bool;

    /// Write text to the output as-is.
    fn write(&mut self, text: &str) -> io::Result<()>;

    /// Queue text to be replayed as keystrokes at the start of the next read.
    fn preload(&mut self, text: &str);

    /// Mask character; `Some` also turns masking on.
    fn set_mask(&mut self, mask: Option<char>);

    fn mask_enabled(&self) -> bool;

    /// Style applied to the unmasked buffer when drawn.
    fn set_painter(&mut self, painter: Option<StyleFn>);

    /// Erase the edited line on submit instead of leaving it on screen.
    fn set_unique_edit_line(&mut self, unique: bool);

    fn set_vim_mode(&mut self, enabled: bool);

    fn set_interrupt_prompt(&mut self, text: &str);

    /// Block until a line is submitted.
    fn read_line(&mut self, handler: &mut dyn KeyHandler) -> Result<String, ReadError>;

    /// Drop queued input and release the terminal.
    fn close(&mut self) -> io::Result<()>;
}
