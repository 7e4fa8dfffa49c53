//! Blocking single-line editor
//!
//! Reads keys from a `KeySource`, applies them to a `LineState` and redraws
//! the prompt line in place after every keystroke. Non-interactive sources
//! (pipes, scripted input) get no redraws at all, so the output stream only
//! carries what sessions write explicitly.

use std::collections::VecDeque;
use std::io::{self, IsTerminal, Write};

use tracing::trace;
use unicode_width::UnicodeWidthChar;

use super::keys::{ByteKeys, Key, KeySource, TerminalKeys};
use super::{KeyHandler, LineEditor, LineState};
use crate::error::ReadError;
use crate::style::{visible_width, StyleFn};
use crate::term;

/// Line editor over a key source and an output stream
pub struct Editor<W: Write> {
    keys: Box<dyn KeySource>,
    out: W,
    prompt: String,
    interrupt_prompt: String,
    mask: Option<char>,
    mask_enabled: bool,
    painter: Option<StyleFn>,
    unique_edit_line: bool,
    vim_mode: bool,
    /// vi normal mode (only when `vim_mode`)
    normal_mode: bool,
    /// Preloaded keystrokes, replayed before live input
    queued: VecDeque<Key>,
    line: LineState,
}

impl Editor<io::Stdout> {
    /// Editor on the process's stdin/stdout; raw mode when stdin is a TTY.
    pub fn stdio() -> Self {
        let keys: Box<dyn KeySource> = if io::stdin().is_terminal() {
            Box::new(TerminalKeys::new())
        } else {
            Box::new(ByteKeys::new(io::stdin()))
        };
        Self::new(keys, io::stdout())
    }
}

impl Editor<Vec<u8>> {
    /// Editor fed from fixed input bytes, writing into memory.
    pub fn scripted(input: impl Into<Vec<u8>>) -> Self {
        let keys = ByteKeys::new(io::Cursor::new(input.into()));
        Self::new(Box::new(keys), Vec::new())
    }

    /// Like `scripted`, but drawn as if typed on a terminal.
    pub fn scripted_terminal(input: impl Into<Vec<u8>>) -> Self {
        let keys = ByteKeys::new(io::Cursor::new(input.into())).interactive();
        Self::new(Box::new(keys), Vec::new())
    }

    /// Output written so far, lossily decoded.
    pub fn output_text(&self) -> String {
        String::from_utf8_lossy(&self.out).into_owned()
    }
}

impl<W: Write> Editor<W> {
    pub fn new(keys: Box<dyn KeySource>, out: W) -> Self {
        Self {
            keys,
            out,
            prompt: String::new(),
            interrupt_prompt: "^C".to_string(),
            mask: None,
            mask_enabled: false,
            painter: None,
            unique_edit_line: false,
            vim_mode: false,
            normal_mode: false,
            queued: VecDeque::new(),
            line: LineState::default(),
        }
    }

    pub fn output(&self) -> &W {
        &self.out
    }

    pub fn into_output(self) -> W {
        self.out
    }

    fn interactive(&self) -> bool {
        self.keys.is_interactive()
    }

    fn next_key(&mut self) -> Result<Key, ReadError> {
        if let Some(key) = self.queued.pop_front() {
            return Ok(key);
        }
        match self.keys.next_key()? {
            Some(key) => Ok(key),
            None => Err(ReadError::Eof),
        }
    }

    fn read_loop(&mut self, handler: &mut dyn KeyHandler) -> Result<String, ReadError> {
        self.line = LineState::default();
        self.normal_mode = false;
        self.render()?;

        loop {
            let raw = self.next_key()?;
            let key = if self.vim_mode {
                match self.vim_key(raw) {
                    Some(key) => key,
                    None => {
                        self.render()?;
                        continue;
                    }
                }
            } else {
                raw
            };

            match key {
                Key::Interrupt => {
                    if self.interactive() {
                        let text = format!("{}\r\n", self.interrupt_prompt);
                        self.write_raw(&text)?;
                    }
                    return Err(ReadError::Interrupt);
                }
                Key::Eof if self.line.is_empty() => return Err(ReadError::Eof),
                _ => {}
            }

            if !handler.accept(key) {
                trace!(?key, "key rejected");
                continue;
            }

            Self::apply(&mut self.line, key);
            let reaction = handler.on_key(&self.line, key);
            if let Some(line) = reaction.line {
                self.line = line;
            }
            if reaction.toggle_mask {
                self.mask_enabled = !self.mask_enabled;
            }
            if let Some(prompt) = reaction.prompt {
                self.prompt = prompt;
            }

            if key == Key::Enter || reaction.submit {
                self.finish()?;
                return Ok(self.line.text());
            }
            self.render()?;
        }
    }

    /// Apply an editing key to the buffer
    fn apply(line: &mut LineState, key: Key) {
        match key {
            Key::Char(ch) => line.insert(ch),
            Key::Backspace => line.backspace(),
            Key::Delete | Key::Eof => line.delete(),
            Key::Left => line.left(),
            Key::Right => line.right(),
            Key::Home => line.home(),
            Key::End => line.end(),
            Key::Ctrl('u') => line.kill_to_start(),
            Key::Ctrl('k') => line.kill_to_end(),
            Key::Ctrl('w') => line.kill_word_back(),
            _ => {}
        }
    }

    /// Translate a key through vi modes; `None` when consumed here
    fn vim_key(&mut self, key: Key) -> Option<Key> {
        if !self.normal_mode {
            if key == Key::Esc {
                self.normal_mode = true;
                return Some(Key::Left);
            }
            return Some(key);
        }

        let Key::Char(ch) = key else {
            return match key {
                Key::Backspace => Some(Key::Left),
                Key::Esc => None,
                other => Some(other),
            };
        };
        match ch {
            'h' => Some(Key::Left),
            'l' | ' ' => Some(Key::Right),
            '0' | '^' => Some(Key::Home),
            '$' => Some(Key::End),
            'x' => Some(Key::Delete),
            'i' => {
                self.normal_mode = false;
                None
            }
            'a' => {
                self.normal_mode = false;
                Some(Key::Right)
            }
            'I' => {
                self.normal_mode = false;
                Some(Key::Home)
            }
            'A' => {
                self.normal_mode = false;
                Some(Key::End)
            }
            'w' => {
                self.line.word_forward();
                None
            }
            'b' => {
                self.line.word_back();
                None
            }
            _ => None,
        }
    }

    /// What the buffer looks like on screen
    fn display(&self) -> (String, usize) {
        let chars = self.line.chars();
        let before = &chars[..self.line.cursor()];
        match self.mask.filter(|_| self.mask_enabled) {
            Some(mask) => {
                let width = mask.width().unwrap_or(1);
                (mask.to_string().repeat(chars.len()), before.len() * width)
            }
            None => {
                let text = self.line.text();
                let width = before.iter().map(|c| c.width().unwrap_or(0)).sum();
                let shown = match &self.painter {
                    Some(paint) => paint(&text),
                    None => text,
                };
                (shown, width)
            }
        }
    }

    fn render(&mut self) -> io::Result<()> {
        if !self.interactive() {
            return Ok(());
        }
        // Only the part after the last line break shares the cursor's row
        let last_row = self
            .prompt
            .rsplit(|c| c == '\r' || c == '\n')
            .next()
            .unwrap_or_default();
        let (shown, cursor_width) = self.display();
        let column = visible_width(last_row) + cursor_width;

        let mut frame = String::from("\r");
        frame.push_str(&term::clear_line());
        frame.push_str(&self.prompt);
        frame.push_str(&shown);
        frame.push('\r');
        frame.push_str(&term::move_right(u16::try_from(column).unwrap_or(u16::MAX)));
        self.write_raw(&frame)
    }

    /// Leave the edited line after Enter
    fn finish(&mut self) -> io::Result<()> {
        if !self.interactive() {
            return Ok(());
        }
        if self.unique_edit_line {
            let text = format!("\r{}", term::clear_line());
            self.write_raw(&text)
        } else {
            self.render()?;
            self.write_raw("\r\n")
        }
    }

    fn write_raw(&mut self, text: &str) -> io::Result<()> {
        self.out.write_all(text.as_bytes())?;
        self.out.flush()
    }
}

impl<W: Write> LineEditor for Editor<W> {
    fn set_prompt(&mut self, prompt: &str) {
        self.prompt = prompt.to_string();
    }

    fn refresh(&mut self) -> io::Result<()> {
        self.render()
    }

    fn is_interactive(&self) -> bool {
        self.interactive()
    }

    fn write(&mut self, text: &str) -> io::Result<()> {
        self.write_raw(text)
    }

    fn preload(&mut self, text: &str) {
        let text = text.replace("\r\n", "\n");
        self.queued.extend(text.chars().map(|ch| match ch {
            '\n' | '\r' => Key::Enter,
            ch => Key::Char(ch),
        }));
    }

    fn set_mask(&mut self, mask: Option<char>) {
        self.mask = mask;
        self.mask_enabled = mask.is_some();
    }

    fn mask_enabled(&self) -> bool {
        self.mask.is_some() && self.mask_enabled
    }

    fn set_painter(&mut self, painter: Option<StyleFn>) {
        self.painter = painter;
    }

    fn set_unique_edit_line(&mut self, unique: bool) {
        self.unique_edit_line = unique;
    }

    fn set_vim_mode(&mut self, enabled: bool) {
        self.vim_mode = enabled;
    }

    fn set_interrupt_prompt(&mut self, text: &str) {
        self.interrupt_prompt = text.to_string();
    }

    fn read_line(&mut self, handler: &mut dyn KeyHandler) -> Result<String, ReadError> {
        self.keys.begin()?;
        let result = self.read_loop(handler);
        let ended = self.keys.end();
        let text = result?;
        ended?;
        Ok(text)
    }

    fn close(&mut self) -> io::Result<()> {
        self.queued.clear();
        self.keys.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::line::{PassThrough, Reaction};

    /// Records keys seen by the handler and rejects digits.
    #[derive(Default)]
    struct NoDigits {
        seen: Vec<(String, Key)>,
    }

    impl KeyHandler for NoDigits {
        fn accept(&mut self, key: Key) -> bool {
            !matches!(key, Key::Char(c) if c.is_ascii_digit())
        }

        fn on_key(&mut self, line: &LineState, key: Key) -> Reaction {
            self.seen.push((line.text(), key));
            Reaction::pass()
        }
    }

    /// Submits as soon as anything is typed.
    struct FirstKey;

    impl KeyHandler for FirstKey {
        fn on_key(&mut self, line: &LineState, _key: Key) -> Reaction {
            Reaction::replace(LineState::from_text(&line.text().to_uppercase())).submitted()
        }
    }

    #[test]
    fn test_reads_lines_in_order() {
        let mut editor = Editor::scripted("first\nsecond\n");
        assert_eq!(editor.read_line(&mut PassThrough).unwrap(), "first");
        assert_eq!(editor.read_line(&mut PassThrough).unwrap(), "second");
        assert!(matches!(editor.read_line(&mut PassThrough), Err(ReadError::Eof)));
        // Nothing is drawn for scripted input
        assert_eq!(editor.output_text(), "");
    }

    #[test]
    fn test_editing_keys() {
        // "helo", Left, "l", End, "!", Home, Delete
        let mut editor = Editor::scripted(b"helo\x1b[Dl\x1b[F!\x1b[H\x1b[3~\n".to_vec());
        assert_eq!(editor.read_line(&mut PassThrough).unwrap(), "ello!");

        let mut editor = Editor::scripted(b"abc def\x17\n".to_vec());
        assert_eq!(editor.read_line(&mut PassThrough).unwrap(), "abc ");
    }

    #[test]
    fn test_handler_sees_applied_buffer() {
        let mut editor = Editor::scripted("a1b\n");
        let mut handler = NoDigits::default();
        assert_eq!(editor.read_line(&mut handler).unwrap(), "ab");
        assert_eq!(
            handler.seen,
            vec![
                ("a".to_string(), Key::Char('a')),
                ("ab".to_string(), Key::Char('b')),
                ("ab".to_string(), Key::Enter),
            ]
        );
    }

    #[test]
    fn test_submit_from_handler() {
        let mut editor = Editor::scripted("yes\n");
        assert_eq!(editor.read_line(&mut FirstKey).unwrap(), "Y");
        // Remaining input is still there for the next read
        assert_eq!(editor.read_line(&mut PassThrough).unwrap(), "es");
    }

    #[test]
    fn test_interrupt_and_eof() {
        let mut editor = Editor::scripted(b"abc\x03".to_vec());
        assert!(matches!(editor.read_line(&mut PassThrough), Err(ReadError::Interrupt)));

        // Ctrl-D deletes under the cursor on a non-empty line
        let mut editor = Editor::scripted(b"ab\x1b[D\x04\n\x04".to_vec());
        assert_eq!(editor.read_line(&mut PassThrough).unwrap(), "a");
        assert!(matches!(editor.read_line(&mut PassThrough), Err(ReadError::Eof)));

        // Source ends without Enter
        let mut editor = Editor::scripted("partial");
        assert!(matches!(editor.read_line(&mut PassThrough), Err(ReadError::Eof)));
    }

    #[test]
    fn test_terminal_rendering() {
        let mut editor = Editor::scripted_terminal(b"ab\x03".to_vec());
        editor.set_prompt("> ");
        editor.set_interrupt_prompt("^C");
        assert!(matches!(editor.read_line(&mut PassThrough), Err(ReadError::Interrupt)));
        let out = editor.output_text();
        assert!(out.starts_with("\r\x1b[2K> \r\x1b[2C"));
        assert!(out.contains("\r\x1b[2K> ab\r\x1b[4C"));
        assert!(out.ends_with("^C\r\n"));

        let mut editor = Editor::scripted_terminal("x\n");
        editor.set_unique_edit_line(true);
        assert_eq!(editor.read_line(&mut PassThrough).unwrap(), "x");
        assert!(editor.output_text().ends_with("x\r\x1b[1C\r\x1b[2K"));
    }

    #[test]
    fn test_preload_replays_before_input() {
        let mut editor = Editor::scripted("!\n");
        editor.preload("hi");
        let mut handler = NoDigits::default();
        assert_eq!(editor.read_line(&mut handler).unwrap(), "hi!");
        assert_eq!(handler.seen[0], ("h".to_string(), Key::Char('h')));
    }

    #[test]
    fn test_preloaded_line_breaks_end_reads() {
        let mut editor = Editor::scripted(" three\n");
        editor.preload("one\r\ntwo\n");
        assert_eq!(editor.read_line(&mut PassThrough).unwrap(), "one");
        assert_eq!(editor.read_line(&mut PassThrough).unwrap(), "two");
        assert_eq!(editor.read_line(&mut PassThrough).unwrap(), " three");
    }

    #[test]
    fn test_close_drops_preload() {
        let mut editor = Editor::scripted("typed\n");
        editor.preload("stale");
        editor.close().unwrap();
        assert_eq!(editor.read_line(&mut PassThrough).unwrap(), "typed");
    }

    #[test]
    fn test_vim_mode() {
        // "hello", Esc (cursor on 'o'), 0, x, A, "!"
        let mut editor = Editor::scripted(b"hello\x1b0xA!\n".to_vec());
        editor.set_vim_mode(true);
        assert_eq!(editor.read_line(&mut PassThrough).unwrap(), "ello!");
    }

    #[test]
    fn test_mask_flag() {
        let mut editor = Editor::scripted("");
        assert!(!editor.mask_enabled());
        editor.set_mask(Some('*'));
        assert!(editor.mask_enabled());
        editor.set_mask(None);
        assert!(!editor.mask_enabled());
    }

    #[test]
    fn test_display_masks_and_paints() {
        let mut editor = Editor::scripted("");
        editor.line = LineState::with_cursor("日本", 1);
        assert_eq!(editor.display(), ("日本".to_string(), 2));

        editor.set_mask(Some('*'));
        assert_eq!(editor.display(), ("**".to_string(), 1));

        editor.set_mask(None);
        let faint = crate::style::Styler::new().attribute(crossterm::style::Attribute::Dim);
        editor.set_painter(Some(faint.build()));
        assert_eq!(editor.display().0, "\x1b[2m日本\x1b[0m");
    }
}
