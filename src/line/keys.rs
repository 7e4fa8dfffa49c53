//! Key decoding for the line editor
//!
//! Converts crossterm key events and raw terminal bytes into editor keys.

use std::collections::VecDeque;
use std::io::{self, Read};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// A keystroke as seen by the line editor and its key handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Enter,
    Backspace,
    Delete,
    Left,
    Right,
    Up,
    Down,
    Home,
    End,
    Tab,
    Esc,
    /// Ctrl-C
    Interrupt,
    /// Ctrl-D
    Eof,
    /// Ctrl-Z
    Suspend,
    /// Any other Ctrl+letter
    Ctrl(char),
}

impl Key {
    /// Keys that only move the cursor or browse
    pub fn is_navigation(self) -> bool {
        matches!(
            self,
            Key::Left | Key::Right | Key::Up | Key::Down | Key::Home | Key::End
        )
    }

    /// Keys a restricted-alphabet prompt must never swallow
    pub fn is_control(self) -> bool {
        self.is_navigation()
            || matches!(
                self,
                Key::Enter | Key::Backspace | Key::Interrupt | Key::Suspend
            )
    }

    /// Map a crossterm KeyEvent; `None` for keys the editor ignores
    pub fn from_event(event: &KeyEvent) -> Option<Key> {
        let ctrl = event.modifiers.contains(KeyModifiers::CONTROL);

        match event.code {
            KeyCode::Char(ch) if ctrl => Some(Self::from_ctrl(ch.to_ascii_lowercase())),
            KeyCode::Char(ch) => Some(Key::Char(ch)),
            KeyCode::Enter => Some(Key::Enter),
            KeyCode::Backspace => Some(Key::Backspace),
            KeyCode::Delete => Some(Key::Delete),
            KeyCode::Left => Some(Key::Left),
            KeyCode::Right => Some(Key::Right),
            KeyCode::Up => Some(Key::Up),
            KeyCode::Down => Some(Key::Down),
            KeyCode::Home => Some(Key::Home),
            KeyCode::End => Some(Key::End),
            KeyCode::Tab => Some(Key::Tab),
            KeyCode::Esc => Some(Key::Esc),
            _ => None,
        }
    }

    /// Ctrl+letter with emacs-style aliases
    fn from_ctrl(ch: char) -> Key {
        match ch {
            'c' => Key::Interrupt,
            'd' => Key::Eof,
            'z' => Key::Suspend,
            'a' => Key::Home,
            'e' => Key::End,
            'b' => Key::Left,
            'f' => Key::Right,
            'p' => Key::Up,
            'n' => Key::Down,
            'h' => Key::Backspace,
            'j' | 'm' => Key::Enter,
            'i' => Key::Tab,
            other => Key::Ctrl(other),
        }
    }

    /// Map a single C0 control byte
    fn from_control_byte(byte: u8) -> Key {
        match byte {
            b'\r' | b'\n' => Key::Enter,
            0x7F | 0x08 => Key::Backspace,
            0x09 => Key::Tab,
            0x1B => Key::Esc,
            // Ctrl + letter = letter - 'a' + 1
            0x01..=0x1A => Self::from_ctrl((b'a' + byte - 1) as char),
            _ => Key::Ctrl(byte as char),
        }
    }
}

/// Where the editor pulls keystrokes from.
pub trait KeySource {
    /// Next key, or `None` once the input is exhausted.
    fn next_key(&mut self) -> io::Result<Option<Key>>;

    /// Whether the source is a live terminal that wants redraws.
    fn is_interactive(&self) -> bool;

    /// Called around each read so a TTY can switch raw mode on and off.
    fn begin(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn end(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Keys from the terminal in raw mode.
#[derive(Debug, Default)]
pub struct TerminalKeys {
    raw: bool,
}

impl TerminalKeys {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeySource for TerminalKeys {
    fn next_key(&mut self) -> io::Result<Option<Key>> {
        loop {
            match event::read()? {
                Event::Key(key) if key.kind != KeyEventKind::Release => {
                    if let Some(mapped) = Key::from_event(&key) {
                        return Ok(Some(mapped));
                    }
                }
                // Resize, mouse and focus events are not keystrokes
                _ => {}
            }
        }
    }

    fn is_interactive(&self) -> bool {
        true
    }

    fn begin(&mut self) -> io::Result<()> {
        if !self.raw {
            crossterm::terminal::enable_raw_mode()?;
            self.raw = true;
        }
        Ok(())
    }

    fn end(&mut self) -> io::Result<()> {
        if self.raw {
            crossterm::terminal::disable_raw_mode()?;
            self.raw = false;
        }
        Ok(())
    }
}

impl Drop for TerminalKeys {
    fn drop(&mut self) {
        let _ = self.end();
    }
}

/// Keys decoded from a byte stream (pipes, scripted input, tests).
pub struct ByteKeys<R: Read> {
    reader: R,
    pending: VecDeque<u8>,
    interactive: bool,
}

impl<R: Read> ByteKeys<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            pending: VecDeque::new(),
            interactive: false,
        }
    }

    /// Treat the stream like a terminal so the editor draws as it reads.
    pub fn interactive(mut self) -> Self {
        self.interactive = true;
        self
    }

    fn next_byte(&mut self) -> io::Result<Option<u8>> {
        if let Some(byte) = self.pending.pop_front() {
            return Ok(Some(byte));
        }
        let mut buf = [0u8; 1];
        loop {
            match self.reader.read(&mut buf) {
                Ok(0) => return Ok(None),
                Ok(_) => return Ok(Some(buf[0])),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
    }

    fn unread(&mut self, byte: u8) {
        self.pending.push_front(byte);
    }

    /// After ESC: `[A`..`[D`, `[H`, `[F`, `[3~` and `OA`..`OD`
    fn escape_sequence(&mut self) -> io::Result<Key> {
        let Some(intro) = self.next_byte()? else {
            return Ok(Key::Esc);
        };
        if intro != b'[' && intro != b'O' {
            self.unread(intro);
            return Ok(Key::Esc);
        }
        let Some(code) = self.next_byte()? else {
            self.unread(intro);
            return Ok(Key::Esc);
        };
        let key = match code {
            b'A' => Key::Up,
            b'B' => Key::Down,
            b'C' => Key::Right,
            b'D' => Key::Left,
            b'H' => Key::Home,
            b'F' => Key::End,
            b'1'..=b'8' => {
                // ESC [ n ~
                let tail = self.next_byte()?;
                match (code, tail) {
                    (b'3', Some(b'~')) => Key::Delete,
                    (b'1' | b'7', Some(b'~')) => Key::Home,
                    (b'4' | b'8', Some(b'~')) => Key::End,
                    (_, Some(b'~')) => return self.next_key_or_esc(),
                    (_, Some(other)) => {
                        self.unread(other);
                        return self.next_key_or_esc();
                    }
                    (_, None) => Key::Esc,
                }
            }
            _ => return self.next_key_or_esc(),
        };
        Ok(key)
    }

    fn next_key_or_esc(&mut self) -> io::Result<Key> {
        Ok(self.next_key()?.unwrap_or(Key::Esc))
    }

    /// Decode the rest of a UTF-8 sequence whose first byte is `lead`
    fn utf8_char(&mut self, lead: u8) -> io::Result<Option<char>> {
        let len = match lead {
            0xC0..=0xDF => 2,
            0xE0..=0xEF => 3,
            0xF0..=0xF7 => 4,
            _ => return Ok(None),
        };
        let mut bytes = vec![lead];
        for _ in 1..len {
            match self.next_byte()? {
                Some(b) if b & 0xC0 == 0x80 => bytes.push(b),
                Some(b) => {
                    self.unread(b);
                    return Ok(None);
                }
                None => return Ok(None),
            }
        }
        Ok(std::str::from_utf8(&bytes).ok().and_then(|s| s.chars().next()))
    }
}

impl<R: Read> KeySource for ByteKeys<R> {
    fn next_key(&mut self) -> io::Result<Option<Key>> {
        loop {
            let Some(byte) = self.next_byte()? else {
                return Ok(None);
            };
            let key = match byte {
                b'\r' => {
                    // CRLF is one Enter
                    match self.next_byte()? {
                        Some(b'\n') | None => {}
                        Some(other) => self.unread(other),
                    }
                    Key::Enter
                }
                0x1B => self.escape_sequence()?,
                0x00..=0x1F | 0x7F => Key::from_control_byte(byte),
                0x20..=0x7E => Key::Char(byte as char),
                _ => match self.utf8_char(byte)? {
                    Some(ch) => Key::Char(ch),
                    // Invalid UTF-8 is dropped
                    None => continue,
                },
            };
            return Ok(Some(key));
        }
    }

    fn is_interactive(&self) -> bool {
        self.interactive
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(bytes: &[u8]) -> Vec<Key> {
        let mut keys = ByteKeys::new(bytes);
        let mut out = Vec::new();
        while let Some(key) = keys.next_key().unwrap() {
            out.push(key);
        }
        out
    }

    fn key_event(code: KeyCode, mods: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, mods)
    }

    #[test]
    fn test_char_keys() {
        assert_eq!(decode(b"hi\n"), vec![Key::Char('h'), Key::Char('i'), Key::Enter]);
        assert_eq!(decode(b"a\r\nb"), vec![Key::Char('a'), Key::Enter, Key::Char('b')]);
        assert_eq!(decode("é✔".as_bytes()), vec![Key::Char('é'), Key::Char('✔')]);

        // Ctrl+C, Ctrl+D, Ctrl+U, DEL
        assert_eq!(
            decode(&[0x03, 0x04, 0x15, 0x7F]),
            vec![Key::Interrupt, Key::Eof, Key::Ctrl('u'), Key::Backspace]
        );
    }

    #[test]
    fn test_arrow_keys() {
        assert_eq!(
            decode(b"\x1b[A\x1b[B\x1b[C\x1b[D"),
            vec![Key::Up, Key::Down, Key::Right, Key::Left]
        );
        // Application mode
        assert_eq!(decode(b"\x1bOD"), vec![Key::Left]);
        assert_eq!(decode(b"\x1b[3~\x1b[H\x1b[F"), vec![Key::Delete, Key::Home, Key::End]);
        // Lone ESC followed by text
        assert_eq!(decode(b"\x1bx"), vec![Key::Esc, Key::Char('x')]);
    }

    #[test]
    fn test_crossterm_events() {
        let event = key_event(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(Key::from_event(&event), Some(Key::Interrupt));

        let event = key_event(KeyCode::Char('Y'), KeyModifiers::SHIFT);
        assert_eq!(Key::from_event(&event), Some(Key::Char('Y')));

        let event = key_event(KeyCode::Char('w'), KeyModifiers::CONTROL);
        assert_eq!(Key::from_event(&event), Some(Key::Ctrl('w')));

        let event = key_event(KeyCode::F(5), KeyModifiers::NONE);
        assert_eq!(Key::from_event(&event), None);
    }

    #[test]
    fn test_key_classes() {
        assert!(Key::Left.is_navigation());
        assert!(Key::Backspace.is_control());
        assert!(!Key::Char('y').is_control());
        assert!(!Key::Delete.is_navigation());
    }
}
