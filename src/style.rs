//! Text styling.
//!
//! Styles are plain `Fn(&str) -> String` values so prompts can carry any
//! formatter the caller likes; `Styler` builds the common ones from crossterm
//! attribute and color commands.

use std::sync::Arc;

use crossterm::style::{Attribute, Color, ResetColor, SetAttribute, SetForegroundColor};
use unicode_width::UnicodeWidthStr;

use crate::term::ansi;

/// A text styling (or formatting) function.
pub type StyleFn = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// Attributes and a foreground color wrapped around text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Styler {
    attributes: Vec<Attribute>,
    foreground: Option<Color>,
}

impl Styler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attribute(mut self, attribute: Attribute) -> Self {
        self.attributes.push(attribute);
        self
    }

    pub fn foreground(mut self, color: Color) -> Self {
        self.foreground = Some(color);
        self
    }

    /// Styled text followed by a reset; unchanged when nothing is set.
    pub fn paint(&self, text: &str) -> String {
        if self.attributes.is_empty() && self.foreground.is_none() {
            return text.to_string();
        }
        let mut out = String::new();
        for attribute in &self.attributes {
            out.push_str(&ansi(SetAttribute(*attribute)));
        }
        if let Some(color) = self.foreground {
            out.push_str(&ansi(SetForegroundColor(color)));
        }
        out.push_str(text);
        out.push_str(&ansi(ResetColor));
        out
    }

    /// A reusable style function.
    pub fn build(self) -> StyleFn {
        Arc::new(move |s: &str| self.paint(s))
    }

    /// Returns the text unchanged.
    pub fn identity() -> StyleFn {
        Arc::new(|s: &str| s.to_string())
    }
}

/// Remove CSI escape sequences (`ESC [ ... final`) from text.
pub fn strip_ansi(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch != '\x1b' {
            out.push(ch);
            continue;
        }
        if chars.peek() == Some(&'[') {
            chars.next();
            // Parameters and intermediates run until a byte in 0x40..=0x7E
            for c in chars.by_ref() {
                if ('\x40'..='\x7e').contains(&c) {
                    break;
                }
            }
        }
    }
    out
}

/// Display width of text once escape sequences are removed.
pub fn visible_width(text: &str) -> usize {
    UnicodeWidthStr::width(strip_ansi(text).as_str())
}
