//! Icon glyphs and default stylers.
//!
//! A `Theme` is built once at process start (usually from the config file and
//! a platform check) and handed to every prompt, so sessions never read
//! global styling state.
//!
//! # Available Themes
//!
//! - `unicode` - colored `? ✔ ⚠ ✗` glyphs
//! - `ascii` - colored `? v ! x` glyphs for consoles without good Unicode fonts
//! - `plain` - Unicode glyphs, no escape sequences at all
//! - `auto` - `ascii` on Windows, `unicode` elsewhere, `plain` when `NO_COLOR` is set

use crossterm::style::{Attribute, Color};

use crate::style::{StyleFn, Styler};

/// The five indicator states a prompt can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Indicator {
    #[default]
    Initial,
    Good,
    Quest,
    Warn,
    Bad,
}

/// Rendered glyphs, one per `Indicator`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IconSet {
    pub initial: String,
    pub good: String,
    pub quest: String,
    pub warn: String,
    pub bad: String,
}

impl IconSet {
    /// All icons empty, as used when a prompt suppresses icons.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn get(&self, indicator: Indicator) -> &str {
        match indicator {
            Indicator::Initial => &self.initial,
            Indicator::Good => &self.good,
            Indicator::Quest => &self.quest,
            Indicator::Warn => &self.warn,
            Indicator::Bad => &self.bad,
        }
    }

    fn styled(glyphs: [&str; 5], colored: bool) -> Self {
        let paint = |color: Color, glyph: &str| {
            if colored {
                Styler::new().attribute(Attribute::Bold).foreground(color).paint(glyph)
            } else {
                glyph.to_string()
            }
        };
        Self {
            initial: paint(Color::DarkBlue, glyphs[0]),
            good: paint(Color::DarkGreen, glyphs[1]),
            quest: paint(Color::DarkBlue, glyphs[2]),
            warn: paint(Color::DarkYellow, glyphs[3]),
            bad: paint(Color::DarkRed, glyphs[4]),
        }
    }
}

const UNICODE_GLYPHS: [&str; 5] = ["?", "✔", "✔", "⚠", "✗"];
const ASCII_GLYPHS: [&str; 5] = ["?", "v", "v", "!", "x"];

/// Default icons and stylers injected into every prompt.
#[derive(Clone)]
pub struct Theme {
    pub name: String,
    pub icons: IconSet,
    /// Prompt text while editing
    pub bold: StyleFn,
    /// Hints and submitted answers
    pub faint: StyleFn,
    /// "Error: " prefix
    pub error: StyleFn,
}

impl std::fmt::Debug for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Theme")
            .field("name", &self.name)
            .field("icons", &self.icons)
            .finish_non_exhaustive()
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::unicode()
    }
}

impl Theme {
    pub fn unicode() -> Self {
        Self::colored("unicode", UNICODE_GLYPHS)
    }

    pub fn ascii() -> Self {
        Self::colored("ascii", ASCII_GLYPHS)
    }

    /// No escape sequences anywhere.
    pub fn plain() -> Self {
        Self {
            name: "plain".to_string(),
            icons: IconSet::styled(UNICODE_GLYPHS, false),
            bold: Styler::identity(),
            faint: Styler::identity(),
            error: Styler::identity(),
        }
    }

    fn colored(name: &str, glyphs: [&str; 5]) -> Self {
        Self {
            name: name.to_string(),
            icons: IconSet::styled(glyphs, true),
            bold: Styler::new().attribute(Attribute::Bold).build(),
            faint: Styler::new().attribute(Attribute::Dim).build(),
            error: Styler::new()
                .attribute(Attribute::Bold)
                .foreground(Color::DarkRed)
                .build(),
        }
    }

    /// Pick a theme from the platform and environment.
    pub fn detect() -> Self {
        if std::env::var_os("NO_COLOR").is_some_and(|v| !v.is_empty()) {
            return Self::plain();
        }
        if cfg!(windows) {
            Self::ascii()
        } else {
            Self::unicode()
        }
    }

    /// Get theme by name, falling back to `detect()`
    pub fn by_name(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "unicode" => Self::unicode(),
            "ascii" => Self::ascii(),
            "plain" | "none" => Self::plain(),
            _ => Self::detect(),
        }
    }

    /// List available themes
    pub fn list() -> Vec<&'static str> {
        vec!["auto", "unicode", "ascii", "plain"]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_icons_by_indicator() {
        use crate::style::strip_ansi;
        use crate::term::ansi;
        use crossterm::style::SetForegroundColor;

        let theme = Theme::unicode();
        let good = theme.icons.get(Indicator::Good);
        assert!(good.starts_with("\x1b[1m"));
        assert!(good.contains(&ansi(SetForegroundColor(Color::DarkGreen))));
        assert!(good.ends_with("✔\x1b[0m"));
        assert_eq!(strip_ansi(theme.icons.get(Indicator::Bad)), "✗");
        assert_eq!(strip_ansi(theme.icons.get(Indicator::Initial)), "?");
        assert_eq!((theme.faint)("[y/N]"), "\x1b[2m[y/N]\x1b[0m");

        let ascii = Theme::ascii();
        assert_eq!(strip_ansi(ascii.icons.get(Indicator::Warn)), "!");
        assert!(ascii.icons.warn.contains(&ansi(SetForegroundColor(Color::DarkYellow))));
    }

    #[test]
    fn test_plain_has_no_escapes() {
        let theme = Theme::plain();
        assert_eq!(theme.icons.good, "✔");
        assert_eq!((theme.faint)("[y/N]"), "[y/N]");
        assert_eq!((theme.error)("Error: "), "Error: ");
    }

    #[test]
    fn test_by_name() {
        assert_eq!(Theme::by_name("ASCII").name, "ascii");
        assert_eq!(Theme::by_name("plain").name, "plain");
        assert_eq!(Theme::by_name("unicode").name, "unicode");
        assert!(Theme::list().contains(&"auto"));
    }
}
