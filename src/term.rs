//! Terminal control sequences for redrawing and erasing rendered lines.
//!
//! Sessions write these straight into the output stream, so they are built
//! as strings from crossterm commands rather than executed.

use crossterm::cursor::{MoveRight, MoveUp};
use crossterm::terminal::{Clear, ClearType};
use crossterm::Command;

/// The escape sequence of a crossterm command.
pub(crate) fn ansi(command: impl Command) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail
    let _ = command.write_ansi(&mut out);
    out
}

/// Move the cursor up `n` lines (nothing for 0).
pub fn up_line(n: u16) -> String {
    if n == 0 {
        return String::new();
    }
    ansi(MoveUp(n))
}

/// Move the cursor right `n` columns (nothing for 0).
pub fn move_right(n: u16) -> String {
    if n == 0 {
        return String::new();
    }
    ansi(MoveRight(n))
}

/// Erase the line under the cursor.
pub fn clear_line() -> String {
    ansi(Clear(ClearType::CurrentLine))
}

/// Erase the `n` lines above the cursor, leaving the cursor on the topmost.
pub fn clear_up_lines(n: usize) -> String {
    let step = format!("{}{}", up_line(1), clear_line());
    step.repeat(n)
}
