//! External editor round trip.
//!
//! Used by multi-line prompts to let the user fix rejected input in a real
//! editor: the text goes into a temp file, the editor runs on the inherited
//! terminal, and the saved file is read back.

use std::fs;
use std::io::Write;
use std::process::Command;

use tracing::debug;

use crate::error::EditorError;

/// UTF-8 byte order mark. Notepad guesses the encoding of an empty file from
/// the locale; a BOM makes it pick UTF-8.
const BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Something that can edit a piece of text out of band.
pub trait ExternalEditor {
    fn edit(&mut self, seed: &str) -> Result<String, EditorError>;
}

/// Runs an editor program on a temp file.
#[derive(Debug, Clone, Default)]
pub struct SystemEditor {
    /// Command to run; `None` means `default_editor()`
    pub command: Option<String>,
}

impl SystemEditor {
    pub fn new(command: Option<String>) -> Self {
        Self { command }
    }

    fn command(&self) -> String {
        match &self.command {
            Some(cmd) if !cmd.trim().is_empty() => cmd.clone(),
            _ => default_editor(),
        }
    }
}

impl ExternalEditor for SystemEditor {
    fn edit(&mut self, seed: &str) -> Result<String, EditorError> {
        edit(&self.command(), seed)
    }
}

/// Edit `seed` with `editor` and return the saved text.
pub fn edit(editor: &str, seed: &str) -> Result<String, EditorError> {
    let mut file = tempfile::Builder::new()
        .prefix("keyprompt.")
        .suffix(".txt")
        .tempfile()
        .map_err(EditorError::Open)?;

    if cfg!(windows) {
        file.write_all(BOM).map_err(EditorError::Write)?;
    }
    file.write_all(seed.as_bytes()).map_err(EditorError::Write)?;
    file.flush().map_err(EditorError::Write)?;

    // Close the handle so the editor can replace the file; the path is
    // removed when `path` drops
    let path = file.into_temp_path();

    // Allow "code --wait" style commands
    let mut parts = editor.split_whitespace();
    let program = parts.next().unwrap_or(editor);
    debug!(program, path = %path.display(), "starting external editor");

    let status = Command::new(program)
        .args(parts)
        .arg(&path)
        .status()
        .map_err(|source| EditorError::Spawn {
            command: editor.to_string(),
            source,
        })?;
    if !status.success() {
        return Err(EditorError::Status {
            command: editor.to_string(),
            code: status.code(),
        });
    }

    let raw = fs::read(&path).map_err(EditorError::Read)?;
    path.close().map_err(EditorError::Close)?;

    let bytes = if cfg!(windows) {
        raw.strip_prefix(BOM).unwrap_or(&raw)
    } else {
        &raw[..]
    };
    Ok(String::from_utf8_lossy(bytes).into_owned())
}

/// Editor from `VISUAL` or `EDITOR`, else the platform default.
pub fn default_editor() -> String {
    for var in ["VISUAL", "EDITOR"] {
        if let Ok(value) = std::env::var(var) {
            if !value.trim().is_empty() {
                return value;
            }
        }
    }
    if cfg!(windows) {
        "notepad".to_string()
    } else {
        "vim".to_string()
    }
}
