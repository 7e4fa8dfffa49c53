//! Configuration for keyprompt.
//!
//! The configuration file is located at `~/.keyprompt/config.toml`:
//!
//! ```toml
//! # Theme: auto, unicode, ascii, plain
//! theme = "auto"
//!
//! # Hide the state icons in front of every prompt
//! no_icons = false
//!
//! # External editor used to fix multi-line input (default: $VISUAL, $EDITOR)
//! editor = "nvim"
//!
//! vim_mode = false
//! indent = ""
//! mask = "*"
//! interrupt_prompt = "^C"
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::theme::Theme;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Failed to write config: {0}")]
    Write(#[source] io::Error),

    #[error("Could not determine config path")]
    NoHome,
}

/// Main configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Theme name
    pub theme: String,
    /// Suppress state icons
    pub no_icons: bool,
    /// External editor command
    pub editor: Option<String>,
    /// vi-style editing in the line editor
    pub vim_mode: bool,
    /// Placed before each prompt's state icon
    pub indent: String,
    /// Mask character for masked prompts
    pub mask: char,
    /// Echoed when the user presses Ctrl-C
    pub interrupt_prompt: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: "auto".to_string(),
            no_icons: false,
            editor: None,
            vim_mode: false,
            indent: String::new(),
            mask: '*',
            interrupt_prompt: "^C".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from the default file, falling back to defaults
    pub fn load() -> Self {
        let Some(path) = Self::get_config_path() else {
            return Self::default();
        };
        if !path.exists() {
            return Self::default();
        }
        match Self::load_from(&path) {
            Ok(config) => config,
            Err(e) => {
                warn!("{}; using defaults", e);
                Self::default()
            }
        }
    }

    /// Load configuration from an explicit file
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Save configuration to the default file
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::get_config_path().ok_or(ConfigError::NoHome)?;
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).map_err(ConfigError::Write)?;
        }
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content).map_err(ConfigError::Write)
    }

    /// `~/.keyprompt`
    pub fn config_dir() -> Option<PathBuf> {
        home_dir().map(|home| home.join(".keyprompt"))
    }

    fn get_config_path() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join("config.toml"))
    }

    /// Get the theme
    pub fn get_theme(&self) -> Theme {
        Theme::by_name(&self.theme)
    }
}

// Get home directory
fn home_dir() -> Option<PathBuf> {
    std::env::var_os("USERPROFILE")
        .or_else(|| std::env::var_os("HOME"))
        .map(PathBuf::from)
}
