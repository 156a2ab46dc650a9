//! nestrepl configuration
//!
//! # Configuration hierarchy
//!
//! ```text
//! Priority (high → low):
//! 1. CLI arguments
//! 2. User-level (~/.config/nestrepl/config.toml)
//! 3. Default values
//! ```
//!
//! # Usage
//!
//! ```rust
//! use nestrepl::util::config::{load_user_config, UserConfig};
//!
//! let config = load_user_config().unwrap_or_default();
//! println!("{}", config.repl.prompt_name);
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// User-level configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UserConfig {
    /// REPL settings
    #[serde(default)]
    pub repl: ReplConfig,
}

/// REPL configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplConfig {
    /// Name shown in the prompt
    #[serde(default = "default_prompt_name")]
    pub prompt_name: String,
    /// History file path; the default lives next to the config file
    #[serde(default)]
    pub history_file: Option<PathBuf>,
    /// Read the history file on start
    #[serde(default = "default_true")]
    pub load_history: bool,
    /// Append new lines to the history file on exit
    #[serde(default = "default_true")]
    pub save_history: bool,
    /// Colour results, errors and line numbers
    #[serde(default = "default_true")]
    pub colors: bool,
    /// Number input buffer lines from 1 instead of 0
    #[serde(default = "default_true")]
    pub base_one: bool,
    /// Editor command for `edit`; `$VISUAL` / `$EDITOR` when unset
    #[serde(default)]
    pub editor: Option<String>,
    /// Vi key bindings in the line editor
    #[serde(default)]
    pub vi_mode: bool,
}

fn default_prompt_name() -> String {
    crate::NAME.to_string()
}

fn default_true() -> bool {
    true
}

impl Default for ReplConfig {
    fn default() -> Self {
        Self {
            prompt_name: default_prompt_name(),
            history_file: None,
            load_history: true,
            save_history: true,
            colors: true,
            base_one: true,
            editor: None,
            vi_mode: false,
        }
    }
}

impl ReplConfig {
    /// The configured history file, or the default one
    pub fn history_path(&self) -> Option<PathBuf> {
        self.history_file
            .clone()
            .or_else(|| get_config_dir().map(|dir| dir.join("history")))
    }
}

/// Get the user config directory
pub fn get_config_dir() -> Option<PathBuf> {
    // Try XDG config directory on Unix
    if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
        return Some(PathBuf::from(xdg_config).join("nestrepl"));
    }

    // Fallback to ~/.config/nestrepl
    if let Ok(home) = std::env::var("HOME") {
        return Some(PathBuf::from(home).join(".config").join("nestrepl"));
    }

    // On Windows, try %APPDATA%
    if let Ok(appdata) = std::env::var("APPDATA") {
        return Some(PathBuf::from(appdata).join("nestrepl"));
    }

    None
}

/// Get the user config file path (~/.config/nestrepl/config.toml)
pub fn get_config_path() -> Option<PathBuf> {
    get_config_dir().map(|dir| dir.join("config.toml"))
}

/// Load user-level configuration
/// Returns default config if file doesn't exist
pub fn load_user_config() -> Result<UserConfig, ConfigError> {
    match get_config_path() {
        Some(path) => load_config_from(&path),
        None => Ok(UserConfig::default()),
    }
}

/// Load configuration from `path`
/// Returns default config if file doesn't exist
pub fn load_config_from(path: &Path) -> Result<UserConfig, ConfigError> {
    if !path.exists() {
        return Ok(UserConfig::default());
    }

    let content = fs::read_to_string(path).map_err(ConfigError::IoError)?;

    toml::from_str(&content).map_err(ConfigError::ParseError)
}

/// Configuration errors
#[derive(Debug)]
pub enum ConfigError {
    IoError(std::io::Error),
    ParseError(toml::de::Error),
}

impl std::fmt::Display for ConfigError {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        match self {
            ConfigError::IoError(e) => write!(f, "IO error: {}", e),
            ConfigError::ParseError(e) => write!(f, "Config parse error: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}
