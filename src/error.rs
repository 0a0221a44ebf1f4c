//! Error types for keybond.
//!
//! A single `thiserror` enum covers key resolution, window lookup and
//! configuration failures.

use std::io;
use thiserror::Error;

/// Main error type for keybond operations.
#[derive(Error, Debug)]
pub enum KeyError {
    /// A character key outside `[0-9A-Za-z]`.
    #[error("invalid character: {0:?}")]
    InvalidCharacter(char),

    /// Dynamic key input that is neither a character nor an integer.
    #[error("invalid key type: {0} (only a single character or an integer is allowed)")]
    InvalidKeyType(String),

    /// A modifier name that is not one of the known spellings.
    #[error("invalid modifier '{0}'")]
    InvalidModifier(String),

    /// Strict title lookup matched no window.
    #[error("no window titled '{title}'")]
    WindowNotFound { title: String },

    /// No running process name contains the requested string.
    #[error("no running process matching '{name}'")]
    ProcessNotFound { name: String },

    /// Matching processes exist but none owns a visible top-level window.
    #[error("process '{name}' (pid {pid}) has no visible window")]
    NoProcessWindow { name: String, pid: u32 },

    /// Platform-specific operation is not supported.
    #[error("operation not supported on this platform: {0}")]
    UnsupportedPlatform(String),

    /// Configuration validation error.
    #[error("configuration error: {0}")]
    ConfigValidation(String),

    /// Error reading or parsing configuration file.
    #[error("failed to load config from '{path}': {reason}")]
    ConfigLoad { path: String, reason: String },

    /// Error writing configuration file.
    #[error("failed to save config to '{path}': {reason}")]
    ConfigSave { path: String, reason: String },

    /// Error parsing duration string.
    #[error("invalid duration '{value}': {reason}")]
    InvalidDuration { value: String, reason: String },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for keybond operations.
pub type Result<T> = std::result::Result<T, KeyError>;

impl KeyError {
    pub fn invalid_key_type(what: impl Into<String>) -> Self {
        Self::InvalidKeyType(what.into())
    }

    pub fn invalid_modifier(name: impl Into<String>) -> Self {
        Self::InvalidModifier(name.into())
    }

    pub fn window_not_found(title: impl Into<String>) -> Self {
        Self::WindowNotFound {
            title: title.into(),
        }
    }

    pub fn process_not_found(name: impl Into<String>) -> Self {
        Self::ProcessNotFound { name: name.into() }
    }

    pub fn no_process_window(name: impl Into<String>, pid: u32) -> Self {
        Self::NoProcessWindow {
            name: name.into(),
            pid,
        }
    }

    pub fn unsupported_platform(message: impl Into<String>) -> Self {
        Self::UnsupportedPlatform(message.into())
    }

    pub fn config_validation(message: impl Into<String>) -> Self {
        Self::ConfigValidation(message.into())
    }

    pub fn config_load(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ConfigLoad {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn config_save(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ConfigSave {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn invalid_duration(value: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidDuration {
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// True for the per-key resolution failures that Press/Release skip over.
    pub fn is_resolution_error(&self) -> bool {
        matches!(self, Self::InvalidCharacter(_) | Self::InvalidKeyType(_))
    }
}
