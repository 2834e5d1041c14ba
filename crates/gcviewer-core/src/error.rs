//! Error handling for gcviewer
//!
//! Parsing and mesh generation never fail: malformed input degrades to
//! travel moves and empty geometry. The error types here cover the
//! fallible edges of the system:
//! - Settings errors (validation, file formats)
//! - I/O errors (reading trace files, writing exports)
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Settings error type
///
/// Represents errors related to loading, saving, and validating
/// filament and view settings.
#[derive(Error, Debug)]
pub enum SettingsError {
    /// A setting value is out of its valid range
    #[error("Invalid setting '{key}': {reason}")]
    InvalidValue {
        /// The setting key.
        key: String,
        /// The reason the value is invalid.
        reason: String,
    },

    /// The settings file extension is not supported
    #[error("Unsupported settings format: {0}")]
    UnsupportedFormat(String),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML deserialization error
    #[error("TOML parse error: {0}")]
    TomlDe(#[from] toml::de::Error),

    /// TOML serialization error
    #[error("TOML write error: {0}")]
    TomlSer(#[from] toml::ser::Error),
}

impl SettingsError {
    /// Create an invalid-value error for `key`
    pub fn invalid(key: impl Into<String>, reason: impl Into<String>) -> Self {
        SettingsError::InvalidValue {
            key: key.into(),
            reason: reason.into(),
        }
    }
}

/// Main error type for gcviewer
///
/// A unified error type used by the fallible public APIs.
#[derive(Error, Debug)]
pub enum Error {
    /// Settings error
    #[error(transparent)]
    Settings(#[from] SettingsError),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Check if this is a settings error
    pub fn is_settings_error(&self) -> bool {
        matches!(self, Error::Settings(_))
    }

    /// Check if this is an I/O error
    pub fn is_io_error(&self) -> bool {
        matches!(self, Error::Io(_))
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;
