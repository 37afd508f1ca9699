//! Error types for the sound bearing engine.
//!
//! Signal processing itself never fails; a quiet scan is reported through
//! [`ScanResult`](crate::types::ScanResult). Errors cover configuration and
//! command misuse only.

use thiserror::Error;

/// Result type for configuration loading and validation.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors raised while building or loading a [`ScanConfig`](crate::config::ScanConfig).
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Parameter outside its valid range
    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    /// Malformed JSON
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    /// Config file could not be read
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised by scan commands.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanError {
    /// `stop_scan` called without an active scan
    #[error("No scan is active")]
    NotScanning,
}

impl ConfigError {
    /// Check if this error came from a bad parameter value rather than I/O or parsing
    pub fn is_invalid_parameter(&self) -> bool {
        matches!(self, ConfigError::InvalidParameter { .. })
    }
}
