//! Error types for the texture importer.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for texture importer operations.
///
/// `NoSelection` and `NotFound` are the two failures a scan can report back
/// to the caller; both are recoverable by adjusting the inputs and retrying.
#[derive(Error, Debug)]
pub enum Error {
    /// The config needs per-mesh texture sets but nothing is selected
    #[error("Nothing is selected but the config expects per-mesh texture sets")]
    NoSelection,

    /// No textures, materials or readable directory to scan
    #[error("Not found: {0}")]
    NotFound(String),

    /// Config file has the wrong shape
    #[error("Invalid config {path}: {reason}")]
    InvalidConfig { path: PathBuf, reason: String },

    /// No plugin registered for the host/renderer pair
    #[error("No plugin registered for dcc '{dcc}' and renderer '{renderer}'")]
    UnknownPlugin { dcc: String, renderer: String },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a "not found" error from a string.
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create an invalid config error.
    pub fn invalid_config(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Whether the error means "nothing to import" rather than a broken input.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Result type alias for texture importer operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let e = Error::NoSelection;
        assert!(e.to_string().contains("selected"));

        let e = Error::not_found("no textures found to import with the current config");
        assert!(e.to_string().contains("no textures found"));
        assert!(e.is_not_found());

        let e = Error::UnknownPlugin {
            dcc: "maya".into(),
            renderer: "arnold".into(),
        };
        assert!(e.to_string().contains("maya"));
        assert!(e.to_string().contains("arnold"));
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "test");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
        assert!(!err.is_not_found());
    }
}
