//! Error types for the flipback library
//!
//! This module defines all error types that can occur during flipback
//! operations. Errors are designed to be informative and actionable,
//! providing clear context about what went wrong and potential remediation
//! steps.

use std::path::PathBuf;
use thiserror::Error;

/// Type alias for Results in the flipback library
pub type Result<T> = std::result::Result<T, FlipbackError>;

/// Main error type for all flipback operations
#[derive(Debug, Error)]
pub enum FlipbackError {
    /// I/O errors during file operations
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Errors during JSON serialization/deserialization
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// No backup artifact or metadata exists for the file
    #[error("No backup available for {path:?}")]
    NoBackup {
        /// Path of the main file missing a baseline
        path: PathBuf,
    },

    /// The file was changed by another actor since the engine last wrote it
    #[error("File externally modified since last update: {path:?}")]
    ExternallyModified {
        /// Path of the externally modified file
        path: PathBuf,
    },

    /// Generic error for unexpected conditions
    #[error("Internal error: {0}")]
    Internal(String),
}

impl FlipbackError {
    /// Create an internal error with a custom message
    pub fn internal(msg: impl Into<String>) -> Self {
        FlipbackError::Internal(msg.into())
    }

    /// Check if this error indicates an untracked external change
    ///
    /// External modification is a hard stop for revert but is auto-resolved
    /// for mutation by re-baselining, so callers may want to branch on it.
    pub fn is_external_modification(&self) -> bool {
        matches!(self, FlipbackError::ExternallyModified { .. })
    }

    /// Get a user-friendly error message with suggestions
    pub fn user_message(&self) -> String {
        match self {
            FlipbackError::NoBackup { path } => {
                format!(
                    "No backup available for {:?}. Run 'flipback apply' first to establish a baseline.",
                    path
                )
            }
            FlipbackError::ExternallyModified { path } => {
                format!(
                    "{:?} was modified by another program since the last update. \
                     Reverting would discard changes this tool has no record of. \
                     Run 'flipback apply' to adopt the current file as the new baseline.",
                    path
                )
            }
            _ => self.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = FlipbackError::internal("unexpected state");
        assert_eq!(err.to_string(), "Internal error: unexpected state");
    }

    #[test]
    fn test_error_external_modification() {
        let err = FlipbackError::ExternallyModified {
            path: PathBuf::from("a.json"),
        };
        assert!(err.is_external_modification());
        assert!(!FlipbackError::internal("x").is_external_modification());
    }

    #[test]
    fn test_user_message_suggests_rebaseline() {
        let err = FlipbackError::ExternallyModified {
            path: PathBuf::from("a.json"),
        };
        assert!(err.user_message().contains("new baseline"));
    }
}
