//! Error types for ChatShell
//!
//! This module defines the error taxonomy used across the client, using
//! `thiserror` for ergonomic error handling. Remote failures are split into
//! transport-level failures (`Network`) and backend rejections (`Api`).

use thiserror::Error;

/// Main error type for ChatShell operations
#[derive(Error, Debug)]
pub enum ChatShellError {
    /// Transport-level failure (unreachable host, timeout, unreadable body)
    #[error("Network error: {0}")]
    Network(String),

    /// The backend answered with a non-success status
    #[error("API error {status}: {message}")]
    Api {
        /// HTTP status code returned by the backend
        status: u16,
        /// Error message extracted from the response body
        message: String,
    },

    /// The backend answered a delete request with `false`
    #[error("Delete was not applied by the server: {0}")]
    DeleteRejected(String),

    /// An intent needed a selected chat but none is selected
    #[error("No chat is selected")]
    NoChatSelected,

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl ChatShellError {
    /// Whether re-issuing the same user intent may succeed
    ///
    /// # Examples
    ///
    /// ```
    /// use chatshell::error::ChatShellError;
    ///
    /// assert!(ChatShellError::Network("timeout".to_string()).is_retryable());
    /// assert!(!ChatShellError::Api { status: 404, message: "gone".to_string() }.is_retryable());
    /// ```
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network(_) | Self::DeleteRejected(_) => true,
            Self::Api { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }
}

/// Result type alias for ChatShell operations
///
/// Uses `anyhow::Error` so context can be attached while propagating;
/// callers that need the taxonomy downcast to [`ChatShellError`].
pub type Result<T> = anyhow::Result<T>;
