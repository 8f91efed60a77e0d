//! Error types for the keeper client.

use std::time::Duration;

use thiserror::Error;

/// A shared error type for every keeper-client crate.
///
/// Per-command errors are recorded by the dispatcher and do not abort a
/// batch; only [`KeeperError::ConnectionLost`] is fatal for the session.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KeeperError {
    /// A path segment is empty or contains the separator
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Node '{path}' does not exist")]
    PathNotFound { path: String },

    #[error("Node '{path}' already exists")]
    NodeExists { path: String },

    #[error("Node '{path}' has children")]
    NotEmpty { path: String },

    /// Expected version did not match the node's current version
    #[error("Version mismatch for '{path}': expected {expected}, actual {actual}")]
    BadVersion {
        path: String,
        expected: u64,
        actual: u64,
    },

    #[error("Unknown command: {name}")]
    UnknownCommand { name: String },

    /// Command recognised but its arguments are wrong
    #[error("{command}: {message}")]
    InvalidArgument { command: String, message: String },

    #[error("Backups root '{path}' does not exist")]
    BackupRootNotFound { path: String },

    #[error("Remote call '{operation}' on '{path}' timed out after {timeout_ms} ms")]
    RemoteTimeout {
        operation: &'static str,
        path: String,
        timeout_ms: u64,
    },

    #[error("Unsupported four-letter word: {word}")]
    UnsupportedWord { word: String },

    /// The session is gone; nothing else in the batch can be serviced
    #[error("Connection lost: {0}")]
    ConnectionLost(String),

    #[error("Operation cancelled")]
    Cancelled,

    #[error("IO error: {message}")]
    Io { message: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {format} - {message}")]
    Serialization { format: String, message: String },
}

impl KeeperError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    pub fn path_not_found(path: impl ToString) -> Self {
        Self::PathNotFound {
            path: path.to_string(),
        }
    }

    pub fn node_exists(path: impl ToString) -> Self {
        Self::NodeExists {
            path: path.to_string(),
        }
    }

    pub fn not_empty(path: impl ToString) -> Self {
        Self::NotEmpty {
            path: path.to_string(),
        }
    }

    pub fn unknown_command(name: impl Into<String>) -> Self {
        Self::UnknownCommand { name: name.into() }
    }

    pub fn invalid_argument(command: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            command: command.into(),
            message: message.into(),
        }
    }

    pub fn backup_root_not_found(path: impl ToString) -> Self {
        Self::BackupRootNotFound {
            path: path.to_string(),
        }
    }

    pub fn remote_timeout(operation: &'static str, path: impl ToString, timeout: Duration) -> Self {
        Self::RemoteTimeout {
            operation,
            path: path.to_string(),
            timeout_ms: timeout.as_millis() as u64,
        }
    }

    pub fn unsupported_word(word: impl Into<String>) -> Self {
        Self::UnsupportedWord { word: word.into() }
    }

    pub fn connection_lost(message: impl Into<String>) -> Self {
        Self::ConnectionLost(message.into())
    }

    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::PathNotFound { .. })
    }

    pub fn is_node_exists(&self) -> bool {
        matches!(self, Self::NodeExists { .. })
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// Fatal errors end the whole batch, not just the current command.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::ConnectionLost(_))
    }

    /// Errors after which a multi-step workflow must stop issuing calls.
    pub fn stops_workflow(&self) -> bool {
        self.is_fatal() || self.is_cancelled()
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for KeeperError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for KeeperError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for KeeperError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// A type alias for `Result<T, KeeperError>`.
pub type Result<T> = std::result::Result<T, KeeperError>;
