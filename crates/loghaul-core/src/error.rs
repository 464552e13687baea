//! Error types for the acquisition pipeline.

use thiserror::Error;

/// Errors that can occur while acquiring, parsing or presenting logs.
#[derive(Debug, Error)]
pub enum LoghaulError {
    /// Startup configuration is missing or invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// A remote call failed: connection, authentication, session or command.
    #[error("remote command `{command}` failed: {cause}")]
    RemoteExecution {
        /// The shell command that was sent to the remote host.
        command: String,
        /// Underlying cause reported by the transport or the command.
        cause: String,
    },

    /// A single log line could not be decoded.
    #[error("parse error: {0}")]
    Parse(String),

    /// A record payload could not be rendered for the detail view.
    #[error("format error: {0}")]
    Format(String),

    /// An argument cannot be embedded in a remote shell command.
    #[error("cannot quote shell argument {0}")]
    Quote(String),
}

impl LoghaulError {
    /// Builds a [`LoghaulError::RemoteExecution`] for `command`.
    pub fn remote(command: impl Into<String>, cause: impl Into<String>) -> Self {
        Self::RemoteExecution {
            command: command.into(),
            cause: cause.into(),
        }
    }

    /// Returns true if this error is scoped to a single remote call.
    #[must_use]
    pub const fn is_remote(&self) -> bool {
        matches!(self, Self::RemoteExecution { .. })
    }
}

/// Result type alias for loghaul operations.
pub type Result<T> = std::result::Result<T, LoghaulError>;
