//! Error types for migration operations.
//!
//! All errors implement `std::error::Error` via `thiserror`. The taxonomy
//! separates session-level faults (connectivity, command rejection, timeout)
//! from local faults (ledger I/O, bad configuration) because they propagate
//! differently: session faults abort a single evaluation, local faults are
//! usually fatal to startup.

use std::io;
use thiserror::Error;

/// Result type alias for migration operations.
pub type MigrationResult<T> = Result<T, MigrationError>;

/// Faults raised by a device session exchange.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Could not establish or maintain the session.
    #[error("Connectivity error: {message}")]
    Connectivity {
        /// Error message.
        message: String,
    },

    /// The device rejected a command.
    #[error("Command rejected: '{command}': {output}")]
    CommandRejected {
        /// The command that was rejected.
        command: String,
        /// Device output accompanying the rejection.
        output: String,
    },

    /// The exchange did not complete within the bounded timeout.
    #[error("Command timed out after {timeout_secs}s: '{command}'")]
    Timeout {
        /// The command that timed out.
        command: String,
        /// The configured timeout in seconds.
        timeout_secs: u64,
    },
}

impl SessionError {
    /// Creates a connectivity error.
    pub fn connectivity(message: impl Into<String>) -> Self {
        Self::Connectivity {
            message: message.into(),
        }
    }

    /// Creates a command rejection error.
    pub fn rejected(command: impl Into<String>, output: impl Into<String>) -> Self {
        Self::CommandRejected {
            command: command.into(),
            output: output.into(),
        }
    }

    /// Returns true if this fault means the session itself is unusable
    /// (as opposed to a single command being refused).
    pub fn is_connectivity(&self) -> bool {
        matches!(self, SessionError::Connectivity { .. })
    }
}

/// Errors that can occur during migration operations.
#[derive(Debug, Error)]
pub enum MigrationError {
    /// A device session exchange failed.
    #[error(transparent)]
    Session(#[from] SessionError),

    /// Ledger storage operation failed.
    #[error("Ledger operation failed: {operation}: {source}")]
    Ledger {
        /// The operation that failed (e.g., "open", "append", "replay").
        operation: String,
        /// The underlying IO error.
        #[source]
        source: io::Error,
    },

    /// Configuration validation error.
    #[error("Invalid configuration for {field}: {message}")]
    InvalidConfig {
        /// The field that failed validation.
        field: String,
        /// Error message.
        message: String,
    },

    /// Internal error (unexpected state).
    #[error("Internal error: {message}")]
    Internal {
        /// Error message.
        message: String,
    },
}

impl MigrationError {
    /// Creates a ledger error.
    pub fn ledger(operation: impl Into<String>, source: io::Error) -> Self {
        Self::Ledger {
            operation: operation.into(),
            source,
        }
    }

    /// Creates an invalid configuration error.
    pub fn invalid_config(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}
