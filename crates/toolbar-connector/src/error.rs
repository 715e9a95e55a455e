//! Error types for the toolbar connector
//!
//! Most failures in the toolbar protocol are not errors at all: an operation
//! the connector does not know, or one it deliberately does not support,
//! is reported as `Ok(false)` from
//! [`ToolbarConnector::send_toolbar_command`](crate::ToolbarConnector::send_toolbar_command)
//! and the toolbar leaves its UI state unchanged. The variants below cover
//! misuse of the connector itself and configuration problems.

use thiserror::Error;

/// Result type for connector operations
pub type ConnectorResult<T> = Result<T, ConnectorError>;

/// Errors that can occur in the toolbar connector
#[derive(Debug, Error)]
pub enum ConnectorError {
    /// An event was about to be emitted but no channel has been registered
    /// by `logon`, or the channel was dropped by `close`.
    #[error("No active channel: cannot deliver events for {operation} before logon")]
    NoActiveChannel { operation: String },

    /// A raw command could not be decoded into a typed command
    #[error("Malformed toolbar command: {reason}")]
    MalformedCommand { reason: String },

    /// A chat message was simulated while no chat interaction is active
    #[error("No active chat interaction")]
    NoActiveChat,

    /// Configuration error
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// I/O error while reading configuration
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding or decoding error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML decoding error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl ConnectorError {
    /// Create a missing channel error for the given operation
    pub fn no_active_channel(operation: impl Into<String>) -> Self {
        Self::NoActiveChannel {
            operation: operation.into(),
        }
    }

    /// Create a malformed command error
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedCommand {
            reason: reason.into(),
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }
}
