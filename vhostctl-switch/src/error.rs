//! Error types for switch operations.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while driving a switch backend.
#[derive(Error, Debug)]
pub enum SwitchError {
    /// The management CLI answered with an error (its output contained `rpc error`).
    #[error("Backend reported an error for `{command}`")]
    Backend { command: String },

    /// The management CLI could not be started.
    #[error("Failed to execute `{command}`: {source}")]
    Exec {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// The backend returned nothing where a value was expected.
    #[error("Empty response from `{command}`")]
    EmptyResponse { command: String },

    /// Moving the vhost-user socket out of the OVS runtime directory failed.
    #[error("Failed to move socket {} to {}: {source}", from.display(), to.display())]
    SocketRelocation {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Socket path has no file name component.
    #[error("Invalid socket path: {0}")]
    InvalidSocketPath(String),

    /// The backend does not offer this operation.
    #[error("{operation} is not supported by the {backend} backend")]
    Unsupported {
        backend: &'static str,
        operation: &'static str,
    },
}

impl SwitchError {
    /// True when the switch itself reported the failure, as opposed to a
    /// local fault (spawn failure, filesystem error, bad input).
    pub fn is_backend_error(&self) -> bool {
        matches!(self, SwitchError::Backend { .. })
    }
}

/// Result type alias for switch operations.
pub type Result<T> = std::result::Result<T, SwitchError>;
