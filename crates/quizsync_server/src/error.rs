//! Error types for the sync server.

use quizsync_model::StoreError;
use quizsync_protocol::WireError;
use thiserror::Error;

/// Result type for server operations.
pub type ServerResult<T> = Result<T, ServerError>;

/// Errors that can occur in the sync server.
#[derive(Error, Debug)]
pub enum ServerError {
    /// The server is already listening.
    #[error("server is already running")]
    AlreadyRunning,

    /// Binding or socket I/O failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// mDNS advertising failed. Clients can still connect with a
    /// manually entered address.
    #[error("advertising failed: {0}")]
    Advertise(String),

    /// The client sent something that is not a valid sync message.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// Reading or writing the persisted state failed.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl From<WireError> for ServerError {
    fn from(err: WireError) -> Self {
        match err {
            WireError::Io(e) => ServerError::Io(e),
            other => ServerError::Protocol(other.to_string()),
        }
    }
}
