//! Error types for the client sync session.

use quizsync_model::StoreError;
use quizsync_protocol::WireError;
use thiserror::Error;

/// Result type for client sync operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Errors a sync session can end with.
///
/// Every variant is recovered at the session boundary: a failed session
/// leaves already-persisted state untouched and returns the engine to an
/// idle state ready for the next attempt.
#[derive(Error, Debug)]
pub enum SyncError {
    /// Browsing or resolving the peer's advertisement failed.
    #[error("discovery error: {0}")]
    Discovery(String),

    /// No advertised peer was found before the discovery deadline.
    #[error("no sync service found on the local network")]
    NoPeerFound,

    /// Connecting to the peer failed, or the connection dropped.
    #[error("connection error: {0}")]
    Connection(String),

    /// The peer spoke, but not the sync protocol.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// Reading or replacing local state failed.
    #[error("persistence error: {0}")]
    Persistence(#[from] StoreError),

    /// The session was cancelled by the user.
    #[error("sync cancelled")]
    Cancelled,

    /// A session is already running on this handle.
    #[error("a sync session is already in progress")]
    Busy,
}

impl From<WireError> for SyncError {
    fn from(err: WireError) -> Self {
        match err {
            WireError::Io(e) => SyncError::Connection(e.to_string()),
            WireError::UnexpectedEof => {
                SyncError::Protocol("peer closed the connection mid-exchange".into())
            }
            other => SyncError::Protocol(other.to_string()),
        }
    }
}
