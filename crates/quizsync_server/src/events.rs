//! Events the server reports to its host.

use quizsync_merge::MergeSummary;
use std::net::SocketAddr;

/// Notifications from a running sync server, delivered over a
/// `std::sync::mpsc` channel. A dropped receiver is harmless.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerEvent {
    /// The listener is up and (if enabled) advertising.
    Started {
        /// The bound address, including the resolved port when the
        /// configuration asked for an ephemeral one.
        addr: SocketAddr,
    },
    /// A client opened a connection.
    ClientConnected(SocketAddr),
    /// A client's exchange finished; the merged state is persisted and
    /// was sent back.
    SyncCompleted {
        /// The client that synced.
        peer: SocketAddr,
        /// What the merge did.
        summary: MergeSummary,
    },
    /// A client connection ended, successfully or not.
    ClientDisconnected(SocketAddr),
    /// A connection failed; the persisted state is unchanged unless a
    /// `SyncCompleted` for the same peer preceded this.
    Error(String),
    /// The server stopped listening.
    Stopped,
}
