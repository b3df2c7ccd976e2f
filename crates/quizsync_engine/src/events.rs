//! Events the client session reports to its host.
//!
//! Delivered over a plain `std::sync::mpsc` channel so the host (a UI
//! thread, a CLI loop, a test) consumes them in order without nested
//! callback interfaces. A dropped receiver is harmless; the session
//! keeps going and discards further events.

use std::net::IpAddr;

/// Progress and outcome notifications from a client sync session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncEvent {
    /// Browsing for a peer has started.
    DiscoveryStarted,
    /// A peer was found and resolved.
    PeerFound {
        /// Advertised service name.
        name: String,
        /// Resolved address.
        addr: IpAddr,
        /// Resolved port.
        port: u16,
    },
    /// The advertised peer disappeared mid-browse.
    PeerLost,
    /// TCP connection to the peer is up.
    Connected,
    /// Human-readable progress message.
    Progress(String),
    /// Session finished; local state now holds the merged result.
    Completed,
    /// Session cancelled; local state untouched.
    Cancelled,
    /// Session failed; local state untouched.
    Error(String),
}
