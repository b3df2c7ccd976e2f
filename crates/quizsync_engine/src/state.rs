//! Client session state machine.

/// The state a client sync session is in.
///
/// `Error` and `Cancelled` are reachable from any non-terminal state;
/// reaching either releases the socket and stops discovery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No session running.
    Idle,
    /// Browsing for an advertised peer.
    Discovering,
    /// Peer resolved, opening the connection.
    Connecting,
    /// Connection established, exchange not yet started.
    Connected,
    /// Exchanging and persisting data.
    Syncing,
    /// Session finished; both sides hold the merged state.
    Completed,
    /// Session failed; persisted state is untouched.
    Error,
    /// Session cancelled by the user; persisted state is untouched.
    Cancelled,
}

impl SessionState {
    /// Returns true once the session can no longer make progress.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            SessionState::Completed | SessionState::Error | SessionState::Cancelled
        )
    }

    /// Returns true if a new session may start from this state.
    pub fn can_start(&self) -> bool {
        matches!(self, SessionState::Idle) || self.is_terminal()
    }

    /// Returns true while the session holds network resources.
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            SessionState::Discovering
                | SessionState::Connecting
                | SessionState::Connected
                | SessionState::Syncing
        )
    }
}
