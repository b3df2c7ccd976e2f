//! Configuration for the client sync session.

use quizsync_protocol::SERVICE_TYPE;
use std::time::Duration;

/// Configuration for a client sync session.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// mDNS service type to browse for.
    pub service_type: String,
    /// How long to browse before giving up with
    /// [`SyncError::NoPeerFound`](crate::SyncError::NoPeerFound).
    pub discovery_timeout: Duration,
    /// Bound on the TCP connect attempt.
    pub connect_timeout: Duration,
    /// Bound on each socket read/write; a hung peer must not block the
    /// worker thread indefinitely.
    pub io_timeout: Duration,
}

impl ClientConfig {
    /// Creates a configuration with the well-known service type and
    /// default timeouts.
    pub fn new() -> Self {
        Self {
            service_type: SERVICE_TYPE.to_string(),
            discovery_timeout: Duration::from_secs(10),
            connect_timeout: Duration::from_secs(5),
            io_timeout: Duration::from_secs(30),
        }
    }

    /// Sets the service type to browse for.
    pub fn with_service_type(mut self, service_type: impl Into<String>) -> Self {
        self.service_type = service_type.into();
        self
    }

    /// Sets the discovery deadline.
    pub fn with_discovery_timeout(mut self, timeout: Duration) -> Self {
        self.discovery_timeout = timeout;
        self
    }

    /// Sets the connect timeout.
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Sets the socket read/write timeout.
    pub fn with_io_timeout(mut self, timeout: Duration) -> Self {
        self.io_timeout = timeout;
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new()
    }
}
