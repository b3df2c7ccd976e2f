//! Server configuration.

use quizsync_protocol::{DEFAULT_PORT, SERVICE_TYPE};
use std::net::IpAddr;
use std::time::Duration;

/// Configuration for the sync server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to. Defaults to all interfaces so peers on the
    /// local network can reach it.
    pub bind_addr: IpAddr,
    /// Port to listen on. Port 0 picks an ephemeral port; the bound
    /// port is what gets advertised.
    pub port: u16,
    /// mDNS service type to advertise under.
    pub service_type: String,
    /// mDNS instance name shown to browsing clients.
    pub instance_name: String,
    /// Whether to advertise over mDNS at all.
    pub advertise: bool,
    /// Bound on each per-connection socket read/write.
    pub io_timeout: Duration,
}

impl ServerConfig {
    /// Creates a configuration with the well-known service type and
    /// port.
    pub fn new() -> Self {
        Self {
            bind_addr: IpAddr::from([0, 0, 0, 0]),
            port: DEFAULT_PORT,
            service_type: SERVICE_TYPE.to_string(),
            instance_name: "quizsync".to_string(),
            advertise: true,
            io_timeout: Duration::from_secs(30),
        }
    }

    /// Sets the bind address.
    pub fn with_bind_addr(mut self, addr: IpAddr) -> Self {
        self.bind_addr = addr;
        self
    }

    /// Sets the listen port.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Sets the mDNS service type.
    pub fn with_service_type(mut self, service_type: impl Into<String>) -> Self {
        self.service_type = service_type.into();
        self
    }

    /// Sets the advertised instance name.
    pub fn with_instance_name(mut self, name: impl Into<String>) -> Self {
        self.instance_name = name.into();
        self
    }

    /// Enables or disables mDNS advertising.
    pub fn with_advertise(mut self, advertise: bool) -> Self {
        self.advertise = advertise;
        self
    }

    /// Sets the per-connection socket read/write timeout.
    pub fn with_io_timeout(mut self, timeout: Duration) -> Self {
        self.io_timeout = timeout;
        self
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.service_type, SERVICE_TYPE);
        assert!(config.advertise);
    }

    #[test]
    fn config_builder() {
        let config = ServerConfig::new()
            .with_bind_addr("127.0.0.1".parse().unwrap())
            .with_port(0)
            .with_instance_name("study-desktop")
            .with_advertise(false)
            .with_io_timeout(Duration::from_secs(5));

        assert_eq!(config.port, 0);
        assert_eq!(config.instance_name, "study-desktop");
        assert!(!config.advertise);
        assert_eq!(config.io_timeout, Duration::from_secs(5));
    }
}
