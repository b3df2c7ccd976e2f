//! mDNS advertising of the listening server.

use crate::error::{ServerError, ServerResult};
use mdns_sd::{ServiceDaemon, ServiceInfo};
use quizsync_protocol::PROTOCOL_VERSION;

/// Advertises the server over mDNS for as long as it lives.
///
/// Dropping the announcer without calling [`stop`](Announcer::stop)
/// leaves the record to expire on its own; `stop` withdraws it
/// immediately.
pub(crate) struct Announcer {
    daemon: ServiceDaemon,
    fullname: String,
}

impl Announcer {
    /// Registers `instance` under `service_type` on the given port.
    pub fn start(service_type: &str, instance: &str, port: u16) -> ServerResult<Self> {
        let daemon = ServiceDaemon::new()
            .map_err(|e| ServerError::Advertise(format!("cannot start mDNS daemon: {e}")))?;

        let host = hostname::get()
            .ok()
            .and_then(|h| h.into_string().ok())
            .unwrap_or_else(|| "quizsync-host".to_string());
        let host = format!("{host}.local.");
        let props = [("version", PROTOCOL_VERSION.to_string())];

        let info = ServiceInfo::new(service_type, instance, &host, "", port, &props[..])
            .map_err(|e| ServerError::Advertise(format!("invalid service info: {e}")))?
            .enable_addr_auto();
        let fullname = info.get_fullname().to_string();

        daemon
            .register(info)
            .map_err(|e| ServerError::Advertise(format!("cannot register service: {e}")))?;
        tracing::info!(%fullname, port, "advertising sync service");

        Ok(Self { daemon, fullname })
    }

    /// Withdraws the advertisement and shuts the daemon down.
    pub fn stop(self) {
        let _ = self.daemon.unregister(&self.fullname);
        let _ = self.daemon.shutdown();
        tracing::info!(fullname = %self.fullname, "stopped advertising");
    }
}
