//! mDNS discovery of the listening peer.
//!
//! The client browses for the well-known service type and takes the
//! first candidate that resolves; there is no selection UI for multiple
//! servers, so browsing stops as soon as one endpoint is in hand.

use crate::error::{SyncError, SyncResult};
use crate::events::SyncEvent;
use mdns_sd::{ServiceDaemon, ServiceEvent};
use std::net::IpAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::time::{Duration, Instant};

/// Poll interval while waiting on the browse channel, so cancellation
/// is observed promptly.
const BROWSE_POLL: Duration = Duration::from_millis(100);

/// A peer resolved to a concrete endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPeer {
    /// Advertised service instance name.
    pub name: String,
    /// Resolved address. IPv4 is preferred when both are advertised.
    pub addr: IpAddr,
    /// Resolved port.
    pub port: u16,
}

/// Browses for `service_type` and returns the first peer that resolves.
///
/// Browsing stops as soon as a candidate resolves. Failing to start the
/// browse, losing the only advertised service, and running out the
/// deadline are reported as distinct errors so the caller can retry or
/// fall back to manual address entry.
pub fn discover_first(
    service_type: &str,
    timeout: Duration,
    cancelled: &AtomicBool,
    events: &Sender<SyncEvent>,
) -> SyncResult<ResolvedPeer> {
    let daemon = ServiceDaemon::new()
        .map_err(|e| SyncError::Discovery(format!("cannot start mDNS daemon: {e}")))?;
    let receiver = daemon
        .browse(service_type)
        .map_err(|e| SyncError::Discovery(format!("cannot browse for {service_type}: {e}")))?;

    let deadline = Instant::now() + timeout;
    let result = loop {
        if cancelled.load(Ordering::SeqCst) {
            break Err(SyncError::Cancelled);
        }
        if Instant::now() >= deadline {
            break Err(SyncError::NoPeerFound);
        }

        match receiver.recv_timeout(BROWSE_POLL) {
            Ok(ServiceEvent::ServiceResolved(info)) => {
                let addrs = info.get_addresses();
                let addr = addrs
                    .iter()
                    .copied()
                    .find(|ip| ip.is_ipv4())
                    .or_else(|| addrs.iter().copied().next());
                match addr {
                    Some(addr) => {
                        let peer = ResolvedPeer {
                            name: info.get_fullname().to_string(),
                            addr,
                            port: info.get_port(),
                        };
                        tracing::info!(name = %peer.name, addr = %peer.addr, port = peer.port, "peer resolved");
                        break Ok(peer);
                    }
                    None => {
                        // Resolved without an address record; keep browsing.
                        tracing::warn!(name = info.get_fullname(), "service resolved without addresses");
                    }
                }
            }
            Ok(ServiceEvent::ServiceRemoved(_, name)) => {
                tracing::warn!(%name, "advertised service lost mid-browse");
                let _ = events.send(SyncEvent::PeerLost);
            }
            Ok(_) => {}
            // Poll timeout or a closed channel; the deadline check above
            // bounds either way.
            Err(_) => {}
        }
    };

    let _ = daemon.stop_browse(service_type);
    let _ = daemon.shutdown();
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    #[test]
    fn cancelled_before_start_returns_cancelled() {
        let cancelled = AtomicBool::new(true);
        let (tx, _rx) = mpsc::channel();
        let result = discover_first(
            "_quizsync-test._tcp.local.",
            Duration::from_millis(200),
            &cancelled,
            &tx,
        );
        assert!(matches!(result, Err(SyncError::Cancelled)));
    }

    #[test]
    fn deadline_elapses_with_no_peer() {
        let cancelled = AtomicBool::new(false);
        let (tx, _rx) = mpsc::channel();
        // Nobody advertises this type; the browse must time out.
        let result = discover_first(
            "_quizsync-nobody._tcp.local.",
            Duration::from_millis(300),
            &cancelled,
            &tx,
        );
        assert!(matches!(result, Err(SyncError::NoPeerFound)));
    }
}
