//! Sync command implementation.

use quizsync_engine::{ClientConfig, SyncEvent, SyncSession};
use quizsync_model::JsonFileStore;
use quizsync_protocol::DEFAULT_PORT;
use std::net::{IpAddr, SocketAddr};
use std::path::Path;
use std::sync::{mpsc, Arc};
use std::time::Duration;

/// Runs the sync command against a discovered or explicit peer.
pub fn run(
    store_path: &Path,
    addr: Option<&str>,
    timeout_secs: u64,
) -> Result<(), Box<dyn std::error::Error>> {
    let target = addr.map(parse_addr).transpose()?;
    let store = Arc::new(JsonFileStore::new(store_path));
    let (events, rx) = mpsc::channel();

    let printer = std::thread::spawn(move || {
        for event in rx {
            match event {
                SyncEvent::DiscoveryStarted => println!("Looking for a peer..."),
                SyncEvent::PeerFound { name, addr, port } => {
                    println!("Found {name} at {addr}:{port}");
                }
                SyncEvent::PeerLost => println!("Peer disappeared, still looking..."),
                SyncEvent::Connected => println!("Connected"),
                SyncEvent::Progress(message) => println!("{message}"),
                SyncEvent::Completed => println!("Sync complete"),
                SyncEvent::Cancelled => println!("Sync cancelled"),
                SyncEvent::Error(message) => eprintln!("Sync failed: {message}"),
            }
        }
    });

    let config = ClientConfig::new().with_discovery_timeout(Duration::from_secs(timeout_secs));
    let result = {
        let session = SyncSession::new(config, store, events);
        match target {
            Some(addr) => session.run_with_addr(addr),
            None => session.run(),
        }
    };
    // The session (and its sender) is gone, so the printer drains and
    // exits.
    let _ = printer.join();

    result?;
    Ok(())
}

/// Accepts `host:port` or a bare IP, which gets the default port.
fn parse_addr(input: &str) -> Result<SocketAddr, Box<dyn std::error::Error>> {
    if let Ok(addr) = input.parse::<SocketAddr>() {
        return Ok(addr);
    }
    if let Ok(ip) = input.parse::<IpAddr>() {
        return Ok(SocketAddr::new(ip, DEFAULT_PORT));
    }
    Err(format!("invalid address {input:?}: expected host:port or an IP").into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_address() {
        let addr = parse_addr("192.168.1.5:9000").unwrap();
        assert_eq!(addr.port(), 9000);
    }

    #[test]
    fn bare_ip_gets_default_port() {
        let addr = parse_addr("192.168.1.5").unwrap();
        assert_eq!(addr.port(), DEFAULT_PORT);
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_addr("not-an-address").is_err());
    }
}
