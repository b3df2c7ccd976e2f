//! Serve command implementation.

use quizsync_model::JsonFileStore;
use quizsync_server::{ServerConfig, ServerEvent, SyncServer};
use std::path::Path;
use std::sync::{mpsc, Arc};

/// Runs the serve command. Listens until the process is terminated.
pub fn run(
    store_path: &Path,
    port: u16,
    name: &str,
    advertise: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let store = Arc::new(JsonFileStore::new(store_path));
    let (events, rx) = mpsc::channel();

    let config = ServerConfig::new()
        .with_port(port)
        .with_instance_name(name)
        .with_advertise(advertise);
    let server = SyncServer::new(config, store, events);
    let addr = server.start()?;

    println!("Listening on {addr}");
    if advertise {
        println!("Advertising as \"{name}\" on the local network");
    } else {
        println!("mDNS advertising disabled; peers must use --addr {addr}");
    }
    println!("Press Ctrl-C to stop");

    // The server owns a sender clone, so this loop runs until the
    // process is terminated.
    for event in rx {
        match event {
            ServerEvent::ClientConnected(peer) => println!("Peer connected: {peer}"),
            ServerEvent::SyncCompleted { peer, summary } => {
                println!("Synced with {peer}: {summary}");
            }
            ServerEvent::ClientDisconnected(peer) => println!("Peer disconnected: {peer}"),
            ServerEvent::Error(message) => eprintln!("Error: {message}"),
            ServerEvent::Started { .. } | ServerEvent::Stopped => {}
        }
    }

    server.stop();
    Ok(())
}
