//! The sync server: accept loop and per-connection exchange.

use crate::announce::Announcer;
use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::events::ServerEvent;
use parking_lot::Mutex;
use quizsync_merge::merge_with_summary;
use quizsync_model::{now_millis, SyncStore};
use quizsync_protocol::{read_message, write_message};
use std::io::BufReader;
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

/// Poll interval for the nonblocking accept loop, so stop requests are
/// observed promptly.
const ACCEPT_POLL: Duration = Duration::from_millis(100);

/// Lifecycle state of the server role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerState {
    /// Not listening.
    Stopped,
    /// Binding and registering the advertisement.
    Starting,
    /// Accepting connections.
    Listening,
}

/// The sync server.
///
/// Listens for clients, and for each connection performs one exchange:
/// read the client's full state, merge it with the persisted state
/// under a server-wide lock, persist the result, and send it back. The
/// lock spans load, merge, and store, so two concurrent clients cannot
/// lose each other's updates.
pub struct SyncServer<S: SyncStore + 'static> {
    config: ServerConfig,
    store: Arc<S>,
    events: Sender<ServerEvent>,
    running: Arc<AtomicBool>,
    state: Mutex<ServerState>,
    listener_thread: Mutex<Option<JoinHandle<()>>>,
    announcer: Mutex<Option<Announcer>>,
    local_addr: Mutex<Option<SocketAddr>>,
}

impl<S: SyncStore + 'static> SyncServer<S> {
    /// Creates a server over the given store and event channel. Nothing
    /// listens until [`start`](SyncServer::start).
    pub fn new(config: ServerConfig, store: Arc<S>, events: Sender<ServerEvent>) -> Self {
        Self {
            config,
            store,
            events,
            running: Arc::new(AtomicBool::new(false)),
            state: Mutex::new(ServerState::Stopped),
            listener_thread: Mutex::new(None),
            announcer: Mutex::new(None),
            local_addr: Mutex::new(None),
        }
    }

    /// Binds the listener, starts advertising if configured, and spawns
    /// the accept loop. Returns the bound address.
    pub fn start(&self) -> ServerResult<SocketAddr> {
        if self.running.swap(true, Ordering::SeqCst) {
            return Err(ServerError::AlreadyRunning);
        }
        *self.state.lock() = ServerState::Starting;

        let bind = SocketAddr::new(self.config.bind_addr, self.config.port);
        let listener = match TcpListener::bind(bind) {
            Ok(l) => l,
            Err(e) => {
                self.running.store(false, Ordering::SeqCst);
                *self.state.lock() = ServerState::Stopped;
                return Err(e.into());
            }
        };
        let addr = listener.local_addr()?;
        // Nonblocking so the accept loop can notice a stop request.
        listener.set_nonblocking(true)?;

        if self.config.advertise {
            match Announcer::start(
                &self.config.service_type,
                &self.config.instance_name,
                addr.port(),
            ) {
                Ok(announcer) => *self.announcer.lock() = Some(announcer),
                Err(e) => {
                    self.running.store(false, Ordering::SeqCst);
                    *self.state.lock() = ServerState::Stopped;
                    return Err(e);
                }
            }
        }

        *self.local_addr.lock() = Some(addr);

        let running = Arc::clone(&self.running);
        let store = Arc::clone(&self.store);
        let events = self.events.clone();
        let io_timeout = self.config.io_timeout;
        let handle = std::thread::spawn(move || {
            accept_loop(listener, running, store, events, io_timeout);
        });
        *self.listener_thread.lock() = Some(handle);
        *self.state.lock() = ServerState::Listening;

        tracing::info!(%addr, advertise = self.config.advertise, "sync server started");
        let _ = self.events.send(ServerEvent::Started { addr });
        Ok(addr)
    }

    /// Stops accepting connections, waits for in-flight exchanges to
    /// finish, and withdraws the mDNS advertisement.
    pub fn stop(&self) {
        if !self.running.swap(false, Ordering::SeqCst) {
            return;
        }
        if let Some(handle) = self.listener_thread.lock().take() {
            let _ = handle.join();
        }
        if let Some(announcer) = self.announcer.lock().take() {
            announcer.stop();
        }
        *self.local_addr.lock() = None;
        *self.state.lock() = ServerState::Stopped;
        tracing::info!("sync server stopped");
        let _ = self.events.send(ServerEvent::Stopped);
    }

    /// Returns true while the accept loop is running.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Returns the lifecycle state of the server role.
    pub fn state(&self) -> ServerState {
        *self.state.lock()
    }

    /// Returns the bound address while the server is running.
    pub fn local_addr(&self) -> Option<SocketAddr> {
        *self.local_addr.lock()
    }
}

impl<S: SyncStore + 'static> Drop for SyncServer<S> {
    fn drop(&mut self) {
        self.stop();
    }
}

fn accept_loop<S: SyncStore + 'static>(
    listener: TcpListener,
    running: Arc<AtomicBool>,
    store: Arc<S>,
    events: Sender<ServerEvent>,
    io_timeout: Duration,
) {
    // One state mutation at a time across all connections.
    let merge_lock = Arc::new(Mutex::new(()));
    let mut workers: Vec<JoinHandle<()>> = Vec::new();

    while running.load(Ordering::SeqCst) {
        match listener.accept() {
            Ok((stream, peer)) => {
                let store = Arc::clone(&store);
                let events = events.clone();
                let merge_lock = Arc::clone(&merge_lock);
                workers.push(std::thread::spawn(move || {
                    let _ = events.send(ServerEvent::ClientConnected(peer));
                    tracing::info!(%peer, "client connected");
                    if let Err(e) =
                        handle_connection(&*store, &merge_lock, &events, stream, peer, io_timeout)
                    {
                        tracing::warn!(%peer, error = %e, "connection failed");
                        let _ = events.send(ServerEvent::Error(e.to_string()));
                    }
                    let _ = events.send(ServerEvent::ClientDisconnected(peer));
                }));
                workers.retain(|w| !w.is_finished());
            }
            Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => {
                std::thread::sleep(ACCEPT_POLL);
            }
            Err(e) => {
                tracing::warn!(error = %e, "accept failed");
                let _ = events.send(ServerEvent::Error(e.to_string()));
                std::thread::sleep(ACCEPT_POLL);
            }
        }
    }

    for worker in workers {
        let _ = worker.join();
    }
}

/// One exchange with one client: read, merge under the lock, persist,
/// respond. The response is written only after the merged state is
/// safely persisted, so a client that receives the line can adopt it.
fn handle_connection<S: SyncStore>(
    store: &S,
    merge_lock: &Mutex<()>,
    events: &Sender<ServerEvent>,
    mut stream: TcpStream,
    peer: SocketAddr,
    io_timeout: Duration,
) -> ServerResult<()> {
    stream.set_nonblocking(false)?;
    stream.set_read_timeout(Some(io_timeout))?;
    stream.set_write_timeout(Some(io_timeout))?;

    let mut reader = BufReader::new(stream.try_clone()?);
    let remote = read_message(&mut reader)?;
    tracing::debug!(
        %peer,
        subjects = remote.subjects.len(),
        history = remote.exam_history.len(),
        "received client state"
    );

    let (merged, summary) = {
        let _guard = merge_lock.lock();
        let local = store.load_state()?;
        let (merged, summary) = merge_with_summary(&local, &remote, now_millis());
        store.replace_state(merged.clone())?;
        (merged, summary)
    };

    write_message(&mut stream, &merged)?;
    tracing::info!(%peer, %summary, "sync completed");
    let _ = events.send(ServerEvent::SyncCompleted { peer, summary });
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use quizsync_model::{MemoryStore, Subject, SyncData};
    use std::sync::mpsc;

    fn start_test_server(
        seed: SyncData,
    ) -> (
        SyncServer<MemoryStore>,
        Arc<MemoryStore>,
        SocketAddr,
        mpsc::Receiver<ServerEvent>,
    ) {
        let store = Arc::new(MemoryStore::with_data(seed));
        let (tx, rx) = mpsc::channel();
        let config = ServerConfig::new()
            .with_bind_addr("127.0.0.1".parse().unwrap())
            .with_port(0)
            .with_advertise(false);
        let server = SyncServer::new(config, Arc::clone(&store), tx);
        let addr = server.start().unwrap();
        (server, store, addr, rx)
    }

    fn exchange(addr: SocketAddr, data: &SyncData) -> SyncData {
        let mut stream = TcpStream::connect(addr).unwrap();
        write_message(&mut stream, data).unwrap();
        let mut reader = BufReader::new(stream);
        read_message(&mut reader).unwrap()
    }

    #[test]
    fn one_client_exchange_merges_and_persists() {
        let seed = SyncData::new(vec![Subject::new("s1", "Math")], vec![]);
        let (server, store, addr, rx) = start_test_server(seed);

        let client = SyncData::new(vec![Subject::new("s2", "History")], vec![]);
        let merged = exchange(addr, &client);

        assert_eq!(merged.subjects.len(), 2);
        assert_eq!(store.load_state().unwrap(), merged);

        server.stop();
        let events: Vec<ServerEvent> = rx.try_iter().collect();
        assert!(matches!(events.first(), Some(ServerEvent::Started { .. })));
        assert!(events
            .iter()
            .any(|e| matches!(e, ServerEvent::SyncCompleted { .. })));
        assert_eq!(events.last(), Some(&ServerEvent::Stopped));
    }

    #[test]
    fn sequential_clients_accumulate_state() {
        let (server, store, addr, _rx) = start_test_server(SyncData::default());

        exchange(addr, &SyncData::new(vec![Subject::new("a", "A")], vec![]));
        let merged = exchange(addr, &SyncData::new(vec![Subject::new("b", "B")], vec![]));

        assert_eq!(merged.subjects.len(), 2);
        assert_eq!(store.load_state().unwrap().subjects.len(), 2);
        server.stop();
    }

    #[test]
    fn malformed_client_line_leaves_store_untouched() {
        let seed = SyncData::new(vec![Subject::new("keep", "Keep")], vec![]);
        let (server, store, addr, rx) = start_test_server(seed.clone());

        let mut stream = TcpStream::connect(addr).unwrap();
        std::io::Write::write_all(&mut stream, b"not json at all\n").unwrap();
        // Server closes the connection without a response.
        let mut reader = BufReader::new(stream);
        assert!(read_message(&mut reader).is_err());

        assert_eq!(store.load_state().unwrap(), seed);
        server.stop();
        assert!(rx.try_iter().any(|e| matches!(e, ServerEvent::Error(_))));
    }

    #[test]
    fn start_twice_is_rejected() {
        let (server, _store, _addr, _rx) = start_test_server(SyncData::default());
        assert_eq!(server.state(), ServerState::Listening);
        assert!(matches!(server.start(), Err(ServerError::AlreadyRunning)));
        server.stop();
        assert_eq!(server.state(), ServerState::Stopped);
    }

    #[test]
    fn stop_then_restart() {
        let (server, _store, addr, _rx) = start_test_server(SyncData::default());
        server.stop();
        assert!(!server.is_running());
        assert!(server.local_addr().is_none());

        let new_addr = server.start().unwrap();
        // Ephemeral port, so the address may differ; the server must
        // accept again either way.
        let merged = exchange(new_addr, &SyncData::default());
        assert!(merged.is_empty());
        let _ = addr;
        server.stop();
    }
}
