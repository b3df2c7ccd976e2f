//! The client sync session: discover, exchange, persist.

use crate::config::ClientConfig;
use crate::discovery::discover_first;
use crate::error::{SyncError, SyncResult};
use crate::events::SyncEvent;
use crate::state::SessionState;
use parking_lot::{Mutex, RwLock};
use quizsync_model::SyncStore;
use quizsync_protocol::{read_message, write_message};
use std::io::BufReader;
use std::net::{Shutdown, SocketAddr, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::sync::Arc;

/// Cancels a running session from another thread.
///
/// Cancelling sets a flag and shuts down the live socket so a blocked
/// read returns immediately. A cancelled session never persists a
/// partial result.
#[derive(Clone)]
pub struct CancelHandle {
    cancelled: Arc<AtomicBool>,
    socket: Arc<Mutex<Option<TcpStream>>>,
}

impl CancelHandle {
    /// Requests cancellation of the session this handle belongs to.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
        if let Some(stream) = self.socket.lock().as_ref() {
            let _ = stream.shutdown(Shutdown::Both);
        }
    }

    /// Returns true once cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// A client sync session against a discovered or explicitly-addressed
/// server.
///
/// The blocking [`run`](SyncSession::run) sequence belongs on a worker
/// thread; terminal outcomes and progress arrive on the event channel,
/// so a UI thread only ever consumes events.
pub struct SyncSession<S: SyncStore> {
    config: ClientConfig,
    store: Arc<S>,
    events: Sender<SyncEvent>,
    state: RwLock<SessionState>,
    cancelled: Arc<AtomicBool>,
    socket: Arc<Mutex<Option<TcpStream>>>,
}

impl<S: SyncStore> SyncSession<S> {
    /// Creates a session over the given store and event channel.
    pub fn new(config: ClientConfig, store: Arc<S>, events: Sender<SyncEvent>) -> Self {
        Self {
            config,
            store,
            events,
            state: RwLock::new(SessionState::Idle),
            cancelled: Arc::new(AtomicBool::new(false)),
            socket: Arc::new(Mutex::new(None)),
        }
    }

    /// Returns the current session state.
    pub fn state(&self) -> SessionState {
        *self.state.read()
    }

    /// Returns a handle that can cancel this session from another
    /// thread.
    pub fn cancel_handle(&self) -> CancelHandle {
        CancelHandle {
            cancelled: Arc::clone(&self.cancelled),
            socket: Arc::clone(&self.socket),
        }
    }

    /// Runs a full session: discover the peer, then exchange and
    /// persist. Blocks until the session reaches a terminal state.
    pub fn run(&self) -> SyncResult<()> {
        self.begin()?;
        let outcome = self.discover_and_exchange();
        self.finish(outcome)
    }

    /// Runs a session against an explicit address, skipping discovery.
    ///
    /// This is the manual-entry fallback for when discovery fails or is
    /// unavailable on the network.
    pub fn run_with_addr(&self, addr: SocketAddr) -> SyncResult<()> {
        self.begin()?;
        let outcome = self.exchange(addr);
        self.finish(outcome)
    }

    fn begin(&self) -> SyncResult<()> {
        let mut state = self.state.write();
        if !state.can_start() {
            return Err(SyncError::Busy);
        }
        *state = SessionState::Idle;
        self.cancelled.store(false, Ordering::SeqCst);
        Ok(())
    }

    fn finish(&self, outcome: SyncResult<()>) -> SyncResult<()> {
        *self.socket.lock() = None;
        match outcome {
            Ok(()) => {
                self.set_state(SessionState::Completed);
                let _ = self.events.send(SyncEvent::Completed);
                Ok(())
            }
            Err(_) if self.cancelled.load(Ordering::SeqCst) => {
                // A cancel shuts the socket down, so the underlying
                // failure is usually an I/O error; report the cause.
                self.set_state(SessionState::Cancelled);
                let _ = self.events.send(SyncEvent::Cancelled);
                tracing::info!("sync session cancelled");
                Err(SyncError::Cancelled)
            }
            Err(e) => {
                self.set_state(SessionState::Error);
                let _ = self.events.send(SyncEvent::Error(e.to_string()));
                tracing::warn!(error = %e, "sync session failed");
                Err(e)
            }
        }
    }

    fn discover_and_exchange(&self) -> SyncResult<()> {
        self.set_state(SessionState::Discovering);
        let _ = self.events.send(SyncEvent::DiscoveryStarted);

        let peer = discover_first(
            &self.config.service_type,
            self.config.discovery_timeout,
            &self.cancelled,
            &self.events,
        )?;
        let _ = self.events.send(SyncEvent::PeerFound {
            name: peer.name.clone(),
            addr: peer.addr,
            port: peer.port,
        });

        self.exchange(SocketAddr::new(peer.addr, peer.port))
    }

    fn exchange(&self, addr: SocketAddr) -> SyncResult<()> {
        self.set_state(SessionState::Connecting);
        let mut stream = TcpStream::connect_timeout(&addr, self.config.connect_timeout)
            .map_err(|e| SyncError::Connection(format!("cannot connect to {addr}: {e}")))?;
        stream
            .set_read_timeout(Some(self.config.io_timeout))
            .and_then(|()| stream.set_write_timeout(Some(self.config.io_timeout)))
            .map_err(|e| SyncError::Connection(e.to_string()))?;

        // Keep a clone around so a cancel can unblock the exchange.
        *self.socket.lock() = Some(
            stream
                .try_clone()
                .map_err(|e| SyncError::Connection(e.to_string()))?,
        );

        self.set_state(SessionState::Connected);
        let _ = self.events.send(SyncEvent::Connected);
        tracing::info!(%addr, "connected to sync server");

        self.check_cancelled()?;
        self.set_state(SessionState::Syncing);

        let _ = self.events.send(SyncEvent::Progress("Sending local data...".into()));
        let local = self.store.load_state()?;
        write_message(&mut stream, &local)?;

        let _ = self
            .events
            .send(SyncEvent::Progress("Waiting for merged data...".into()));
        let mut reader = BufReader::new(stream);
        let mut merged = read_message(&mut reader)?;

        // Persist only after a fully parsed response, and never after a
        // cancel.
        self.check_cancelled()?;
        let _ = self
            .events
            .send(SyncEvent::Progress("Updating local data...".into()));
        for subject in &mut merged.subjects {
            subject.recalculate_stats();
        }
        self.store.replace_state(merged)?;
        tracing::info!("merged state adopted from server");
        Ok(())
    }

    fn check_cancelled(&self) -> SyncResult<()> {
        if self.cancelled.load(Ordering::SeqCst) {
            Err(SyncError::Cancelled)
        } else {
            Ok(())
        }
    }

    fn set_state(&self, state: SessionState) {
        *self.state.write() = state;
    }
}
