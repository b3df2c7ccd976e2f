//! # QuizSync Engine
//!
//! Client role of the sync subsystem.
//!
//! This crate provides:
//! - Session state machine (idle → discovering → connecting → syncing)
//! - mDNS discovery of the listening peer
//! - The single-round-trip exchange with the server
//! - An event surface delivered over a channel
//! - Cancellation that never persists a half-completed session
//!
//! ## Key Invariants
//!
//! - The server is authoritative for merge; the client adopts whatever
//!   the server returns
//! - Local state is replaced only after a complete, parseable response
//! - Cancel or error from any non-terminal state releases the socket
//!   and stops discovery

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod discovery;
mod error;
mod events;
mod session;
mod state;

pub use config::ClientConfig;
pub use discovery::{discover_first, ResolvedPeer};
pub use error::{SyncError, SyncResult};
pub use events::SyncEvent;
pub use session::{CancelHandle, SyncSession};
pub use state::SessionState;
