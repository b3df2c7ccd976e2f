//! # QuizSync Server
//!
//! Server role of the two-device sync: listen, merge, respond.
//!
//! This crate provides:
//! - A blocking TCP listener with one worker thread per connection
//! - mDNS advertising of the listening endpoint
//! - The single round-trip exchange: read the client's state, merge it
//!   with the persisted state, persist, send the merged result back
//!
//! # Key Invariants
//!
//! - Load, merge, and store happen under one server-wide lock, so
//!   concurrent clients cannot lose each other's updates.
//! - The merged state is persisted before the response is written; a
//!   client that receives the response line may adopt it knowing both
//!   sides now agree.
//! - A failed or malformed connection leaves the persisted state
//!   untouched and never takes the listener down.
//!
//! # Example
//!
//! ```no_run
//! use quizsync_model::MemoryStore;
//! use quizsync_server::{ServerConfig, SyncServer};
//! use std::sync::{mpsc, Arc};
//!
//! let store = Arc::new(MemoryStore::new());
//! let (events, _rx) = mpsc::channel();
//! let server = SyncServer::new(ServerConfig::new(), store, events);
//! let addr = server.start()?;
//! println!("listening on {addr}");
//! # Ok::<(), quizsync_server::ServerError>(())
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod announce;
mod config;
mod error;
mod events;
mod server;

pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use events::ServerEvent;
pub use server::{ServerState, SyncServer};
