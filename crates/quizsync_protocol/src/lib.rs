//! # QuizSync Protocol
//!
//! Wire format for the one-request, one-response sync exchange, plus the
//! well-known service constants both roles must agree on.
//!
//! Each side writes exactly one [`SyncData`](quizsync_model::SyncData)
//! as a compact, newline-terminated UTF-8 JSON document and reads the
//! peer's single line the same way. There is no chunking, streaming, or
//! multi-message negotiation.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod wire;

pub use wire::{read_message, write_message, WireError, WireResult, MAX_MESSAGE_BYTES};

/// mDNS service type both roles advertise/browse.
///
/// Changing this breaks interoperability between versions.
pub const SERVICE_TYPE: &str = "_quizsync._tcp.local.";

/// Default TCP port the server listens on.
pub const DEFAULT_PORT: u16 = 12345;

/// Protocol version, advertised as a TXT property on the service.
pub const PROTOCOL_VERSION: u16 = 1;
