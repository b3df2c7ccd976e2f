//! # QuizSync Model
//!
//! Data model for the QuizSync synchronization subsystem.
//!
//! This crate provides:
//! - The hierarchical study data set: [`Subject`] → [`Question`]
//! - Immutable exam records: [`ExamHistoryEntry`]
//! - The sync envelope: [`SyncData`]
//! - The storage collaborator: [`SyncStore`] with in-memory and
//!   JSON-file implementations
//!
//! ## Key Invariants
//!
//! - A question's `id` is immutable and is the join key across devices
//! - Subject aggregates (`correct_count`, `attempted_count`) are always
//!   recoverable by scanning question answer states
//! - Exam history entries are identified by `(timestamp, device_source)`,
//!   not by UUID, and are immutable once created

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod history;
mod question;
mod store;
mod subject;
mod sync_data;

pub use error::{StoreError, StoreResult};
pub use history::{ExamHistoryEntry, QuestionRecord};
pub use question::{AnswerState, Question, QuestionKind};
pub use store::{JsonFileStore, MemoryStore, SyncStore};
pub use subject::Subject;
pub use sync_data::SyncData;

/// Returns the current wall-clock time as unix milliseconds.
///
/// All `last_modified` stamps in the data model use this representation.
pub fn now_millis() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}
