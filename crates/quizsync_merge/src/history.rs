//! Exam history merge: set union with deduplication.

use quizsync_model::ExamHistoryEntry;
use std::collections::HashSet;

/// Merges two exam history lists.
///
/// Local entries come first, then remote; duplicates by
/// `(timestamp, device_source)` are dropped silently with the first
/// occurrence winning. The result is sorted newest-first; the sort is
/// stable, so same-timestamp entries keep their local-before-remote
/// order.
pub fn merge_history(
    local: &[ExamHistoryEntry],
    remote: &[ExamHistoryEntry],
) -> Vec<ExamHistoryEntry> {
    let mut seen: HashSet<(i64, String)> = HashSet::new();
    let mut merged: Vec<ExamHistoryEntry> = Vec::with_capacity(local.len() + remote.len());

    for entry in local.iter().chain(remote.iter()) {
        let (timestamp, device) = entry.dedup_key();
        if seen.insert((timestamp, device.to_string())) {
            merged.push(entry.clone());
        }
    }

    merged.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    merged
}
