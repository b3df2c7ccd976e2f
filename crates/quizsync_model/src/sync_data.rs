//! The sync envelope exchanged between peers.

use crate::history::ExamHistoryEntry;
use crate::subject::Subject;
use serde::{Deserialize, Serialize};

/// Everything one side sends to the other in a sync session.
///
/// A `SyncData` is created fresh for every sync attempt as a projection
/// of the local store; it is never persisted as its own file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncData {
    /// All subjects with their questions and progress.
    #[serde(default)]
    pub subjects: Vec<Subject>,
    /// All exam history entries.
    #[serde(default)]
    pub exam_history: Vec<ExamHistoryEntry>,
}

impl SyncData {
    /// Creates an envelope from subject and history lists.
    pub fn new(subjects: Vec<Subject>, exam_history: Vec<ExamHistoryEntry>) -> Self {
        Self {
            subjects,
            exam_history,
        }
    }

    /// Returns true if there is nothing to sync on this side.
    ///
    /// A freshly-reset store produces exactly this; it is a valid input
    /// to the merge, not an error.
    pub fn is_empty(&self) -> bool {
        self.subjects.is_empty() && self.exam_history.is_empty()
    }

    /// Looks up a subject by id.
    pub fn subject(&self, id: &str) -> Option<&Subject> {
        self.subjects.iter().find(|s| s.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_empty() {
        let data = SyncData::default();
        assert!(data.is_empty());
    }

    #[test]
    fn subject_lookup() {
        let data = SyncData::new(vec![Subject::new("s1", "A"), Subject::new("s2", "B")], vec![]);
        assert!(!data.is_empty());
        assert_eq!(data.subject("s2").map(|s| s.name.as_str()), Some("B"));
        assert!(data.subject("s3").is_none());
    }

    #[test]
    fn envelope_wire_keys() {
        let data = SyncData::default();
        let json = serde_json::to_value(&data).unwrap();
        assert!(json.get("subjects").is_some());
        assert!(json.get("examHistory").is_some());
    }

    #[test]
    fn missing_keys_deserialize_as_empty() {
        let data: SyncData = serde_json::from_str("{}").unwrap();
        assert!(data.is_empty());
    }
}
