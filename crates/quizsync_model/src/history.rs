//! Exam history entries, immutable once created.

use crate::now_millis;
use serde::{Deserialize, Serialize};

/// Snapshot of a single question as it appeared in a finished exam.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionRecord {
    /// Id of the question at exam time.
    pub question_id: String,
    /// Question text at exam time.
    pub question_text: String,
    /// The canonical answer.
    pub correct_answer: String,
    /// What the user answered, if anything.
    #[serde(default)]
    pub user_answer: Option<String>,
    /// Whether the user's answer was correct.
    #[serde(default)]
    pub is_correct: bool,
}

/// One completed exam.
///
/// Entries are generated independently on each device, so identity is
/// the composite `(timestamp, device_source)` rather than a UUID; the
/// merge engine deduplicates on that key. Entries never change after
/// creation except for `last_modified`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamHistoryEntry {
    /// When the exam finished, unix millis. Half of the identity key.
    pub timestamp: i64,
    /// Id of the subject the exam was drawn from.
    pub subject_id: String,
    /// Subject display name at exam time.
    pub subject_name: String,
    /// Number of questions in the exam.
    #[serde(default)]
    pub total_questions: u32,
    /// Number of questions the user answered.
    #[serde(default)]
    pub answered_questions: u32,
    /// Points scored.
    #[serde(default)]
    pub score: u32,
    /// Maximum possible points.
    #[serde(default)]
    pub max_score: u32,
    /// Exam duration in seconds.
    #[serde(default)]
    pub duration_seconds: u64,
    /// Per-question snapshots.
    #[serde(default)]
    pub records: Vec<QuestionRecord>,
    /// Last modification time, unix millis.
    #[serde(default)]
    pub last_modified: i64,
    /// Label of the device that produced the entry. Half of the
    /// identity key.
    pub device_source: String,
}

impl ExamHistoryEntry {
    /// Creates a new entry stamped with the current time and this
    /// device's hostname as the source label.
    pub fn new(subject_id: impl Into<String>, subject_name: impl Into<String>) -> Self {
        Self {
            timestamp: now_millis(),
            subject_id: subject_id.into(),
            subject_name: subject_name.into(),
            total_questions: 0,
            answered_questions: 0,
            score: 0,
            max_score: 0,
            duration_seconds: 0,
            records: Vec::new(),
            last_modified: now_millis(),
            device_source: local_device_label(),
        }
    }

    /// The deduplication key used by the merge engine.
    pub fn dedup_key(&self) -> (i64, &str) {
        (self.timestamp, &self.device_source)
    }

    /// Number of correctly answered questions.
    pub fn correct_count(&self) -> u32 {
        self.records.iter().filter(|r| r.is_correct).count() as u32
    }

    /// Number of answered-but-wrong questions.
    pub fn wrong_count(&self) -> u32 {
        self.answered_questions.saturating_sub(self.correct_count())
    }

    /// Percentage of answered questions that were correct, 0–100.
    pub fn accuracy(&self) -> f64 {
        if self.answered_questions == 0 {
            return 0.0;
        }
        f64::from(self.correct_count()) / f64::from(self.answered_questions) * 100.0
    }

    /// Score as a percentage of the maximum, 0–100.
    pub fn score_rate(&self) -> f64 {
        if self.max_score == 0 {
            return 0.0;
        }
        f64::from(self.score) / f64::from(self.max_score) * 100.0
    }
}

/// Hostname of this device, used as the exam source label.
fn local_device_label() -> String {
    hostname::get()
        .ok()
        .and_then(|h| h.into_string().ok())
        .unwrap_or_else(|| "unknown-device".to_string())
}
