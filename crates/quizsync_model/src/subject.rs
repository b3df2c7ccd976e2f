//! Subjects: named question banks with their own progress state.

use crate::question::{AnswerState, Question};
use crate::now_millis;
use serde::{Deserialize, Serialize};

/// A named question bank with progress cursors and aggregate counters.
///
/// `correct_count` and `attempted_count` are derived values; they must
/// always be recoverable by scanning the questions' answer states, and
/// [`Subject::recalculate_stats`] does exactly that. The merge engine
/// never merges them directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
    /// Unique id, the join key across devices.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Ordered question list.
    #[serde(default)]
    pub questions: Vec<Question>,
    /// Resume position for sequential practice (forward-only cursor).
    #[serde(default)]
    pub sequential_last_position: u32,
    /// Resume position for review mode (forward-only cursor).
    #[serde(default)]
    pub review_last_position: u32,
    /// Resume position for wrong-question review.
    ///
    /// Not carried across syncs; the merge engine resets it.
    #[serde(default)]
    pub wrong_review_last_position: u32,
    /// Number of questions answered correctly (derived).
    #[serde(default)]
    pub correct_count: u32,
    /// Number of questions attempted (derived).
    #[serde(default)]
    pub attempted_count: u32,
    /// Display sort order.
    #[serde(default)]
    pub sort_order: i32,
    /// Best streak achieved in endless mode (monotonic high-water mark).
    #[serde(default)]
    pub endless_best_streak: u32,
    /// Last modification time, unix millis.
    #[serde(default)]
    pub last_modified: i64,
}

impl Subject {
    /// Creates an empty subject with the given id and name.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            questions: Vec::new(),
            sequential_last_position: 0,
            review_last_position: 0,
            wrong_review_last_position: 0,
            correct_count: 0,
            attempted_count: 0,
            sort_order: 0,
            endless_best_streak: 0,
            last_modified: now_millis(),
        }
    }

    /// Creates a subject with a fresh UUID.
    pub fn with_fresh_id(name: impl Into<String>) -> Self {
        Self::new(uuid::Uuid::new_v4().to_string(), name)
    }

    /// Total number of questions. Always `questions.len()`.
    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }

    /// Percentage of attempted questions answered correctly, 0–100.
    pub fn accuracy(&self) -> f64 {
        if self.attempted_count == 0 {
            return 0.0;
        }
        f64::from(self.correct_count) / f64::from(self.attempted_count) * 100.0
    }

    /// Number of questions currently flagged as wrong.
    pub fn wrong_question_count(&self) -> usize {
        self.questions.iter().filter(|q| q.is_wrong).count()
    }

    /// Recomputes `attempted_count` and `correct_count` from the
    /// questions' answer states.
    pub fn recalculate_stats(&mut self) {
        let mut attempted = 0u32;
        let mut correct = 0u32;
        for q in &self.questions {
            if q.answer_state.is_attempted() {
                attempted += 1;
                if q.answer_state == AnswerState::Correct {
                    correct += 1;
                }
            }
        }
        self.attempted_count = attempted;
        self.correct_count = correct;
    }

    /// Stamps the subject as modified now.
    pub fn touch(&mut self) {
        self.last_modified = now_millis();
    }
}
