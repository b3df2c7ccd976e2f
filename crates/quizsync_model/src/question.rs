//! Questions and their per-user answer state.

use serde::{Deserialize, Serialize};

/// The category of a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    /// Exactly one option is correct.
    SingleChoice,
    /// One or more options are correct; the answer is a letter set.
    MultipleChoice,
    /// True/false question.
    TrueFalse,
}

/// Per-user answer progress for a question.
///
/// Serialized in SCREAMING_SNAKE_CASE to stay compatible with the
/// historical wire values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AnswerState {
    /// Not yet attempted.
    #[default]
    Unanswered,
    /// Answered during a mock exam, not yet graded.
    Answered,
    /// Answered correctly.
    Correct,
    /// Answered incorrectly.
    Wrong,
}

impl AnswerState {
    /// Returns true if the question has been attempted in any form.
    pub fn is_attempted(&self) -> bool {
        !matches!(self, AnswerState::Unanswered)
    }
}

/// A single question in a subject's bank.
///
/// The `id` is opaque, stable across devices, and is the join key the
/// merge engine uses. Every other field may diverge between devices
/// between syncs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    /// Opaque unique id, immutable after creation.
    pub id: String,
    /// The question text.
    pub text: String,
    /// Ordered option list (may be empty for true/false).
    #[serde(default)]
    pub options: Vec<String>,
    /// Canonical answer string (letter or letter set).
    pub answer: String,
    /// Explanation shown after answering.
    #[serde(default)]
    pub explanation: String,
    /// Question category.
    pub kind: QuestionKind,
    /// Whether the question is flagged as a wrong/starred question.
    #[serde(default)]
    pub is_wrong: bool,
    /// The user's answer, if any.
    #[serde(default)]
    pub user_answer: Option<String>,
    /// Answer progress state.
    #[serde(default)]
    pub answer_state: AnswerState,
    /// How many times the question has been answered wrong.
    ///
    /// Monotonic counter; merge sums it across devices.
    #[serde(default)]
    pub wrong_answer_count: u32,
}

impl Question {
    /// Creates a new unanswered question with a fresh id.
    pub fn new(
        text: impl Into<String>,
        options: Vec<String>,
        answer: impl Into<String>,
        kind: QuestionKind,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            text: text.into(),
            options,
            answer: answer.into(),
            explanation: String::new(),
            kind,
            is_wrong: false,
            user_answer: None,
            answer_state: AnswerState::Unanswered,
            wrong_answer_count: 0,
        }
    }

    /// Checks whether `user_answer` matches the canonical answer.
    ///
    /// Multiple-choice answers are letter sets and compare
    /// order-insensitively; true/false accepts the `A`/`B` option
    /// aliases for true and false.
    pub fn is_answered_correctly(&self) -> bool {
        let Some(user) = self.user_answer.as_deref() else {
            return false;
        };

        match self.kind {
            QuestionKind::MultipleChoice => sorted_letters(&self.answer) == sorted_letters(user),
            QuestionKind::TrueFalse => {
                let normalized = match user {
                    "A" => "T",
                    "B" => "F",
                    other => other,
                };
                self.answer == normalized
            }
            QuestionKind::SingleChoice => self.answer == user,
        }
    }

    /// Records an answer attempt, updating state, the wrong flag and the
    /// wrong-answer counter.
    pub fn record_answer(&mut self, user_answer: impl Into<String>) {
        self.user_answer = Some(user_answer.into());
        if self.is_answered_correctly() {
            self.answer_state = AnswerState::Correct;
        } else {
            self.answer_state = AnswerState::Wrong;
            self.is_wrong = true;
            self.wrong_answer_count = self.wrong_answer_count.saturating_add(1);
        }
    }

    /// Clears per-user progress, keeping the wrong-answer counter.
    pub fn reset_progress(&mut self) {
        self.user_answer = None;
        self.answer_state = AnswerState::Unanswered;
    }
}

fn sorted_letters(s: &str) -> Vec<char> {
    let mut chars: Vec<char> = s.chars().collect();
    chars.sort_unstable();
    chars
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single_choice(answer: &str) -> Question {
        Question::new(
            "capital of France?",
            vec!["Paris".into(), "Lyon".into()],
            answer,
            QuestionKind::SingleChoice,
        )
    }

    #[test]
    fn fresh_question_is_unanswered() {
        let q = single_choice("A");
        assert_eq!(q.answer_state, AnswerState::Unanswered);
        assert!(!q.answer_state.is_attempted());
        assert!(!q.is_wrong);
        assert_eq!(q.wrong_answer_count, 0);
    }

    #[test]
    fn correct_answer_recorded() {
        let mut q = single_choice("A");
        q.record_answer("A");
        assert_eq!(q.answer_state, AnswerState::Correct);
        assert!(!q.is_wrong);
        assert_eq!(q.wrong_answer_count, 0);
    }

    #[test]
    fn wrong_answer_flags_and_counts() {
        let mut q = single_choice("A");
        q.record_answer("B");
        assert_eq!(q.answer_state, AnswerState::Wrong);
        assert!(q.is_wrong);
        assert_eq!(q.wrong_answer_count, 1);

        q.record_answer("B");
        assert_eq!(q.wrong_answer_count, 2);
    }

    #[test]
    fn multiple_choice_compares_letter_sets() {
        let mut q = Question::new("pick two", vec![], "ACD", QuestionKind::MultipleChoice);
        q.user_answer = Some("DCA".into());
        assert!(q.is_answered_correctly());

        q.user_answer = Some("AC".into());
        assert!(!q.is_answered_correctly());
    }

    #[test]
    fn true_false_accepts_option_aliases() {
        let mut q = Question::new("sky is blue", vec![], "T", QuestionKind::TrueFalse);
        q.user_answer = Some("A".into());
        assert!(q.is_answered_correctly());

        q.user_answer = Some("B".into());
        assert!(!q.is_answered_correctly());
    }

    #[test]
    fn reset_keeps_wrong_counter() {
        let mut q = single_choice("A");
        q.record_answer("B");
        q.reset_progress();
        assert_eq!(q.answer_state, AnswerState::Unanswered);
        assert!(q.user_answer.is_none());
        assert_eq!(q.wrong_answer_count, 1);
    }

    #[test]
    fn serde_field_names() {
        let q = single_choice("A");
        let json = serde_json::to_value(&q).unwrap();
        assert!(json.get("isWrong").is_some());
        assert!(json.get("wrongAnswerCount").is_some());
        assert_eq!(json["answerState"], "UNANSWERED");
        assert_eq!(json["kind"], "single_choice");
    }
}
