//! # QuizSync Merge Engine
//!
//! Pure, deterministic merge of two independently-mutated [`SyncData`]
//! snapshots. The only non-determinism is the wall-clock stamp written
//! into merged subjects; [`merge_at`] takes the clock as an argument so
//! tests can pin it.
//!
//! ## Merge Rules
//!
//! - Subject set: union by id; one-sided subjects pass through unchanged
//! - High-water marks (`endless_best_streak`) and forward-only cursors
//!   merge via `max`
//! - Question sets join by id; `wrong_answer_count` accumulates across
//!   devices, `is_wrong` is a set union, and a device that has answered
//!   wins over one that has not
//! - Subject aggregates are recomputed from the merged questions, never
//!   merged directly, to avoid double counting
//! - Exam history is a set union deduplicated by
//!   `(timestamp, device_source)`, newest first
//!
//! Merge never deletes a subject or question present on either input.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod history;
mod subject;
mod summary;

pub use history::merge_history;
pub use subject::{merge_question_pair, merge_subject_pair};
pub use summary::MergeSummary;

use quizsync_model::{now_millis, SyncData};

/// Merges two snapshots into one, stamping merged subjects with the
/// current wall-clock time.
pub fn merge(local: &SyncData, remote: &SyncData) -> SyncData {
    merge_at(local, remote, now_millis())
}

/// Merges two snapshots, stamping merged subjects with `now` (unix
/// millis). Deterministic given its inputs.
pub fn merge_at(local: &SyncData, remote: &SyncData, now: i64) -> SyncData {
    let (data, summary) = merge_with_summary(local, remote, now);
    tracing::debug!(
        subjects_merged = summary.subjects_merged,
        subjects_adopted = summary.subjects_adopted,
        questions_adopted = summary.questions_adopted,
        history_entries = summary.history_entries,
        history_duplicates = summary.history_duplicates,
        "merge complete"
    );
    data
}

/// Merges two snapshots and reports what happened, for progress and
/// log output.
pub fn merge_with_summary(
    local: &SyncData,
    remote: &SyncData,
    now: i64,
) -> (SyncData, MergeSummary) {
    let mut summary = MergeSummary::default();
    let subjects = subject::merge_subjects(&local.subjects, &remote.subjects, now, &mut summary);
    let history = history::merge_history(&local.exam_history, &remote.exam_history);

    summary.history_entries = history.len();
    summary.history_duplicates =
        (local.exam_history.len() + remote.exam_history.len()).saturating_sub(history.len());

    (SyncData::new(subjects, history), summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use quizsync_model::{AnswerState, ExamHistoryEntry, Question, QuestionKind, Subject};

    fn question(id: &str) -> Question {
        let mut q = Question::new("text", vec![], "A", QuestionKind::SingleChoice);
        q.id = id.into();
        q
    }

    fn subject(id: &str, question_ids: &[&str]) -> Subject {
        let mut s = Subject::new(id, id.to_uppercase());
        s.questions = question_ids.iter().map(|q| question(q)).collect();
        s
    }

    fn entry(timestamp: i64, device: &str) -> ExamHistoryEntry {
        let mut e = ExamHistoryEntry::new("s1", "S1");
        e.timestamp = timestamp;
        e.device_source = device.into();
        e
    }

    #[test]
    fn one_sided_subjects_pass_through() {
        let local = SyncData::new(vec![subject("s1", &["q1"])], vec![]);
        let remote = SyncData::new(vec![subject("s1", &["q1"]), subject("s2", &["q2"])], vec![]);

        let merged = merge_at(&local, &remote, 1000);
        assert_eq!(merged.subjects.len(), 2);
        // The remote-only subject arrives verbatim, timestamp included.
        assert_eq!(
            merged.subject("s2").unwrap(),
            remote.subject("s2").unwrap()
        );
    }

    #[test]
    fn remerge_is_idempotent_for_flag_and_max_fields() {
        let mut s = subject("s1", &["q1", "q2"]);
        s.endless_best_streak = 7;
        s.sequential_last_position = 2;
        s.questions[0].record_answer("A");
        let x = SyncData::new(vec![s], vec![entry(100, "phone")]);

        let once = merge_at(&x, &x, 1000);
        let twice = merge_at(&once, &once, 1000);

        let a = once.subject("s1").unwrap();
        let b = twice.subject("s1").unwrap();
        assert_eq!(a.endless_best_streak, b.endless_best_streak);
        assert_eq!(a.sequential_last_position, b.sequential_last_position);
        assert_eq!(a.correct_count, b.correct_count);
        assert_eq!(a.attempted_count, b.attempted_count);
        assert_eq!(once.exam_history, twice.exam_history);
        for (qa, qb) in a.questions.iter().zip(&b.questions) {
            assert_eq!(qa.is_wrong, qb.is_wrong);
            assert_eq!(qa.answer_state, qb.answer_state);
        }
    }

    #[test]
    fn merged_last_modified_always_advances() {
        let x = SyncData::new(vec![subject("s1", &["q1"])], vec![]);
        let merged = merge_at(&x, &x, 123_456);
        assert_eq!(merged.subject("s1").unwrap().last_modified, 123_456);
    }

    #[test]
    fn wrong_counts_accumulate_across_devices() {
        let mut local = SyncData::new(vec![subject("s1", &["q1"])], vec![]);
        let mut remote = local.clone();
        local.subjects[0].questions[0].wrong_answer_count = 2;
        remote.subjects[0].questions[0].wrong_answer_count = 3;

        let merged = merge_at(&local, &remote, 0);
        assert_eq!(merged.subjects[0].questions[0].wrong_answer_count, 5);
    }

    #[test]
    fn history_dedup_scenario() {
        let local = SyncData::new(vec![], vec![entry(100, "A")]);
        let remote = SyncData::new(vec![], vec![entry(100, "A"), entry(200, "B")]);

        let merged = merge_at(&local, &remote, 0);
        assert_eq!(merged.exam_history.len(), 2);
        assert_eq!(merged.exam_history[0].timestamp, 200);
        assert_eq!(merged.exam_history[1].timestamp, 100);
    }

    #[test]
    fn summary_counts_what_happened() {
        let local = SyncData::new(vec![subject("s1", &["q1"])], vec![entry(100, "A")]);
        let remote = SyncData::new(
            vec![subject("s1", &["q1", "q2"]), subject("s2", &["q3"])],
            vec![entry(100, "A"), entry(200, "B")],
        );

        let (_, summary) = merge_with_summary(&local, &remote, 0);
        assert_eq!(summary.subjects_merged, 1);
        assert_eq!(summary.subjects_adopted, 1);
        assert_eq!(summary.questions_adopted, 1);
        assert_eq!(summary.history_entries, 2);
        assert_eq!(summary.history_duplicates, 1);
    }

    #[test]
    fn empty_inputs_merge_to_empty() {
        let merged = merge_at(&SyncData::default(), &SyncData::default(), 0);
        assert!(merged.is_empty());
    }

    #[test]
    fn answered_beats_unanswered() {
        let local = SyncData::new(vec![subject("s1", &["q1"])], vec![]);
        let mut remote = local.clone();
        remote.subjects[0].questions[0].user_answer = Some("B".into());
        remote.subjects[0].questions[0].answer_state = AnswerState::Correct;

        let merged = merge_at(&local, &remote, 0);
        let q = &merged.subjects[0].questions[0];
        assert_eq!(q.user_answer.as_deref(), Some("B"));
        assert_eq!(q.answer_state, AnswerState::Correct);
    }

    #[test]
    fn local_answer_wins_when_both_answered() {
        let mut local = SyncData::new(vec![subject("s1", &["q1"])], vec![]);
        local.subjects[0].questions[0].user_answer = Some("A".into());
        local.subjects[0].questions[0].answer_state = AnswerState::Wrong;

        let mut remote = SyncData::new(vec![subject("s1", &["q1"])], vec![]);
        remote.subjects[0].questions[0].user_answer = Some("B".into());
        remote.subjects[0].questions[0].answer_state = AnswerState::Correct;

        let merged = merge_at(&local, &remote, 0);
        let q = &merged.subjects[0].questions[0];
        assert_eq!(q.user_answer.as_deref(), Some("A"));
        assert_eq!(q.answer_state, AnswerState::Wrong);
    }
}
