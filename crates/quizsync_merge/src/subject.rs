//! Subject and question merge rules.

use crate::summary::MergeSummary;
use quizsync_model::{AnswerState, Question, Subject};
use std::collections::HashMap;

/// Merges the two subject lists by id.
///
/// Local order is preserved; subjects present only on the remote side
/// are appended in remote order.
pub(crate) fn merge_subjects(
    local: &[Subject],
    remote: &[Subject],
    now: i64,
    summary: &mut MergeSummary,
) -> Vec<Subject> {
    let remote_by_id: HashMap<&str, &Subject> =
        remote.iter().map(|s| (s.id.as_str(), s)).collect();

    let mut merged = Vec::with_capacity(local.len() + remote.len());
    for local_subject in local {
        match remote_by_id.get(local_subject.id.as_str()) {
            Some(remote_subject) => {
                summary.subjects_merged += 1;
                merged.push(merge_subject_pair(local_subject, remote_subject, now, summary));
            }
            None => merged.push(local_subject.clone()),
        }
    }

    let local_ids: HashMap<&str, ()> = local.iter().map(|s| (s.id.as_str(), ())).collect();
    for remote_subject in remote {
        if !local_ids.contains_key(remote_subject.id.as_str()) {
            summary.subjects_adopted += 1;
            merged.push(remote_subject.clone());
        }
    }

    merged
}

/// Merges one subject present on both sides.
///
/// Identity and presentation come from the local side. High-water marks
/// and forward-only cursors take the max; the wrong-review cursor is not
/// carried across a sync. Aggregates are recomputed from the merged
/// question list, and `last_modified` is stamped with `now` whether or
/// not any field actually changed.
pub fn merge_subject_pair(
    local: &Subject,
    remote: &Subject,
    now: i64,
    summary: &mut MergeSummary,
) -> Subject {
    let mut merged = Subject::new(local.id.clone(), local.name.clone());
    merged.sort_order = local.sort_order;
    merged.endless_best_streak = local.endless_best_streak.max(remote.endless_best_streak);
    merged.sequential_last_position = local
        .sequential_last_position
        .max(remote.sequential_last_position);
    merged.review_last_position = local.review_last_position.max(remote.review_last_position);
    merged.questions = merge_questions(&local.questions, &remote.questions, summary);

    // A re-imported, smaller bank must not leave a resume cursor past
    // the end of the merged list.
    let total = merged.questions.len() as u32;
    merged.sequential_last_position = merged.sequential_last_position.min(total);
    merged.review_last_position = merged.review_last_position.min(total);

    merged.recalculate_stats();
    merged.last_modified = now;
    merged
}

fn merge_questions(
    local: &[Question],
    remote: &[Question],
    summary: &mut MergeSummary,
) -> Vec<Question> {
    let remote_by_id: HashMap<&str, &Question> =
        remote.iter().map(|q| (q.id.as_str(), q)).collect();

    let mut merged = Vec::with_capacity(local.len() + remote.len());
    for local_question in local {
        match remote_by_id.get(local_question.id.as_str()) {
            Some(remote_question) => merged.push(merge_question_pair(local_question, remote_question)),
            None => merged.push(local_question.clone()),
        }
    }

    let local_ids: HashMap<&str, ()> = local.iter().map(|q| (q.id.as_str(), ())).collect();
    for remote_question in remote {
        if !local_ids.contains_key(remote_question.id.as_str()) {
            summary.questions_adopted += 1;
            merged.push(remote_question.clone());
        }
    }

    merged
}

/// Merges one question present on both sides.
///
/// The merged question is based on the local copy. Wrong-answer counts
/// accumulate, the wrong flag is a union, and answer progress is only
/// adopted from the remote side when the local side has not answered.
pub fn merge_question_pair(local: &Question, remote: &Question) -> Question {
    let mut merged = local.clone();
    merged.wrong_answer_count = local
        .wrong_answer_count
        .saturating_add(remote.wrong_answer_count);
    merged.is_wrong = local.is_wrong || remote.is_wrong;
    if local.answer_state == AnswerState::Unanswered {
        merged.answer_state = remote.answer_state;
        merged.user_answer = remote.user_answer.clone();
    }
    merged
}
