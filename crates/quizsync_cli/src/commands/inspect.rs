//! Inspect command implementation.

use quizsync_model::{JsonFileStore, SyncStore};
use serde::Serialize;
use std::path::Path;

/// Store inspection result.
#[derive(Debug, Serialize)]
pub struct InspectResult {
    /// Store file path.
    pub path: String,
    /// Number of subjects.
    pub subject_count: usize,
    /// Total number of questions across subjects.
    pub question_count: usize,
    /// Number of exam history entries.
    pub history_count: usize,
    /// Per-subject statistics.
    pub subjects: Vec<SubjectStats>,
}

/// Statistics for a single subject.
#[derive(Debug, Serialize)]
pub struct SubjectStats {
    /// Subject name.
    pub name: String,
    /// Number of questions.
    pub questions: usize,
    /// Questions attempted so far.
    pub attempted: u32,
    /// Of those, answered correctly.
    pub correct: u32,
    /// Best endless-mode streak.
    pub best_streak: u32,
}

/// Runs the inspect command.
pub fn run(path: &Path, format: &str) -> Result<(), Box<dyn std::error::Error>> {
    if !path.exists() {
        return Err(format!("No store found at {path:?}").into());
    }

    let state = JsonFileStore::new(path).load_state()?;
    let result = InspectResult {
        path: path.display().to_string(),
        subject_count: state.subjects.len(),
        question_count: state.subjects.iter().map(|s| s.questions.len()).sum(),
        history_count: state.exam_history.len(),
        subjects: state
            .subjects
            .iter()
            .map(|s| SubjectStats {
                name: s.name.clone(),
                questions: s.questions.len(),
                attempted: s.attempted_count,
                correct: s.correct_count,
                best_streak: s.endless_best_streak,
            })
            .collect(),
    };

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&result)?),
        _ => print_text(&result),
    }
    Ok(())
}

fn print_text(result: &InspectResult) {
    println!("Store: {}", result.path);
    println!(
        "{} subjects, {} questions, {} exam history entries",
        result.subject_count, result.question_count, result.history_count
    );
    for subject in &result.subjects {
        println!(
            "  {}: {} questions, {}/{} answered correctly, best streak {}",
            subject.name, subject.questions, subject.correct, subject.attempted, subject.best_streak
        );
    }
}
