//! Reporting of what a merge did.

/// Counts of what happened during a merge, for progress and log output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeSummary {
    /// Subjects present on both sides and field-merged.
    pub subjects_merged: usize,
    /// Subjects adopted verbatim from the remote side.
    pub subjects_adopted: usize,
    /// Questions adopted verbatim from the remote side within merged
    /// subjects.
    pub questions_adopted: usize,
    /// Exam history entries in the merged result.
    pub history_entries: usize,
    /// Exam history entries dropped as duplicates.
    pub history_duplicates: usize,
}

impl std::fmt::Display for MergeSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} subjects merged, {} adopted, {} new questions, {} history entries ({} duplicates dropped)",
            self.subjects_merged,
            self.subjects_adopted,
            self.questions_adopted,
            self.history_entries,
            self.history_duplicates
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_reads_naturally() {
        let summary = MergeSummary {
            subjects_merged: 2,
            subjects_adopted: 1,
            questions_adopted: 5,
            history_entries: 7,
            history_duplicates: 3,
        };
        let text = summary.to_string();
        assert!(text.contains("2 subjects merged"));
        assert!(text.contains("3 duplicates dropped"));
    }
}
