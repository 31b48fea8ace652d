//! Plain-text analysis summary.
//!
//! The report format is deterministic: fixed header, one line per metric,
//! then one line per condition in the fixed table's order.

use crate::models::AnalysisResult;
use anyhow::{Context, Result};
use std::path::Path;

/// Render the summary text for an analysis result.
pub fn format_summary(analysis: &AnalysisResult) -> String {
    let mut out = String::new();

    out.push_str("Analysis Summary\n");
    out.push_str("----------------\n");
    out.push_str(&format!("Total Patients: {}\n", analysis.total_patients));
    out.push_str(&format!(
        "Unique Email Domains: {}\n",
        analysis.unique_email_domains
    ));
    out.push_str(&format!("Mean Age: {}\n", analysis.mean_age));
    out.push_str("Condition Frequencies:\n");

    for (condition, count) in &analysis.condition_counts {
        out.push_str(&format!("- {}: {}\n", condition, count));
    }

    out
}

/// Write the summary to `path`. A write failure is surfaced to the caller
/// and is not fatal to the session.
pub fn write_summary(analysis: &AnalysisResult, path: &Path) -> Result<()> {
    std::fs::write(path, format_summary(analysis))
        .with_context(|| format!("Failed to write summary to {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CONDITION_COUNTS;

    fn fixture_analysis() -> AnalysisResult {
        AnalysisResult {
            total_patients: 10,
            unique_email_domains: 10,
            condition_counts: CONDITION_COUNTS.to_vec(),
            mean_age: 38.9,
        }
    }

    #[test]
    fn test_format_summary_content() {
        let text = format_summary(&fixture_analysis());

        assert_eq!(
            text,
            "Analysis Summary\n\
             ----------------\n\
             Total Patients: 10\n\
             Unique Email Domains: 10\n\
             Mean Age: 38.9\n\
             Condition Frequencies:\n\
             - Flu: 3\n\
             - Hypertension: 2\n\
             - Diabetes: 1\n\
             - Asthma: 2\n\
             - Allergies: 2\n"
        );
    }

    #[test]
    fn test_format_summary_baseline() {
        let text = format_summary(&AnalysisResult::baseline());

        assert!(text.contains("Total Patients: 0"));
        assert!(text.contains("Mean Age: 0"));
        assert!(text.ends_with("Condition Frequencies:\n"));
    }

    #[test]
    fn test_write_summary_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("analysis_summary.txt");

        write_summary(&fixture_analysis(), &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("Analysis Summary\n"));
        assert!(content.contains("- Flu: 3\n"));
    }

    #[test]
    fn test_write_summary_unwritable_path_fails() {
        let err = write_summary(
            &fixture_analysis(),
            Path::new("/nonexistent-dir/summary.txt"),
        )
        .unwrap_err();

        assert!(err.to_string().contains("Failed to write summary"));
    }
}
