//! Report and chart artifact generation.

pub mod charts;
pub mod summary;

pub use charts::{render_charts, ChartOptions};
pub use summary::{format_summary, write_summary};

/// Bar chart artifact name (view-independent: condition counts are fixed).
pub const BAR_CHART_FILE: &str = "conditions_plot.png";

/// Pie chart artifact name (view-independent: condition counts are fixed).
pub const PIE_CHART_FILE: &str = "conditions_pie.png";

/// Which dataset a report is rendered from. The filtered view gets its own
/// histogram/summary names and a title suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Full,
    Filtered,
}

impl View {
    pub fn histogram_file(self) -> &'static str {
        match self {
            View::Full => "age_distribution.png",
            View::Filtered => "filtered_age_distribution.png",
        }
    }

    pub fn summary_file(self) -> &'static str {
        match self {
            View::Full => "analysis_summary.txt",
            View::Filtered => "filtered_analysis_summary.txt",
        }
    }

    pub fn histogram_title(self) -> &'static str {
        match self {
            View::Full => "Age Distribution of Patients",
            View::Filtered => "Age Distribution of Patients (Filtered)",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_artifact_names_are_distinct() {
        assert_ne!(View::Full.histogram_file(), View::Filtered.histogram_file());
        assert_ne!(View::Full.summary_file(), View::Filtered.summary_file());
    }

    #[test]
    fn test_filtered_title_suffix() {
        assert_eq!(View::Full.histogram_title(), "Age Distribution of Patients");
        assert!(View::Filtered.histogram_title().ends_with("(Filtered)"));
    }
}
