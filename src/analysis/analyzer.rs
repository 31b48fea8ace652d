//! Aggregate metrics over a patient table.

use crate::error::SchemaError;
use crate::models::{AnalysisResult, Column, PatientTable, CONDITION_COUNTS};
use std::collections::HashSet;
use tracing::debug;

/// Compute aggregate metrics for `table`.
///
/// An empty table yields the baseline result and is not an error. A table
/// missing an expected column, or whose emails yield no domain at all, is
/// a schema fault: the caller surfaces the diagnostic and substitutes the
/// baseline.
pub fn analyze(table: &PatientTable) -> Result<AnalysisResult, SchemaError> {
    if table.is_empty() {
        return Ok(AnalysisResult::baseline());
    }

    if !table.has_column(Column::Email) {
        return Err(SchemaError::MissingColumn("email"));
    }
    if !table.has_column(Column::Age) {
        return Err(SchemaError::MissingColumn("age"));
    }

    // Split on the first '@'; malformed emails contribute no domain.
    let domains: HashSet<&str> = table
        .iter()
        .filter_map(|row| row.email.split_once('@').map(|(_, domain)| domain))
        .collect();

    if domains.is_empty() {
        return Err(SchemaError::NoDomainColumn);
    }

    let ages = table.present_ages();
    let mean_age = if ages.is_empty() {
        0.0
    } else {
        ages.iter().map(|&a| f64::from(a)).sum::<f64>() / ages.len() as f64
    };

    debug!(
        "Analyzed {} patients, {} distinct domains",
        table.len(),
        domains.len()
    );

    Ok(AnalysisResult {
        total_patients: table.len(),
        unique_email_domains: domains.len(),
        condition_counts: CONDITION_COUNTS.to_vec(),
        mean_age,
    })
}
