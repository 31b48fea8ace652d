//! Data models for the EMR analysis console.
//!
//! This module contains the canonical patient table produced by the
//! normalizer, the analysis result consumed by the reporter, and the
//! fixed placeholder constants shared by both.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A raw record as returned by the ingestion endpoint.
///
/// Nothing is guaranteed about its shape until it passes through the
/// normalizer; `name` and `email` are expected but may be absent or
/// non-text.
pub type RawRecord = serde_json::Map<String, serde_json::Value>;

/// Simulated ages assigned positionally to the first ten normalized rows.
///
/// Placeholder for a real age source: the endpoint does not carry ages, so
/// the normalizer assigns this fixed sequence in encounter order and marks
/// every row beyond it as missing. Do not derive ages from record content.
pub const SIMULATED_AGES: [u32; 10] = [20, 24, 30, 33, 35, 40, 44, 50, 53, 60];

/// Fixed illustrative condition table, in report iteration order.
///
/// Placeholder for real condition detection, which is out of scope; the
/// counts are not derived from the patient table and must stay verbatim so
/// reports remain deterministic.
pub const CONDITION_COUNTS: [(&str, u32); 5] = [
    ("Flu", 3),
    ("Hypertension", 2),
    ("Diabetes", 1),
    ("Asthma", 2),
    ("Allergies", 2),
];

/// A condition is recommended for attention only when its count strictly
/// exceeds this threshold.
pub const RECOMMENDATION_THRESHOLD: u32 = 3;

/// A column of the canonical patient table schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Name,
    Email,
    Age,
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Column::Name => write!(f, "name"),
            Column::Email => write!(f, "email"),
            Column::Age => write!(f, "age"),
        }
    }
}

/// A single normalized patient row.
///
/// `name` is trimmed and title-cased, `email` lower-cased, and `age` is
/// `None` when missing or invalid. Rows are immutable once created; a new
/// fetch supersedes the whole table rather than mutating rows in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientRecord {
    pub name: String,
    pub email: String,
    pub age: Option<u32>,
}

/// An ordered sequence of patient records sharing one schema.
///
/// Insertion order equals source order. Filtering never mutates a table;
/// it produces a new one carrying the same column set.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PatientTable {
    columns: Vec<Column>,
    rows: Vec<PatientRecord>,
}

impl PatientTable {
    /// Creates an empty table with no columns (the pre-fetch state).
    pub fn empty() -> Self {
        Self::default()
    }

    /// Creates a table with the full canonical schema.
    pub fn new(rows: Vec<PatientRecord>) -> Self {
        Self::with_columns(vec![Column::Name, Column::Email, Column::Age], rows)
    }

    /// Creates a table with an explicit column set.
    ///
    /// Used by tests and by ingestion paths that populate a narrower
    /// schema; downstream stages check the column set before reading.
    pub fn with_columns(columns: Vec<Column>, rows: Vec<PatientRecord>) -> Self {
        Self { columns, rows }
    }

    /// Whether the given column is part of this table's schema.
    pub fn has_column(&self, column: Column) -> bool {
        self.columns.contains(&column)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[PatientRecord] {
        &self.rows
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PatientRecord> {
        self.rows.iter()
    }

    /// Returns a new table keeping only rows matching the predicate.
    ///
    /// Preserves row order and the source schema.
    pub fn retain(&self, mut predicate: impl FnMut(&PatientRecord) -> bool) -> PatientTable {
        PatientTable {
            columns: self.columns.clone(),
            rows: self.rows.iter().filter(|r| predicate(r)).cloned().collect(),
        }
    }

    /// All present (non-missing) ages, in row order.
    pub fn present_ages(&self) -> Vec<u32> {
        self.rows.iter().filter_map(|r| r.age).collect()
    }
}

/// Aggregate metrics computed over a patient table.
///
/// Created fresh on each analysis; never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisResult {
    /// Number of rows in the analyzed table.
    pub total_patients: usize,
    /// Count of distinct domain substrings after the first `@`.
    pub unique_email_domains: usize,
    /// The fixed condition table, in report iteration order. Empty only in
    /// the baseline result.
    pub condition_counts: Vec<(&'static str, u32)>,
    /// Arithmetic mean of present ages; 0 when the table is empty or every
    /// age is missing.
    pub mean_age: f64,
}

impl AnalysisResult {
    /// The defined result for an empty table (not an error).
    pub fn baseline() -> Self {
        Self {
            total_patients: 0,
            unique_email_domains: 0,
            condition_counts: Vec::new(),
            mean_age: 0.0,
        }
    }

    /// The single condition with the highest count, when that count
    /// strictly exceeds [`RECOMMENDATION_THRESHOLD`]. Ties resolve to the
    /// first condition in iteration order.
    pub fn recommendation(&self) -> Option<(&'static str, u32)> {
        let mut best: Option<(&'static str, u32)> = None;
        for &(name, count) in &self.condition_counts {
            if best.map_or(true, |(_, c)| count > c) {
                best = Some((name, count));
            }
        }
        best.filter(|&(_, count)| count > RECOMMENDATION_THRESHOLD)
    }
}
