//! Age-range filtering.

use crate::error::SchemaError;
use crate::models::{Column, PatientTable};

/// Derive the subset of `table` whose age lies in `min_age..=max_age`.
///
/// Rows with a missing age are excluded. An inverted range is the caller's
/// problem and simply yields an empty result. The input is never mutated;
/// the output preserves input order and schema.
///
/// Returns a schema error when the table has no age column at all, which
/// is distinct from per-row missing values.
pub fn filter_by_age(
    table: &PatientTable,
    min_age: i64,
    max_age: i64,
) -> Result<PatientTable, SchemaError> {
    if !table.has_column(Column::Age) {
        return Err(SchemaError::MissingColumn("age"));
    }

    Ok(table.retain(|row| {
        row.age
            .map_or(false, |age| min_age <= i64::from(age) && i64::from(age) <= max_age)
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::normalize;
    use crate::models::{PatientRecord, RawRecord};
    use serde_json::json;

    /// The 10-record fixture: ages follow the fixed simulated sequence.
    fn fixture_table() -> PatientTable {
        let records: Vec<RawRecord> = (0..10)
            .map(|i| {
                let mut r = RawRecord::new();
                r.insert("name".to_string(), json!(format!("patient {}", i)));
                r.insert("email".to_string(), json!(format!("p{}@x.com", i)));
                r
            })
            .collect();
        normalize(&records)
    }

    #[test]
    fn test_filter_retains_only_rows_in_range() {
        let table = fixture_table();
        let filtered = filter_by_age(&table, 30, 40).unwrap();

        // Fixed sequence ages in [30, 40]: 30, 33, 35, 40
        assert_eq!(filtered.present_ages(), vec![30, 33, 35, 40]);
        for row in filtered.iter() {
            let age = i64::from(row.age.unwrap());
            assert!((30..=40).contains(&age));
        }
    }

    #[test]
    fn test_filter_is_subset_by_row_identity() {
        let table = fixture_table();
        let filtered = filter_by_age(&table, 30, 40).unwrap();

        for row in filtered.iter() {
            assert!(table.rows().contains(row));
        }
    }

    #[test]
    fn test_filter_is_idempotent() {
        let table = fixture_table();
        let once = filter_by_age(&table, 30, 40).unwrap();
        let twice = filter_by_age(&once, 30, 40).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_filter_excludes_missing_ages() {
        let table = PatientTable::new(vec![
            PatientRecord {
                name: "A".to_string(),
                email: "a@x.com".to_string(),
                age: Some(35),
            },
            PatientRecord {
                name: "B".to_string(),
                email: "b@x.com".to_string(),
                age: None,
            },
        ]);

        let filtered = filter_by_age(&table, 0, 120).unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered.rows()[0].name, "A");
    }

    #[test]
    fn test_inverted_range_yields_empty() {
        let table = fixture_table();
        let filtered = filter_by_age(&table, 40, 30).unwrap();
        assert!(filtered.is_empty());
    }

    #[test]
    fn test_negative_bounds_are_numbers_not_errors() {
        let table = fixture_table();
        let filtered = filter_by_age(&table, -10, -1).unwrap();
        assert!(filtered.is_empty());
    }

    #[test]
    fn test_missing_age_column_is_schema_error() {
        let table = PatientTable::with_columns(
            vec![Column::Name, Column::Email],
            vec![PatientRecord {
                name: "A".to_string(),
                email: "a@x.com".to_string(),
                age: None,
            }],
        );

        let err = filter_by_age(&table, 0, 120).unwrap_err();
        assert_eq!(err, SchemaError::MissingColumn("age"));
    }

    #[test]
    fn test_filter_does_not_mutate_input() {
        let table = fixture_table();
        let before = table.clone();
        let _ = filter_by_age(&table, 30, 40).unwrap();
        assert_eq!(table, before);
    }
}
