//! Classified fault taxonomy.
//!
//! Every fault here is non-fatal to the session: the menu loop surfaces
//! the message and returns to the prompt. Nothing is retried.

use thiserror::Error;

/// A classified ingestion failure.
///
/// The fetch is a single attempt; the outcome is classified and surfaced,
/// never retried.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Transport-level failure: the endpoint could not be reached.
    #[error("failed to connect to {endpoint}")]
    Connection {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    /// The endpoint answered with a non-success HTTP status.
    #[error("{endpoint} returned HTTP status {status}")]
    Status {
        endpoint: String,
        status: reqwest::StatusCode,
    },

    /// Any other request or body-decoding fault.
    #[error("request to {endpoint} failed")]
    Other {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
}

/// An expected attribute is absent from the canonical table.
///
/// Distinct from per-row missing values: this is the whole column (or the
/// derived domain split) being unavailable. Callers substitute an empty or
/// baseline result and surface the message.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchemaError {
    #[error("required column '{0}' is missing from the patient table")]
    MissingColumn(&'static str),

    /// The domain split produced nothing: no email in the table contains
    /// an `@` separator.
    #[error("no email contains an '@' separator; domain split failed")]
    NoDomainColumn,
}

/// Non-numeric operator input; the command is aborted with no state change.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("expected a numeric value, got '{0}'")]
pub struct InvalidNumberError(pub String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_error_messages() {
        assert_eq!(
            SchemaError::MissingColumn("age").to_string(),
            "required column 'age' is missing from the patient table"
        );
        assert!(SchemaError::NoDomainColumn.to_string().contains("domain split"));
    }

    #[test]
    fn test_invalid_number_message() {
        let err = InvalidNumberError("abc".to_string());
        assert_eq!(err.to_string(), "expected a numeric value, got 'abc'");
    }
}
