//! HTTP record fetching.
//!
//! A single GET against the configured endpoint, one attempt, with the
//! outcome classified into the ingestion fault taxonomy. No retries and
//! no caching: every fetch supersedes the previous dataset.

use crate::error::FetchError;
use crate::models::RawRecord;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use tracing::{debug, info};

/// Fetches raw patient records from a remote endpoint.
pub struct RecordFetcher {
    client: reqwest::Client,
    endpoint: String,
    show_progress: bool,
}

impl RecordFetcher {
    /// Create a fetcher for the given endpoint.
    pub fn new(endpoint: impl Into<String>, timeout_seconds: u64, show_progress: bool) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            endpoint: endpoint.into(),
            show_progress,
        }
    }

    /// Fetch the record batch, classifying any failure.
    pub async fn fetch(&self) -> Result<Vec<RawRecord>, FetchError> {
        debug!("GET {}", self.endpoint);

        let spinner = if self.show_progress {
            let pb = ProgressBar::new_spinner();
            pb.set_style(ProgressStyle::default_spinner());
            pb.set_message("Fetching patient records...");
            pb.enable_steady_tick(Duration::from_millis(100));
            Some(pb)
        } else {
            None
        };

        let result = self.fetch_inner().await;

        if let Some(pb) = spinner {
            pb.finish_and_clear();
        }

        if let Ok(ref records) = result {
            info!("Fetched {} raw records from {}", records.len(), self.endpoint);
        }

        result
    }

    async fn fetch_inner(&self) -> Result<Vec<RawRecord>, FetchError> {
        let response = self
            .client
            .get(&self.endpoint)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                endpoint: self.endpoint.clone(),
                status,
            });
        }

        response
            .json::<Vec<RawRecord>>()
            .await
            .map_err(|e| self.classify(e))
    }

    fn classify(&self, source: reqwest::Error) -> FetchError {
        if source.is_connect() || source.is_timeout() {
            FetchError::Connection {
                endpoint: self.endpoint.clone(),
                source,
            }
        } else {
            FetchError::Other {
                endpoint: self.endpoint.clone(),
                source,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_fetch_success_returns_records() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"name": "jane DOE", "email": "Jane@Example.com"},
                {"name": "  bob ray ", "email": "BOB@HOSPITAL.ORG"},
            ])))
            .mount(&server)
            .await;

        let fetcher = RecordFetcher::new(format!("{}/users", server.uri()), 5, false);
        let records = fetcher.fetch().await.unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["name"], "jane DOE");
        assert_eq!(records[1]["email"], "BOB@HOSPITAL.ORG");
    }

    #[tokio::test]
    async fn test_fetch_non_success_status_is_classified() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let fetcher = RecordFetcher::new(server.uri(), 5, false);
        let err = fetcher.fetch().await.unwrap_err();

        assert!(matches!(
            err,
            FetchError::Status { status, .. } if status.as_u16() == 500
        ));
    }

    #[tokio::test]
    async fn test_fetch_connection_refused_is_classified() {
        // Bind and drop a listener so the port is free but unserved.
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };

        let fetcher = RecordFetcher::new(format!("http://127.0.0.1:{}/users", port), 2, false);
        let err = fetcher.fetch().await.unwrap_err();

        assert!(matches!(err, FetchError::Connection { .. }));
    }

    #[tokio::test]
    async fn test_fetch_malformed_body_is_other_fault() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let fetcher = RecordFetcher::new(server.uri(), 5, false);
        let err = fetcher.fetch().await.unwrap_err();

        assert!(matches!(err, FetchError::Other { .. }));
    }
}
