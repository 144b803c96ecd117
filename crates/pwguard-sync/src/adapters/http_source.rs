//! HTTP adapter for the authoritative corpus service.
//!
//! Speaks the corpus wire protocol: `GET /bloom-filter` returns the
//! snapshot triple, `POST /add` registers a password. Only the response
//! status matters on submission; the acknowledgment body is ignored.

use std::time::Duration;

use async_trait::async_trait;
use pwguard_filter::FilterSnapshot;
use reqwest::Client;
use serde::Serialize;

use crate::config::ReplicaConfig;
use crate::error::SyncError;
use crate::ports::AuthoritativeSource;

#[derive(Serialize)]
struct AddPasswordRequest<'a> {
    password: &'a str,
}

/// Authoritative corpus service reached over HTTP.
pub struct HttpAuthoritativeSource {
    client: Client,
    base_url: String,
}

impl HttpAuthoritativeSource {
    /// Create a client for the corpus service named in `config`.
    ///
    /// Per-request deadlines are enforced by the caller; the client-level
    /// timeout is a backstop covering the slower of the two operations.
    pub fn new(config: &ReplicaConfig) -> Result<Self, SyncError> {
        let client = Client::builder()
            .timeout(config.fetch_timeout.max(config.submit_timeout))
            .connect_timeout(Duration::from_secs(2))
            .build()
            .map_err(|e| SyncError::FetchFailure(format!("HTTP client setup: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }
}

#[async_trait]
impl AuthoritativeSource for HttpAuthoritativeSource {
    async fn fetch_snapshot(&self) -> Result<FilterSnapshot, SyncError> {
        let response = self
            .client
            .get(self.url("bloom-filter"))
            .send()
            .await
            .map_err(|e| SyncError::FetchFailure(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SyncError::FetchFailure(format!(
                "unexpected status {status}"
            )));
        }

        response
            .json::<FilterSnapshot>()
            .await
            .map_err(|e| SyncError::FetchFailure(format!("malformed snapshot body: {e}")))
    }

    async fn submit_password(&self, password: &str) -> Result<(), SyncError> {
        let response = self
            .client
            .post(self.url("add"))
            .json(&AddPasswordRequest { password })
            .send()
            .await
            .map_err(|e| SyncError::SubmissionFailure(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SyncError::SubmissionFailure(format!(
                "unexpected status {status}"
            )));
        }

        Ok(())
    }

    fn source_id(&self) -> &str {
        &self.base_url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joins_without_doubled_slash() {
        let config = ReplicaConfig {
            base_url: "http://localhost:8000/".to_string(),
            ..ReplicaConfig::for_testing()
        };
        let source = HttpAuthoritativeSource::new(&config).unwrap();

        assert_eq!(source.url("bloom-filter"), "http://localhost:8000/bloom-filter");
        assert_eq!(source.url("add"), "http://localhost:8000/add");
        assert_eq!(source.source_id(), "http://localhost:8000");
    }

    #[test]
    fn test_add_request_wire_shape() {
        let body = serde_json::to_string(&AddPasswordRequest {
            password: "hunter2",
        })
        .unwrap();
        assert_eq!(body, r#"{"password":"hunter2"}"#);
    }
}
