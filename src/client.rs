//! HTTP client for the remote analysis service.
//!
//! One request per call: no retries, no caching. The service is treated as
//! potentially stateful, so identical requests are still sent fresh.

use std::time::Duration;

use thiserror::Error;

use crate::protocol::{AnalysisRequest, AnalysisResult, RawResponse};

/// Default request timeout when neither config nor flags set one.
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Errors from one analysis round-trip.
///
/// Every variant means the session failed to settle; the distinction only
/// affects the message shown to the user.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("network error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("request timed out")]
    Timeout,
    #[error("service returned HTTP {0}")]
    Status(u16),
    #[error("service error: {0}")]
    Server(String),
    #[error("malformed response: {0}")]
    Protocol(String),
}

/// Client bound to one analysis endpoint.
pub struct AnalysisClient {
    http: reqwest::Client,
    endpoint: String,
    timeout: Duration,
}

impl AnalysisClient {
    /// Create a client for the given service base URL.
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        let http = reqwest::Client::builder()
            .user_agent(concat!("lexiscan/", env!("CARGO_PKG_VERSION")))
            .build()
            .expect("failed to create HTTP client");

        Self {
            http,
            endpoint: format!("{}/analyze", base_url.trim_end_matches('/')),
            timeout,
        }
    }

    /// The full URL requests are sent to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Submit one request and return the settled result.
    ///
    /// Transport failures, non-success statuses, and unparseable bodies all
    /// surface as [`ClientError`]; a partially valid body is never returned.
    pub async fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisResult, ClientError> {
        if std::env::var("LEXISCAN_DEBUG").is_ok() {
            eprintln!(
                "[debug] POST {} language={} code_len={}",
                self.endpoint,
                request.language,
                request.code.len()
            );
        }

        let response = self
            .http
            .post(&self.endpoint)
            .timeout(self.timeout)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ClientError::Timeout
                } else {
                    ClientError::Transport(e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status(status.as_u16()));
        }

        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                ClientError::Timeout
            } else {
                ClientError::Transport(e)
            }
        })?;

        let raw: RawResponse =
            serde_json::from_str(&body).map_err(|e| ClientError::Protocol(e.to_string()))?;

        if let Some(message) = raw.error.as_deref() {
            if !message.is_empty() {
                return Err(ClientError::Server(message.to_string()));
            }
        }

        raw.into_result().map_err(ClientError::Protocol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_join() {
        let client = AnalysisClient::new("http://localhost:8080", Duration::from_secs(1));
        assert_eq!(client.endpoint(), "http://localhost:8080/analyze");

        // Trailing slash must not double up
        let client = AnalysisClient::new("http://localhost:8080/", Duration::from_secs(1));
        assert_eq!(client.endpoint(), "http://localhost:8080/analyze");
    }
}
