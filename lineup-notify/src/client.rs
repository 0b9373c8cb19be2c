//! HTTP client for lineup-api
//!
//! Fetches the submission feed for the polling matcher and opens the
//! Server-Sent Events stream for the push listener.

use async_trait::async_trait;
use lineup_common::db::ExhibitorSubmissions;
use lineup_common::notify::SubmissionEntry;
use std::time::Duration;
use thiserror::Error;

const USER_AGENT: &str = concat!("lineup-notify/", env!("CARGO_PKG_VERSION"));

/// Applies to ordinary requests; the event stream has no overall timeout
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Client errors
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("API error {0}: {1}")]
    ApiError(u16, String),

    #[error("Parse error: {0}")]
    ParseError(String),
}

/// Where a polling cycle gets the current submissions
#[async_trait]
pub trait SubmissionSource: Send + Sync {
    async fn fetch_submissions(&self) -> Result<Vec<SubmissionEntry>, ClientError>;
}

/// lineup-api client
#[derive(Clone)]
pub struct LineupClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl LineupClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .map_err(|e| ClientError::NetworkError(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET /api/exhibitors
    pub async fn fetch_exhibitors(&self) -> Result<Vec<ExhibitorSubmissions>, ClientError> {
        let url = format!("{}/api/exhibitors", self.base_url);
        tracing::debug!(url = %url, "Fetching submissions");

        let response = self
            .http_client
            .get(&url)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(|e| ClientError::NetworkError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(ClientError::ApiError(status.as_u16(), error_text));
        }

        response
            .json()
            .await
            .map_err(|e| ClientError::ParseError(e.to_string()))
    }

    /// GET /api/events
    ///
    /// Returns once the server has accepted the subscription; read the body
    /// with `bytes_stream()`.
    pub async fn open_event_stream(&self) -> Result<reqwest::Response, ClientError> {
        let url = format!("{}/api/events", self.base_url);

        let response = self
            .http_client
            .get(&url)
            .header(reqwest::header::ACCEPT, "text/event-stream")
            .send()
            .await
            .map_err(|e| ClientError::NetworkError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(ClientError::ApiError(status.as_u16(), error_text));
        }

        Ok(response)
    }
}

#[async_trait]
impl SubmissionSource for LineupClient {
    async fn fetch_submissions(&self) -> Result<Vec<SubmissionEntry>, ClientError> {
        let exhibitors = self.fetch_exhibitors().await?;
        Ok(exhibitors
            .into_iter()
            .flat_map(|e| e.submissions)
            .collect())
    }
}
