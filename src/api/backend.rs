//! Tracker backend client
//!
//! Thin async wrapper over the backend's JSON API. Search and grab calls
//! only mean "accepted"; callers re-fetch the show to observe the outcome.

use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

use crate::models::{LogEntry, LogPage, Show, ShowSummary};

/// Default backend location when nothing else is configured
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Backend call failures
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Network error: {0}")]
    Network(#[source] reqwest::Error),

    #[error("Show not found")]
    NotFound,

    #[error("Request rejected with HTTP {0}")]
    RequestRejected(u16),

    #[error("Invalid response: {0}")]
    Decode(String),
}

impl GatewayError {
    /// Stable label for logs and JSON output
    pub fn kind(&self) -> &'static str {
        match self {
            GatewayError::Network(_) => "network",
            GatewayError::NotFound => "not_found",
            GatewayError::RequestRejected(_) => "rejected",
            GatewayError::Decode(_) => "decode",
        }
    }
}

#[derive(Serialize)]
struct SearchBody<'a> {
    query: &'a str,
}

#[derive(Serialize)]
struct GrabBody<'a> {
    release_pk: &'a str,
}

/// Tracker backend client
#[derive(Debug, Clone)]
pub struct BackendClient {
    base_url: String,
    client: reqwest::Client,
}

impl BackendClient {
    /// Create a client for the given base URL.
    ///
    /// No request timeout is set; the transport default applies.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn show_url(&self, show_id: &str, suffix: &str) -> String {
        format!(
            "{}/api/shows/{}{}",
            self.base_url,
            urlencoding::encode(show_id),
            suffix
        )
    }

    /// List tracked shows
    pub async fn list_shows(&self, only_missing: bool) -> Result<Vec<ShowSummary>, GatewayError> {
        let url = format!(
            "{}/api/shows/?only_missing={}",
            self.base_url,
            if only_missing { 1 } else { 0 }
        );
        let response = self.send(self.client.get(&url)).await?;
        decode(response).await
    }

    /// Fetch the full show aggregate
    pub async fn fetch_show(&self, show_id: &str) -> Result<Show, GatewayError> {
        let response = self
            .send(self.client.get(self.show_url(show_id, "")))
            .await
            .map_err(|e| match e {
                GatewayError::RequestRejected(code) if code == StatusCode::NOT_FOUND.as_u16() => {
                    GatewayError::NotFound
                }
                other => other,
            })?;

        // The backend answers `null` for unknown ids
        let show: Option<Show> = decode(response).await?;
        show.ok_or(GatewayError::NotFound)
    }

    /// Ask the backend to run an indexer search for this show
    pub async fn search_release(&self, show_id: &str, query: &str) -> Result<(), GatewayError> {
        let request = self
            .client
            .post(self.show_url(show_id, "/search_release"))
            .json(&SearchBody { query });
        self.send(request).await.map(drop)
    }

    /// Ask the backend to grab one release
    pub async fn grab_release(&self, show_id: &str, release_pk: &str) -> Result<(), GatewayError> {
        let request = self
            .client
            .post(self.show_url(show_id, "/grab"))
            .json(&GrabBody { release_pk });
        self.send(request).await.map(drop)
    }

    /// Most recent backend log records
    pub async fn list_logs(&self) -> Result<Vec<LogEntry>, GatewayError> {
        let url = format!("{}/api/logs", self.base_url);
        let response = self.send(self.client.get(&url)).await?;
        let page: LogPage = decode(response).await?;
        Ok(page.records)
    }

    /// Trigger the backend's "sync all" task
    pub async fn sync_all(&self) -> Result<(), GatewayError> {
        let url = format!("{}/api/tasks/sync_all", self.base_url);
        self.send(self.client.post(&url)).await.map(drop)
    }

    /// Send a request, mapping transport failures and non-success statuses
    async fn send(&self, request: reqwest::RequestBuilder) -> Result<Response, GatewayError> {
        let response = request
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(GatewayError::Network)?;

        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            Err(GatewayError::RequestRejected(status.as_u16()))
        }
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, GatewayError> {
    let body = response.text().await.map_err(GatewayError::Network)?;
    serde_json::from_str(&body).map_err(|e| GatewayError::Decode(format!("JSON parse error: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = BackendClient::new("http://tracker.local:8000/");
        assert_eq!(client.base_url(), "http://tracker.local:8000");
    }

    #[test]
    fn test_show_url_encodes_id() {
        let client = BackendClient::new("http://h");
        assert_eq!(client.show_url("42", "/grab"), "http://h/api/shows/42/grab");
        assert_eq!(client.show_url("a/b", ""), "http://h/api/shows/a%2Fb");
    }

    #[test]
    fn test_error_kinds() {
        assert_eq!(GatewayError::NotFound.kind(), "not_found");
        assert_eq!(GatewayError::RequestRejected(500).kind(), "rejected");
        assert_eq!(GatewayError::Decode("x".into()).kind(), "decode");
        assert_eq!(
            GatewayError::RequestRejected(503).to_string(),
            "Request rejected with HTTP 503"
        );
    }
}
