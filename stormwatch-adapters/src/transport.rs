//! HTTP transport to the Storm UI.
//!
//! [`UiTransport`] is the single seam between the collectors and the network:
//! one GET, returning status, content type and body. [`HttpTransport`] is the
//! `reqwest` implementation used in production.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;

use crate::CollectError;

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// A fully-read HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl UiResponse {
    /// A 200 response carrying a JSON body.
    pub fn json(body: impl Into<Vec<u8>>) -> Self {
        Self {
            status: 200,
            content_type: Some("application/json".to_string()),
            body: body.into(),
        }
    }

    /// True for 2xx statuses.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// True if the declared content type is JSON.
    pub fn is_json(&self) -> bool {
        self.content_type
            .as_deref()
            .is_some_and(|ct| ct.to_ascii_lowercase().contains("application/json"))
    }
}

/// Issues GET requests against the Storm UI.
#[async_trait]
pub trait UiTransport: Send + Sync {
    /// Fetch `path` (e.g. `/api/v1/topology/summary`).
    async fn get(&self, path: &str) -> Result<UiResponse, CollectError>;
}

/// `reqwest`-backed transport with a fixed per-request timeout.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    endpoint: String,
}

impl HttpTransport {
    /// Create a transport for `endpoint` (e.g. "http://storm-ui:8080").
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, CollectError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CollectError::Http(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    /// Base URL requests are issued against.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl UiTransport for HttpTransport {
    async fn get(&self, path: &str) -> Result<UiResponse, CollectError> {
        let url = format!("{}{}", self.endpoint, path);

        let response = self.client.get(&url).send().await?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response.bytes().await?.to_vec();

        Ok(UiResponse {
            status,
            content_type,
            body,
        })
    }
}
