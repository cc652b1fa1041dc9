//! Storm UI REST API client.
//!
//! Two documents are read:
//!
//! - `GET /api/v1/topology/summary` - every topology running on the cluster
//! - `GET /api/v1/topology/{id}` - windowed stats, spouts and bolts of one topology
//!
//! ## Example
//!
//! ```rust,no_run
//! use stormwatch_adapters::storm::StormUiClient;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = StormUiClient::builder()
//!         .endpoint("storm-ui:8080")
//!         .timeout(Duration::from_secs(5))
//!         .build()?;
//!
//!     let summary = client.topology_summary().await?;
//!     for topology in &summary.topologies {
//!         let detail = client.topology(topology.id()).await?;
//!         println!("{}: {} spouts", topology.name(), detail.spouts.len());
//!     }
//!
//!     Ok(())
//! }
//! ```

use std::time::Duration;

use serde::de::DeserializeOwned;
use stormwatch_types::{TopologyDetail, TopologySummaryResponse};

use crate::transport::{HttpTransport, UiResponse, UiTransport, DEFAULT_TIMEOUT};
use crate::CollectError;

/// Path of the cluster-wide topology listing.
pub const SUMMARY_PATH: &str = "/api/v1/topology/summary";

/// Client for the Storm UI REST API.
#[derive(Debug, Clone)]
pub struct StormUiClient<T = HttpTransport> {
    transport: T,
}

impl StormUiClient<HttpTransport> {
    /// Create a new builder for configuring the client.
    pub fn builder() -> StormUiClientBuilder {
        StormUiClientBuilder::default()
    }
}

impl<T: UiTransport> StormUiClient<T> {
    /// Create a client over an existing transport.
    pub fn with_transport(transport: T) -> Self {
        Self { transport }
    }

    /// Get the underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Fetch the cluster-wide topology listing.
    pub async fn topology_summary(&self) -> Result<TopologySummaryResponse, CollectError> {
        let response = self.transport.get(SUMMARY_PATH).await?;
        ensure_success(&response)?;
        parse_body(&response)
    }

    /// Fetch the detail document of one topology.
    ///
    /// Unlike the summary, the detail response must declare a JSON content
    /// type; the UI serves an HTML error page for some failures.
    pub async fn topology(&self, id: &str) -> Result<TopologyDetail, CollectError> {
        let response = self.transport.get(&topology_path(id)).await?;
        ensure_success(&response)?;

        if !response.is_json() {
            return Err(CollectError::ContentType(
                response
                    .content_type
                    .unwrap_or_else(|| "missing content type".to_string()),
            ));
        }

        parse_body(&response)
    }
}

fn ensure_success(response: &UiResponse) -> Result<(), CollectError> {
    if response.is_success() {
        Ok(())
    } else {
        Err(CollectError::Status(response.status))
    }
}

fn parse_body<D: DeserializeOwned>(response: &UiResponse) -> Result<D, CollectError> {
    Ok(serde_json::from_slice(&response.body)?)
}

/// Path of the detail document for topology `id`.
pub fn topology_path(id: &str) -> String {
    format!("/api/v1/topology/{}", encode_segment(id))
}

// Percent-encode everything outside the RFC 3986 unreserved set
fn encode_segment(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for byte in s.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}

/// Builder for StormUiClient.
#[derive(Debug, Default)]
pub struct StormUiClientBuilder {
    endpoint: Option<String>,
    timeout: Option<Duration>,
}

impl StormUiClientBuilder {
    /// Set the UI address: a host, `host:port`, or a full base URL.
    ///
    /// `http://` is assumed when no scheme is given.
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Set the per-request timeout (default: 5 seconds).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<StormUiClient<HttpTransport>, CollectError> {
        let endpoint = normalize_endpoint(self.endpoint.as_deref().unwrap_or("localhost"));
        let timeout = self.timeout.unwrap_or(DEFAULT_TIMEOUT);

        Ok(StormUiClient::with_transport(HttpTransport::new(
            endpoint, timeout,
        )?))
    }
}

fn normalize_endpoint(endpoint: &str) -> String {
    let endpoint = endpoint.trim().trim_end_matches('/');
    if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
        endpoint.to_string()
    } else {
        format!("http://{}", endpoint)
    }
}
