//! Prometheus exposition format support.
//!
//! This module renders the [`MetricRegistry`] in the Prometheus text-based
//! exposition format and serves it over HTTP so it can be scraped by
//! Prometheus or compatible monitoring systems.
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use stormwatch_sdk::prometheus::{PrometheusConfig, PrometheusExporter};
//! use stormwatch_sdk::MetricRegistry;
//!
//! #[tokio::main]
//! async fn main() -> std::io::Result<()> {
//!     let config = PrometheusConfig::builder()
//!         .listen_addr("0.0.0.0:9800")
//!         .metrics_path("/metrics")
//!         .build();
//!
//!     let registry = Arc::new(MetricRegistry::new());
//!     let exporter = PrometheusExporter::new(config, registry);
//!     let server = exporter.start_server().await?;
//!
//!     // Metrics available at http://localhost:9800/metrics
//!     println!("listening on {}", server.local_addr());
//!     Ok(())
//! }
//! ```

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{HeaderValue, CONTENT_TYPE};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use stormwatch_types::MetricValue;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use crate::catalog::Metric;
use crate::registry::MetricRegistry;

/// Prefix shared by every published metric name.
pub const DEFAULT_NAMESPACE: &str = "storm_topology";

const EXPOSITION_CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

/// Configuration for the Prometheus metrics endpoint.
#[derive(Debug, Clone)]
pub struct PrometheusConfig {
    /// Address to listen on (e.g., "0.0.0.0:9800")
    pub listen_addr: String,
    /// Path for metrics endpoint (e.g., "/metrics")
    pub metrics_path: String,
    /// Prefix for all metric names; empty for none
    pub namespace: String,
}

impl Default for PrometheusConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:9800".to_string(),
            metrics_path: "/metrics".to_string(),
            namespace: DEFAULT_NAMESPACE.to_string(),
        }
    }
}

impl PrometheusConfig {
    /// Create a new builder for PrometheusConfig.
    pub fn builder() -> PrometheusConfigBuilder {
        PrometheusConfigBuilder::default()
    }
}

/// Builder for PrometheusConfig.
#[derive(Debug, Default)]
pub struct PrometheusConfigBuilder {
    listen_addr: Option<String>,
    metrics_path: Option<String>,
    namespace: Option<String>,
}

impl PrometheusConfigBuilder {
    /// Set the listen address.
    pub fn listen_addr(mut self, addr: impl Into<String>) -> Self {
        self.listen_addr = Some(addr.into());
        self
    }

    /// Set the metrics path.
    pub fn metrics_path(mut self, path: impl Into<String>) -> Self {
        self.metrics_path = Some(path.into());
        self
    }

    /// Set the namespace prefix for all metrics.
    pub fn namespace(mut self, ns: impl Into<String>) -> Self {
        self.namespace = Some(ns.into());
        self
    }

    /// Build the PrometheusConfig.
    pub fn build(self) -> PrometheusConfig {
        let defaults = PrometheusConfig::default();
        PrometheusConfig {
            listen_addr: self.listen_addr.unwrap_or(defaults.listen_addr),
            metrics_path: self.metrics_path.unwrap_or(defaults.metrics_path),
            namespace: self.namespace.unwrap_or(defaults.namespace),
        }
    }
}

/// Prometheus exporter that serves a [`MetricRegistry`] over HTTP.
#[derive(Debug, Clone)]
pub struct PrometheusExporter {
    config: PrometheusConfig,
    registry: Arc<MetricRegistry>,
}

impl PrometheusExporter {
    /// Create a new Prometheus exporter reading from `registry`.
    pub fn new(config: PrometheusConfig, registry: Arc<MetricRegistry>) -> Self {
        Self { config, registry }
    }

    /// Get the configuration.
    pub fn config(&self) -> &PrometheusConfig {
        &self.config
    }

    /// Get the registry being served.
    pub fn registry(&self) -> &Arc<MetricRegistry> {
        &self.registry
    }

    /// Get the current metrics in Prometheus exposition format.
    pub fn render(&self) -> String {
        format_prometheus(&self.registry, &self.config.namespace)
    }

    /// Bind the listen address and start serving metrics.
    ///
    /// Binding happens before this returns, so an unavailable port is
    /// reported to the caller. The accept loop then runs on a background
    /// task until the runtime shuts down or the handle is aborted.
    pub async fn start_server(&self) -> std::io::Result<ServerHandle> {
        let listener = TcpListener::bind(self.config.listen_addr.as_str()).await?;
        let local_addr = listener.local_addr()?;

        let metrics_path: Arc<str> = Arc::from(self.config.metrics_path.as_str());
        let namespace: Arc<str> = Arc::from(self.config.namespace.as_str());
        let registry = self.registry.clone();

        let task = tokio::spawn(run_server(listener, metrics_path, namespace, registry));

        Ok(ServerHandle { local_addr, task })
    }
}

/// Handle to a running metrics server.
#[derive(Debug)]
pub struct ServerHandle {
    local_addr: SocketAddr,
    task: JoinHandle<()>,
}

impl ServerHandle {
    /// Address the server is bound to.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Stop accepting connections.
    pub fn abort(&self) {
        self.task.abort();
    }
}

async fn run_server(
    listener: TcpListener,
    metrics_path: Arc<str>,
    namespace: Arc<str>,
    registry: Arc<MetricRegistry>,
) {
    loop {
        let (stream, peer) = match listener.accept().await {
            Ok(conn) => conn,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to accept metrics connection");
                continue;
            }
        };
        let io = TokioIo::new(stream);

        let metrics_path = metrics_path.clone();
        let namespace = namespace.clone();
        let registry = registry.clone();

        tokio::spawn(async move {
            let service = service_fn(move |req: Request<hyper::body::Incoming>| {
                let response = handle_request(&req, &metrics_path, &namespace, &registry);
                async move { Ok::<_, Infallible>(response) }
            });

            if let Err(e) = http1::Builder::new().serve_connection(io, service).await {
                tracing::debug!(%peer, error = %e, "Metrics connection error");
            }
        });
    }
}

fn handle_request<B>(
    req: &Request<B>,
    metrics_path: &str,
    namespace: &str,
    registry: &MetricRegistry,
) -> Response<Full<Bytes>> {
    let path = req.uri().path();

    if path == metrics_path {
        text_response(
            StatusCode::OK,
            EXPOSITION_CONTENT_TYPE,
            format_prometheus(registry, namespace),
        )
    } else if path == "/health" || path == "/healthz" {
        text_response(StatusCode::OK, "text/plain", "OK".to_string())
    } else {
        text_response(StatusCode::NOT_FOUND, "text/plain", "Not Found".to_string())
    }
}

fn text_response(
    status: StatusCode,
    content_type: &'static str,
    body: String,
) -> Response<Full<Bytes>> {
    let mut response = Response::new(Full::new(Bytes::from(body)));
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
    response
}

/// Format the registry as Prometheus exposition format.
///
/// Every catalog metric gets HELP and TYPE lines, followed by one line per
/// series that has been set.
pub fn format_prometheus(registry: &MetricRegistry, namespace: &str) -> String {
    let mut output = String::new();

    for metric in Metric::ALL {
        let name = metric_name(namespace, *metric);
        let label_names = metric.labels();

        output.push_str(&format!("# HELP {} {}\n", name, metric.help()));
        output.push_str(&format!("# TYPE {} gauge\n", name));

        registry.visit(*metric, |label_values, value| {
            let labels = label_names
                .iter()
                .zip(label_values)
                .map(|(k, v)| format!("{}=\"{}\"", k, escape_label_value(v)))
                .collect::<Vec<_>>()
                .join(",");

            output.push_str(&format!("{}{{{}}} {}\n", name, labels, format_value(value)));
        });
    }

    output
}

fn metric_name(namespace: &str, metric: Metric) -> String {
    if namespace.is_empty() {
        metric.name().to_string()
    } else {
        format!("{}_{}", namespace, metric.name())
    }
}

/// Render a sample value, spelling non-finite floats the Prometheus way.
fn format_value(value: MetricValue) -> String {
    match value {
        MetricValue::Int(v) => v.to_string(),
        MetricValue::Float(v) if v.is_nan() => "NaN".to_string(),
        MetricValue::Float(v) if v.is_infinite() && v > 0.0 => "+Inf".to_string(),
        MetricValue::Float(v) if v.is_infinite() => "-Inf".to_string(),
        MetricValue::Float(v) => v.to_string(),
    }
}

/// Escape a label value for Prometheus format.
/// Backslash, double-quote, and newline must be escaped.
fn escape_label_value(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}
