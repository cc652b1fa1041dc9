//! Poll-fetch-publish cycle over the Storm UI.
//!
//! A cycle fetches the topology summary, then for each topology in listing
//! order publishes its summary gauges and fetches its detail document. A
//! failed summary fetch aborts the cycle before anything is written; a failed
//! detail fetch only skips that topology's detail gauges.

mod detail;
mod summary;

use std::sync::Arc;
use std::time::{Duration, Instant};

use stormwatch_sdk::MetricRegistry;
use stormwatch_types::TopologySummary;
use tracing::{debug, error, info};

use crate::storm::StormUiClient;
use crate::transport::{HttpTransport, UiTransport};
use crate::CollectError;

pub use detail::{publish_bolt, publish_detail, publish_spout, publish_window_stats};
pub use summary::publish_summary;

/// Outcome of one successful cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleReport {
    /// Topologies listed in the summary.
    pub topologies: usize,
    /// Topologies whose detail gauges were published.
    pub details_published: usize,
    /// Topologies whose detail fetch failed this cycle.
    pub details_skipped: usize,
    pub elapsed: Duration,
}

/// Publishes Storm UI statistics into a [`MetricRegistry`].
#[derive(Debug)]
pub struct Collector<T = HttpTransport> {
    client: StormUiClient<T>,
    registry: Arc<MetricRegistry>,
}

impl<T: UiTransport> Collector<T> {
    pub fn new(client: StormUiClient<T>, registry: Arc<MetricRegistry>) -> Self {
        Self { client, registry }
    }

    /// The registry gauges are written to.
    pub fn registry(&self) -> &Arc<MetricRegistry> {
        &self.registry
    }

    /// Run one cycle.
    ///
    /// Returns `Err` only when the summary could not be fetched or parsed, in
    /// which case no gauge has been touched.
    pub async fn collect(&self) -> Result<CycleReport, CollectError> {
        let started = Instant::now();

        let summary = self.client.topology_summary().await?;
        info!(
            topologies = summary.topologies.len(),
            "Fetched topology summary"
        );

        let mut report = CycleReport {
            topologies: summary.topologies.len(),
            ..Default::default()
        };

        for topology in &summary.topologies {
            if self.collect_topology(topology).await {
                report.details_published += 1;
            } else {
                report.details_skipped += 1;
            }
        }

        report.elapsed = started.elapsed();
        Ok(report)
    }

    /// Publish one topology's summary gauges, then its detail gauges.
    ///
    /// Returns whether the detail gauges were published.
    pub async fn collect_topology(&self, topology: &TopologySummary) -> bool {
        publish_summary(&self.registry, topology);
        self.collect_detail(topology.name(), topology.id()).await
    }

    /// Fetch and publish the detail document of one topology.
    ///
    /// Failures are logged and reported as `false`; gauges of a skipped
    /// topology keep their previous values.
    pub async fn collect_detail(&self, name: &str, id: &str) -> bool {
        debug!(topology_name = name, topology_id = id, "Fetching topology detail");

        match self.client.topology(id).await {
            Ok(detail) => {
                publish_detail(&self.registry, name, id, &detail);
                true
            }
            Err(CollectError::Timeout) => {
                error!(
                    topology_name = name,
                    topology_id = id,
                    "Timed out fetching topology detail"
                );
                false
            }
            Err(err) => {
                error!(
                    topology_name = name,
                    topology_id = id,
                    error = %err,
                    "Failed to fetch topology detail"
                );
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storm::topology_path;
    use crate::transport::UiResponse;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use stormwatch_sdk::prometheus::{format_prometheus, DEFAULT_NAMESPACE};
    use stormwatch_sdk::{Metric, MetricValue};

    #[derive(Default)]
    struct FakeTransport {
        routes: Mutex<HashMap<String, Result<UiResponse, CollectError>>>,
        requests: Mutex<Vec<String>>,
    }

    impl FakeTransport {
        fn route(self, path: &str, response: Result<UiResponse, CollectError>) -> Self {
            self.routes
                .lock()
                .unwrap()
                .insert(path.to_string(), response);
            self
        }

        fn summary(self, body: &str) -> Self {
            self.route(crate::storm::SUMMARY_PATH, Ok(UiResponse::json(body)))
        }

        fn detail(self, id: &str, response: Result<UiResponse, CollectError>) -> Self {
            self.route(&topology_path(id), response)
        }

        fn set_summary(&self, body: &str) {
            self.routes.lock().unwrap().insert(
                crate::storm::SUMMARY_PATH.to_string(),
                Ok(UiResponse::json(body)),
            );
        }
    }

    #[async_trait]
    impl UiTransport for FakeTransport {
        async fn get(&self, path: &str) -> Result<UiResponse, CollectError> {
            self.requests.lock().unwrap().push(path.to_string());
            self.routes
                .lock()
                .unwrap()
                .get(path)
                .cloned()
                .unwrap_or(Ok(UiResponse {
                    status: 404,
                    content_type: None,
                    body: Vec::new(),
                }))
        }
    }

    fn collector(transport: FakeTransport) -> Collector<FakeTransport> {
        Collector::new(
            StormUiClient::with_transport(transport),
            Arc::new(MetricRegistry::new()),
        )
    }

    const WC_SUMMARY: &str =
        r#"{"topologies":[{"name":"wc","id":"wc-1","uptimeSeconds":120,"tasksTotal":4}]}"#;

    const WC_DETAIL: &str = r#"{
        "topologyStats": [{"window": "600", "emitted": 50, "acked": 40}],
        "spouts": [{"spoutId": "s1", "emitted": 1000, "acked": null}],
        "bolts": [{"boltId": "count", "capacity": "0.5", "executed": 99}]
    }"#;

    #[tokio::test]
    async fn test_end_to_end_cycle() {
        let collector = collector(
            FakeTransport::default()
                .summary(WC_SUMMARY)
                .detail("wc-1", Ok(UiResponse::json(WC_DETAIL))),
        );

        let report = collector.collect().await.unwrap();
        assert_eq!(report.topologies, 1);
        assert_eq!(report.details_published, 1);
        assert_eq!(report.details_skipped, 0);

        let registry = collector.registry();
        assert_eq!(
            registry.get(Metric::UptimeSeconds, &["wc", "wc-1"]),
            Some(MetricValue::Int(120))
        );
        assert_eq!(
            registry.get(Metric::TasksTotal, &["wc", "wc-1"]),
            Some(MetricValue::Int(4))
        );
        assert_eq!(
            registry.get(Metric::SpoutsEmitted, &["wc", "wc-1", "s1"]),
            Some(MetricValue::Int(1000))
        );
        assert_eq!(
            registry.get(Metric::SpoutsAcked, &["wc", "wc-1", "s1"]),
            Some(MetricValue::Int(0))
        );
        assert_eq!(
            registry.get(Metric::StatsEmitted, &["wc", "wc-1", "600"]),
            Some(MetricValue::Int(50))
        );
        assert_eq!(
            registry.get(Metric::BoltsCapacity, &["wc", "wc-1", "count"]),
            Some(MetricValue::Float(0.5))
        );
    }

    #[tokio::test]
    async fn detail_timeout_only_skips_that_topology() {
        let summary = r#"{"topologies":[
            {"name":"a","id":"a-1","uptimeSeconds":10},
            {"name":"b","id":"b-1","uptimeSeconds":20}
        ]}"#;
        let transport = FakeTransport::default()
            .summary(summary)
            .detail("a-1", Err(CollectError::Timeout))
            .detail("b-1", Ok(UiResponse::json(WC_DETAIL)));
        let collector = collector(transport);

        let report = collector.collect().await.unwrap();
        assert_eq!(report.topologies, 2);
        assert_eq!(report.details_published, 1);
        assert_eq!(report.details_skipped, 1);

        let registry = collector.registry();
        assert_eq!(
            registry.get(Metric::UptimeSeconds, &["a", "a-1"]),
            Some(MetricValue::Int(10))
        );
        assert_eq!(registry.get(Metric::SpoutsEmitted, &["a", "a-1", "s1"]), None);
        assert_eq!(
            registry.get(Metric::SpoutsEmitted, &["b", "b-1", "s1"]),
            Some(MetricValue::Int(1000))
        );
    }

    #[tokio::test]
    async fn topologies_are_fetched_in_listing_order() {
        let summary = r#"{"topologies":[{"name":"z","id":"z-1"},{"name":"a","id":"a-1"}]}"#;
        let collector = collector(FakeTransport::default().summary(summary));

        collector.collect().await.unwrap();

        let requests = collector.client.transport().requests.lock().unwrap().clone();
        assert_eq!(
            requests,
            vec![
                "/api/v1/topology/summary".to_string(),
                "/api/v1/topology/z-1".to_string(),
                "/api/v1/topology/a-1".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn summary_failure_aborts_cycle() {
        let transport = FakeTransport::default()
            .route(crate::storm::SUMMARY_PATH, Err(CollectError::Timeout));
        let collector = collector(transport);

        let err = collector.collect().await.unwrap_err();
        assert!(matches!(err, CollectError::Timeout));
        assert!(collector.registry().is_empty());
    }

    #[tokio::test]
    async fn summary_error_status_aborts_cycle() {
        let transport = FakeTransport::default().route(
            crate::storm::SUMMARY_PATH,
            Ok(UiResponse {
                status: 500,
                ..UiResponse::json("{}")
            }),
        );
        let collector = collector(transport);

        let err = collector.collect().await.unwrap_err();
        assert!(matches!(err, CollectError::Status(500)));
        assert!(collector.registry().is_empty());
    }

    #[tokio::test]
    async fn unparseable_summary_aborts_cycle() {
        let collector = collector(FakeTransport::default().summary("<html>oops</html>"));

        let err = collector.collect().await.unwrap_err();
        assert!(matches!(err, CollectError::Parse(_)));
        assert!(collector.registry().is_empty());
    }

    #[tokio::test]
    async fn non_json_detail_is_skipped() {
        let transport = FakeTransport::default().summary(WC_SUMMARY).detail(
            "wc-1",
            Ok(UiResponse {
                content_type: Some("text/html".to_string()),
                ..UiResponse::json(WC_DETAIL)
            }),
        );
        let collector = collector(transport);

        let report = collector.collect().await.unwrap();
        assert_eq!(report.details_skipped, 1);

        let registry = collector.registry();
        assert_eq!(
            registry.get(Metric::UptimeSeconds, &["wc", "wc-1"]),
            Some(MetricValue::Int(120))
        );
        for metric in Metric::ALL {
            if metric.labels().len() == 3 {
                assert_eq!(registry.series_count(*metric), 0, "{}", metric.name());
            }
        }
    }

    #[derive(Clone, Default)]
    struct LogBuffer(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn non_json_detail_logs_one_error() {
        let logs = LogBuffer::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer({
                let logs = logs.clone();
                move || logs.clone()
            })
            .with_ansi(false)
            .without_time()
            .with_max_level(tracing::Level::DEBUG)
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let transport = FakeTransport::default().summary(WC_SUMMARY).detail(
            "wc-1",
            Ok(UiResponse {
                content_type: Some("text/html".to_string()),
                ..UiResponse::json(WC_DETAIL)
            }),
        );
        collector(transport).collect().await.unwrap();

        let output = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
        let errors: Vec<&str> = output
            .lines()
            .filter(|line| line.trim_start().starts_with("ERROR"))
            .collect();
        assert_eq!(errors.len(), 1, "{}", output);
        assert!(errors[0].contains("wc-1"), "{}", errors[0]);
        assert!(errors[0].contains("text/html"), "{}", errors[0]);
    }

    #[tokio::test]
    async fn malformed_detail_is_skipped() {
        let transport = FakeTransport::default()
            .summary(WC_SUMMARY)
            .detail("wc-1", Ok(UiResponse::json("{\"spouts\": [")));
        let collector = collector(transport);

        let report = collector.collect().await.unwrap();
        assert_eq!(report.details_published, 0);
        assert_eq!(report.details_skipped, 1);
        assert_eq!(collector.registry().series_count(Metric::SpoutsEmitted), 0);
    }

    #[tokio::test]
    async fn missing_detail_is_skipped() {
        let collector = collector(FakeTransport::default().summary(WC_SUMMARY));

        let report = collector.collect().await.unwrap();
        assert_eq!(report.details_skipped, 1);
        assert_eq!(collector.registry().len(), 13);
    }

    #[tokio::test]
    async fn repeated_cycles_are_idempotent() {
        let collector = collector(
            FakeTransport::default()
                .summary(WC_SUMMARY)
                .detail("wc-1", Ok(UiResponse::json(WC_DETAIL))),
        );

        collector.collect().await.unwrap();
        let first = format_prometheus(collector.registry(), DEFAULT_NAMESPACE);
        collector.collect().await.unwrap();
        let second = format_prometheus(collector.registry(), DEFAULT_NAMESPACE);

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn vanished_topology_keeps_last_values() {
        let transport = FakeTransport::default()
            .summary(WC_SUMMARY)
            .detail("wc-1", Ok(UiResponse::json(WC_DETAIL)));
        let collector = collector(transport);

        collector.collect().await.unwrap();
        collector
            .client
            .transport()
            .set_summary(r#"{"topologies":[]}"#);
        let report = collector.collect().await.unwrap();

        assert_eq!(report.topologies, 0);
        assert_eq!(
            collector.registry().get(Metric::UptimeSeconds, &["wc", "wc-1"]),
            Some(MetricValue::Int(120))
        );
        assert_eq!(
            collector
                .registry()
                .get(Metric::SpoutsEmitted, &["wc", "wc-1", "s1"]),
            Some(MetricValue::Int(1000))
        );
    }

    #[tokio::test]
    async fn failed_detail_keeps_previous_values() {
        let transport = FakeTransport::default()
            .summary(WC_SUMMARY)
            .detail("wc-1", Ok(UiResponse::json(WC_DETAIL)));
        let collector = collector(transport);
        collector.collect().await.unwrap();

        collector
            .client
            .transport()
            .routes
            .lock()
            .unwrap()
            .insert(topology_path("wc-1"), Err(CollectError::Timeout));
        let report = collector.collect().await.unwrap();

        assert_eq!(report.details_skipped, 1);
        assert_eq!(
            collector
                .registry()
                .get(Metric::SpoutsEmitted, &["wc", "wc-1", "s1"]),
            Some(MetricValue::Int(1000))
        );
    }

    #[tokio::test]
    async fn window_labels_are_kept_verbatim() {
        let detail = r#"{"topologyStats": [{"window": "10m00s", "acked": 1}, {"acked": 2}]}"#;
        let collector = collector(
            FakeTransport::default()
                .summary(WC_SUMMARY)
                .detail("wc-1", Ok(UiResponse::json(detail))),
        );

        collector.collect().await.unwrap();

        let registry = collector.registry();
        assert_eq!(
            registry.get(Metric::StatsAcked, &["wc", "wc-1", "10m00s"]),
            Some(MetricValue::Int(1))
        );
        assert_eq!(
            registry.get(Metric::StatsAcked, &["wc", "wc-1", "N/A"]),
            Some(MetricValue::Int(2))
        );
    }
}
