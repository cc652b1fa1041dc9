//! Process-wide storage for the current value of every published series.

use std::collections::BTreeMap;

use parking_lot::RwLock;
use stormwatch_types::MetricValue;

use crate::catalog::Metric;

/// All series of one metric, keyed by label values.
#[derive(Debug, Default)]
struct GaugeFamily {
    series: RwLock<BTreeMap<Vec<String>, MetricValue>>,
}

/// Thread-safe registry of labeled gauges.
///
/// Writing a series replaces its previous value; nothing is ever
/// accumulated or removed. Readers (the exposition endpoint) may run while a
/// collection cycle is writing: every series is read either before or after
/// a given write, never in between.
///
/// # Example
///
/// ```rust
/// use stormwatch_sdk::{Metric, MetricRegistry, MetricValue};
///
/// let registry = MetricRegistry::new();
/// registry.set(Metric::UptimeSeconds, &["wc", "wc-1"], 120_i64);
/// registry.set(Metric::UptimeSeconds, &["wc", "wc-1"], 150_i64);
///
/// assert_eq!(
///     registry.get(Metric::UptimeSeconds, &["wc", "wc-1"]),
///     Some(MetricValue::Int(150))
/// );
/// ```
#[derive(Debug)]
pub struct MetricRegistry {
    families: Vec<GaugeFamily>,
}

impl MetricRegistry {
    /// Create a registry with an empty family for every catalog metric.
    pub fn new() -> Self {
        Self {
            families: Metric::ALL.iter().map(|_| GaugeFamily::default()).collect(),
        }
    }

    /// Set the value of one series, creating it on first use.
    ///
    /// `labels` must match the metric's label schema in arity; a mismatched
    /// call is logged and dropped.
    pub fn set(&self, metric: Metric, labels: &[&str], value: impl Into<MetricValue>) {
        let expected = metric.labels().len();
        if labels.len() != expected {
            tracing::warn!(
                metric = metric.name(),
                expected,
                got = labels.len(),
                "Dropping update with wrong label count"
            );
            return;
        }

        let key = labels.iter().map(|l| l.to_string()).collect();
        self.family(metric).series.write().insert(key, value.into());
    }

    /// Current value of one series, if it has ever been set.
    pub fn get(&self, metric: Metric, labels: &[&str]) -> Option<MetricValue> {
        let key: Vec<String> = labels.iter().map(|l| l.to_string()).collect();
        self.family(metric).series.read().get(&key).copied()
    }

    /// Number of series of one metric.
    pub fn series_count(&self, metric: Metric) -> usize {
        self.family(metric).series.read().len()
    }

    /// Total number of series across all metrics.
    pub fn len(&self) -> usize {
        Metric::ALL.iter().map(|m| self.series_count(*m)).sum()
    }

    /// True if no series has been set yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Visit every series of one metric in label order.
    ///
    /// The family stays read-locked for the duration of the visit.
    pub fn visit<F>(&self, metric: Metric, mut f: F)
    where
        F: FnMut(&[String], MetricValue),
    {
        for (labels, value) in self.family(metric).series.read().iter() {
            f(labels, *value);
        }
    }

    fn family(&self, metric: Metric) -> &GaugeFamily {
        &self.families[metric.index()]
    }
}

impl Default for MetricRegistry {
    fn default() -> Self {
        Self::new()
    }
}
