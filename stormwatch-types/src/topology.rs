//! Documents served by the Storm UI REST API.
//!
//! Only the fields that feed published metrics are modelled; everything else
//! in the payload is ignored. Every numeric field is kept as the raw value the
//! UI sent so that sanitization happens when a metric is published, not here.

use serde::Deserialize;

use crate::value::{null_as_empty, optional_label};
use crate::{RawValue, NOT_APPLICABLE};

/// Response of `GET /api/v1/topology/summary`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct TopologySummaryResponse {
    /// Topologies in the order the UI listed them.
    #[serde(deserialize_with = "null_as_empty")]
    pub topologies: Vec<TopologySummary>,
}

/// One entry of the cluster-wide topology listing.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TopologySummary {
    #[serde(deserialize_with = "optional_label")]
    pub name: Option<String>,
    #[serde(deserialize_with = "optional_label")]
    pub id: Option<String>,
    pub uptime_seconds: Option<RawValue>,
    pub tasks_total: Option<RawValue>,
    pub workers_total: Option<RawValue>,
    pub executors_total: Option<RawValue>,
    pub replication_count: Option<RawValue>,
    pub requested_mem_on_heap: Option<RawValue>,
    pub requested_mem_off_heap: Option<RawValue>,
    pub requested_total_mem: Option<RawValue>,
    pub requested_cpu: Option<RawValue>,
    pub assigned_mem_on_heap: Option<RawValue>,
    pub assigned_mem_off_heap: Option<RawValue>,
    pub assigned_total_mem: Option<RawValue>,
    pub assigned_cpu: Option<RawValue>,
}

impl TopologySummary {
    /// Topology name, or `"N/A"` when the UI omitted it.
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or(NOT_APPLICABLE)
    }

    /// Topology id, or `"N/A"` when the UI omitted it.
    pub fn id(&self) -> &str {
        self.id.as_deref().unwrap_or(NOT_APPLICABLE)
    }
}

/// Response of `GET /api/v1/topology/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TopologyDetail {
    /// Topology-wide statistics, one entry per window.
    #[serde(deserialize_with = "null_as_empty")]
    pub topology_stats: Vec<WindowStats>,
    #[serde(deserialize_with = "null_as_empty")]
    pub spouts: Vec<SpoutStats>,
    #[serde(deserialize_with = "null_as_empty")]
    pub bolts: Vec<BoltStats>,
}

impl TopologyDetail {
    /// True if the document carries no stats, spouts or bolts.
    pub fn is_empty(&self) -> bool {
        self.topology_stats.is_empty() && self.spouts.is_empty() && self.bolts.is_empty()
    }
}

/// Topology statistics aggregated over one time window.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WindowStats {
    #[serde(deserialize_with = "optional_label")]
    pub window: Option<String>,
    pub transferred: Option<RawValue>,
    pub emitted: Option<RawValue>,
    pub complete_latency: Option<RawValue>,
    pub acked: Option<RawValue>,
    pub failed: Option<RawValue>,
}

impl WindowStats {
    /// Window identifier, or `"N/A"` when absent.
    pub fn window(&self) -> &str {
        self.window.as_deref().unwrap_or(NOT_APPLICABLE)
    }
}

/// Statistics for one spout of a topology.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SpoutStats {
    #[serde(deserialize_with = "optional_label")]
    pub spout_id: Option<String>,
    pub executors: Option<RawValue>,
    pub emitted: Option<RawValue>,
    pub complete_latency: Option<RawValue>,
    pub transferred: Option<RawValue>,
    pub tasks: Option<RawValue>,
    pub acked: Option<RawValue>,
    pub failed: Option<RawValue>,
}

impl SpoutStats {
    /// Spout id, or `"N/A"` when absent.
    pub fn spout_id(&self) -> &str {
        self.spout_id.as_deref().unwrap_or(NOT_APPLICABLE)
    }
}

/// Statistics for one bolt of a topology.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BoltStats {
    #[serde(deserialize_with = "optional_label")]
    pub bolt_id: Option<String>,
    pub process_latency: Option<RawValue>,
    pub capacity: Option<RawValue>,
    pub execute_latency: Option<RawValue>,
    pub executors: Option<RawValue>,
    pub tasks: Option<RawValue>,
    pub acked: Option<RawValue>,
    pub failed: Option<RawValue>,
    pub emitted: Option<RawValue>,
}

impl BoltStats {
    /// Bolt id, or `"N/A"` when absent.
    pub fn bolt_id(&self) -> &str {
        self.bolt_id.as_deref().unwrap_or(NOT_APPLICABLE)
    }
}
