use stormwatch_sdk::{Metric, MetricRegistry};
use stormwatch_types::{sanitize, BoltStats, SpoutStats, TopologyDetail, WindowStats};

/// Publish the windowed stats, spouts and bolts of one topology.
pub fn publish_detail(registry: &MetricRegistry, name: &str, id: &str, detail: &TopologyDetail) {
    for stats in &detail.topology_stats {
        publish_window_stats(registry, name, id, stats);
    }
    for spout in &detail.spouts {
        publish_spout(registry, name, id, spout);
    }
    for bolt in &detail.bolts {
        publish_bolt(registry, name, id, bolt);
    }
}

pub fn publish_window_stats(
    registry: &MetricRegistry,
    name: &str,
    id: &str,
    stats: &WindowStats,
) {
    let labels = [name, id, stats.window()];

    let fields = [
        (Metric::StatsTransferred, &stats.transferred),
        (Metric::StatsEmitted, &stats.emitted),
        (Metric::StatsCompleteLatency, &stats.complete_latency),
        (Metric::StatsAcked, &stats.acked),
        (Metric::StatsFailed, &stats.failed),
    ];
    for (metric, raw) in fields {
        registry.set(metric, &labels, sanitize(raw.as_ref()));
    }
}

pub fn publish_spout(registry: &MetricRegistry, name: &str, id: &str, spout: &SpoutStats) {
    let labels = [name, id, spout.spout_id()];

    let fields = [
        (Metric::SpoutsExecutors, &spout.executors),
        (Metric::SpoutsEmitted, &spout.emitted),
        (Metric::SpoutsCompleteLatency, &spout.complete_latency),
        (Metric::SpoutsTransferred, &spout.transferred),
        (Metric::SpoutsTasks, &spout.tasks),
        (Metric::SpoutsAcked, &spout.acked),
        (Metric::SpoutsFailed, &spout.failed),
    ];
    for (metric, raw) in fields {
        registry.set(metric, &labels, sanitize(raw.as_ref()));
    }
}

pub fn publish_bolt(registry: &MetricRegistry, name: &str, id: &str, bolt: &BoltStats) {
    let labels = [name, id, bolt.bolt_id()];

    let fields = [
        (Metric::BoltsProcessLatency, &bolt.process_latency),
        (Metric::BoltsCapacity, &bolt.capacity),
        (Metric::BoltsExecuteLatency, &bolt.execute_latency),
        (Metric::BoltsExecutors, &bolt.executors),
        (Metric::BoltsTasks, &bolt.tasks),
        (Metric::BoltsAcked, &bolt.acked),
        (Metric::BoltsFailed, &bolt.failed),
        (Metric::BoltsEmitted, &bolt.emitted),
    ];
    for (metric, raw) in fields {
        registry.set(metric, &labels, sanitize(raw.as_ref()));
    }
}
