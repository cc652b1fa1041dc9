use stormwatch_sdk::{Metric, MetricRegistry};
use stormwatch_types::{sanitize, RawValue, TopologySummary};

/// Publish every summary-level field of one topology under (name, id).
pub fn publish_summary(registry: &MetricRegistry, topology: &TopologySummary) {
    let labels = [topology.name(), topology.id()];

    for (metric, raw) in summary_fields(topology) {
        registry.set(metric, &labels, sanitize(raw.as_ref()));
    }
}

fn summary_fields(t: &TopologySummary) -> [(Metric, &Option<RawValue>); 13] {
    [
        (Metric::UptimeSeconds, &t.uptime_seconds),
        (Metric::TasksTotal, &t.tasks_total),
        (Metric::WorkersTotal, &t.workers_total),
        (Metric::ExecutorsTotal, &t.executors_total),
        (Metric::ReplicationCount, &t.replication_count),
        (Metric::RequestedMemOnHeap, &t.requested_mem_on_heap),
        (Metric::RequestedMemOffHeap, &t.requested_mem_off_heap),
        (Metric::RequestedTotalMem, &t.requested_total_mem),
        (Metric::RequestedCpu, &t.requested_cpu),
        (Metric::AssignedMemOnHeap, &t.assigned_mem_on_heap),
        (Metric::AssignedMemOffHeap, &t.assigned_mem_off_heap),
        (Metric::AssignedTotalMem, &t.assigned_total_mem),
        (Metric::AssignedCpu, &t.assigned_cpu),
    ]
}
