//! The fixed catalog of published gauges.
//!
//! Every metric belongs to exactly one [`MetricGroup`], which fixes its label
//! schema. The catalog never changes at runtime; only series values do.

/// Label schema shared by all metrics of one source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricGroup {
    /// Fields of the cluster-wide topology listing.
    Summary,
    /// Topology statistics per time window.
    Stats,
    /// Per-spout statistics.
    Spouts,
    /// Per-bolt statistics.
    Bolts,
}

impl MetricGroup {
    /// Label names, in the order label values must be passed.
    pub const fn labels(self) -> &'static [&'static str] {
        match self {
            MetricGroup::Summary => &["topology_name", "topology_id"],
            MetricGroup::Stats => &["topology_name", "topology_id", "window"],
            MetricGroup::Spouts => &["topology_name", "topology_id", "spout_id"],
            MetricGroup::Bolts => &["topology_name", "topology_id", "bolt_id"],
        }
    }
}

macro_rules! catalog {
    ($($variant:ident => $group:ident, $name:literal, $help:literal;)*) => {
        /// A published gauge.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum Metric {
            $($variant,)*
        }

        impl Metric {
            /// Every metric, in exposition order.
            pub const ALL: &'static [Metric] = &[$(Metric::$variant,)*];

            /// Metric name without the namespace prefix.
            pub const fn name(self) -> &'static str {
                match self {
                    $(Metric::$variant => $name,)*
                }
            }

            /// HELP text.
            pub const fn help(self) -> &'static str {
                match self {
                    $(Metric::$variant => $help,)*
                }
            }

            /// Group, and therefore label schema, of this metric.
            pub const fn group(self) -> MetricGroup {
                match self {
                    $(Metric::$variant => MetricGroup::$group,)*
                }
            }
        }
    };
}

catalog! {
    UptimeSeconds => Summary, "uptime_seconds",
        "Shows how long the topology is running in seconds";
    TasksTotal => Summary, "tasks_total",
        "Total number of tasks for this topology";
    WorkersTotal => Summary, "workers_total",
        "Number of workers used for this topology";
    ExecutorsTotal => Summary, "executors_total",
        "Number of executors used for this topology";
    ReplicationCount => Summary, "replication_count",
        "Number of nimbus hosts on which this topology code is replicated";
    RequestedMemOnHeap => Summary, "requested_mem_on_heap",
        "Requested On-Heap Memory by User (MB)";
    RequestedMemOffHeap => Summary, "requested_mem_off_heap",
        "Requested Off-Heap Memory by User (MB)";
    RequestedTotalMem => Summary, "requested_total_mem",
        "Requested Total Memory by User (MB)";
    RequestedCpu => Summary, "requested_cpu",
        "Requested CPU by User (%)";
    AssignedMemOnHeap => Summary, "assigned_mem_on_heap",
        "Assigned On-Heap Memory by Scheduler (MB)";
    AssignedMemOffHeap => Summary, "assigned_mem_off_heap",
        "Assigned Off-Heap Memory by Scheduler (MB)";
    AssignedTotalMem => Summary, "assigned_total_mem",
        "Assigned Total Memory by Scheduler (MB)";
    AssignedCpu => Summary, "assigned_cpu",
        "Assigned CPU by Scheduler (%)";

    StatsTransferred => Stats, "stats_transferred",
        "Number messages transferred in given window";
    StatsEmitted => Stats, "stats_emitted",
        "Number of messages emitted in given window";
    StatsCompleteLatency => Stats, "stats_complete_latency",
        "Total latency for processing the message";
    StatsAcked => Stats, "stats_acked",
        "Number of messages acked in given window";
    StatsFailed => Stats, "stats_failed",
        "Number of messages failed in given window";

    SpoutsExecutors => Spouts, "spouts_executors",
        "Number of executors for the spout";
    SpoutsEmitted => Spouts, "spouts_emitted",
        "Number of messages emitted in given window";
    SpoutsCompleteLatency => Spouts, "spouts_complete_latency",
        "Total latency for processing the message";
    SpoutsTransferred => Spouts, "spouts_transferred",
        "Total number of messages transferred in given window";
    SpoutsTasks => Spouts, "spouts_tasks",
        "Total number of tasks for the spout";
    SpoutsAcked => Spouts, "spouts_acked",
        "Number of messages acked";
    SpoutsFailed => Spouts, "spouts_failed",
        "Number of messages failed";

    BoltsProcessLatency => Bolts, "bolts_process_latency",
        "Average time of the bolt to ack a message after it was received";
    BoltsCapacity => Bolts, "bolts_capacity",
        "This value indicates number of messages executed * average execute latency / time window";
    BoltsExecuteLatency => Bolts, "bolts_execute_latency",
        "Average time to run the execute method of the bolt";
    BoltsExecutors => Bolts, "bolts_executors",
        "Number of executor tasks in the bolt component";
    BoltsTasks => Bolts, "bolts_tasks",
        "Number of instances of bolt";
    BoltsAcked => Bolts, "bolts_acked",
        "Number of tuples acked by the bolt";
    BoltsFailed => Bolts, "bolts_failed",
        "Number of tuples failed by the bolt";
    BoltsEmitted => Bolts, "bolts_emitted",
        "of tuples emitted by the bolt";
}

impl Metric {
    /// Position of this metric in [`Metric::ALL`].
    pub(crate) fn index(self) -> usize {
        self as usize
    }

    /// Label names of this metric.
    pub const fn labels(self) -> &'static [&'static str] {
        self.group().labels()
    }
}
