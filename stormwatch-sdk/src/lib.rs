//! # stormwatch-sdk
//!
//! The gauge catalog and registry behind stormwatch, plus the Prometheus
//! exposition endpoint that serves it.
//!
//! ## Quick Start
//!
//! ```rust
//! use stormwatch_sdk::prometheus::{format_prometheus, DEFAULT_NAMESPACE};
//! use stormwatch_sdk::{Metric, MetricRegistry, MetricValue};
//!
//! let registry = MetricRegistry::new();
//! registry.set(Metric::TasksTotal, &["wc", "wc-1"], MetricValue::Int(4));
//!
//! let text = format_prometheus(&registry, DEFAULT_NAMESPACE);
//! assert!(text.contains("storm_topology_tasks_total{topology_name=\"wc\",topology_id=\"wc-1\"} 4"));
//! ```
//!
//! ## Features
//!
//! - **Fixed catalog**: every gauge and its label schema is known up front
//! - **Snapshot semantics**: setting a series overwrites it, never accumulates
//! - **Thread-safe**: scrapes may run while a collection cycle is writing
//! - **Prometheus endpoint** (`prometheus` feature, on by default)

mod catalog;
mod registry;

#[cfg(feature = "prometheus")]
pub mod prometheus;

pub use catalog::{Metric, MetricGroup};
pub use registry::MetricRegistry;

// Re-export types for convenience
pub use stormwatch_types::MetricValue;
