//! # stormwatch-adapters
//!
//! Storm UI client and the collectors that turn its documents into gauges.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! use stormwatch_adapters::collector::Collector;
//! use stormwatch_adapters::storm::StormUiClient;
//! use stormwatch_sdk::MetricRegistry;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = StormUiClient::builder()
//!         .endpoint("localhost:8080")
//!         .timeout(Duration::from_secs(5))
//!         .build()?;
//!
//!     let registry = Arc::new(MetricRegistry::new());
//!     let collector = Collector::new(client, registry.clone());
//!
//!     let report = collector.collect().await?;
//!     println!("Collected {} topologies", report.topologies);
//!     Ok(())
//! }
//! ```

pub mod collector;
pub mod error;
pub mod storm;
pub mod transport;

pub use collector::{Collector, CycleReport};
pub use error::CollectError;
pub use storm::StormUiClient;
pub use transport::{HttpTransport, UiResponse, UiTransport};

// Re-export types for convenience
pub use stormwatch_types::{TopologyDetail, TopologySummary, TopologySummaryResponse};
