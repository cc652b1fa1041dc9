//! # stormwatch
//!
//! Prometheus exporter for Apache Storm.
//!
//! Polls the Storm UI REST API on a fixed interval and republishes
//! cluster, topology, spout and bolt statistics as labeled gauges.
//!
//! ```text
//! ┌──────────┐  GET /api/v1/...  ┌───────────┐  set()  ┌──────────┐  GET /metrics
//! │ Storm UI │ ◀──────────────── │ Collector │ ──────▶ │ Registry │ ◀──────────── Prometheus
//! └──────────┘                   └─────▲─────┘         └──────────┘
//!                                      │ every refresh_rate seconds
//!                                 ┌────┴───┐
//!                                 │ Poller │
//!                                 └────────┘
//! ```
//!
//! - **[`settings`]**: defaults, TOML file, environment and flags
//! - **[`logging`]**: level mapping and subscriber setup
//! - **[`poller`]**: the collection loop

pub mod logging;
pub mod poller;
pub mod settings;

pub use poller::{CollectionCycle, Poller, PollerHandle};
pub use settings::{Args, Settings};
