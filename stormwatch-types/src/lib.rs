//! # stormwatch-types
//!
//! Payload types for the Apache Storm UI REST API and the value sanitizer
//! that turns loosely-typed UI figures into gauge values.
//!
//! ## Design Goals
//!
//! - **Tolerant parsing**: absent sections, `null` lists and unknown fields are
//!   accepted; numbers may arrive as integers, floats or strings
//! - **Late sanitization**: missing fields stay `None` after parsing and only
//!   become `0` when a metric is published
//! - **Type preserving**: integer figures stay integers, floats stay floats
//!
//! ## Example
//!
//! ```rust
//! use stormwatch_types::{sanitize, MetricValue, TopologyDetail};
//!
//! let detail: TopologyDetail = serde_json::from_str(
//!     r#"{"spouts": [{"spoutId": "s1", "emitted": 1000, "acked": null}]}"#,
//! )
//! .unwrap();
//!
//! let spout = &detail.spouts[0];
//! assert_eq!(spout.spout_id(), "s1");
//! assert_eq!(sanitize(spout.emitted.as_ref()), MetricValue::Int(1000));
//! assert_eq!(sanitize(spout.acked.as_ref()), MetricValue::Int(0));
//! ```

mod topology;
mod value;

pub use topology::*;
pub use value::{sanitize, MetricValue, RawValue, NOT_APPLICABLE};
