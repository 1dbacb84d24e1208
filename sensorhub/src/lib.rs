// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]
//! # sensorhub
//!
//! Real-time fan-out of scalar sensor readings with per-sensor windowed
//! analytics and threshold alerts.
//!
//! ## Overview
//!
//! External acquisition layers (bricklet pollers, BLE tags, HTTP ingestion)
//! push raw `(sensor_id, value, timestamp)` observations into a
//! [`SensorHub`]. Each observation is enriched by the analytics engine —
//! moving average over a sliding window, first-crossing threshold alert,
//! optional trend-based early warning — serialized once, and broadcast to
//! every live subscriber. Transport layers (one subscription per client
//! connection) forward the delivered payloads to the network and
//! unsubscribe on disconnect.
//!
//! Delivery is best-effort, at-most-once: a slow subscriber loses items
//! from its own bounded queue and never stalls ingestion or its siblings.
//!
//! ## Quick Start
//!
//! ```
//! use chrono::Utc;
//! use sensorhub::{AnalyticsConfig, SensorHub};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> anyhow::Result<()> {
//! let hub = SensorHub::new(AnalyticsConfig {
//!     window_size: 2,
//!     min_accepted: 18.0,
//!     ..AnalyticsConfig::default()
//! })?;
//!
//! let subscription = hub.subscribe()?;
//!
//! hub.ingest("thermo-1", 21.0, Utc::now())?;
//! hub.ingest("thermo-1", 22.0, Utc::now())?;
//!
//! let payload = subscription.recv().await.expect("delivered");
//! assert!(payload.contains("\"sensor_id\":\"thermo-1\""));
//! # Ok(())
//! # }
//! ```

pub mod hub;

pub use self::hub::{Payload, SensorHub};

// Re-export the public surface of the member crates.
pub use sensorhub_analytics::AnalyticsEngine;
pub use sensorhub_broker::{Broker, SubscriberId, Subscription, DEFAULT_QUEUE_CAPACITY};
pub use sensorhub_core::{
    AlertMark, AnalyticsConfig, BrokerError, HubError, Reading, Result, TrendConfig,
    TrendEstimate,
};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::hub::{Payload, SensorHub};
    pub use sensorhub_core::{AnalyticsConfig, HubError, Reading, Result, TrendConfig};
}
