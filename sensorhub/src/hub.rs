// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! The ingest → enrich → broadcast pipeline.

use chrono::{DateTime, Utc};
use sensorhub_analytics::AnalyticsEngine;
use sensorhub_broker::{Broker, SubscriberId, Subscription, DEFAULT_QUEUE_CAPACITY};
use sensorhub_core::{AnalyticsConfig, Result};
use std::sync::Arc;

/// The serialized form of one enriched reading, shared across subscribers.
///
/// Serialization happens once per publish; every subscriber receives a
/// cheap clone of the same payload.
pub type Payload = Arc<str>;

/// Ties the analytics engine and the broadcast broker into one pipeline.
///
/// [`ingest`](Self::ingest) runs the full control flow of the system: the
/// raw observation updates the sensor's window state, the enriched reading
/// is serialized once, and the payload is delivered to every live
/// subscriber. Subscribers attach and detach independently of ingestion.
pub struct SensorHub {
    engine: AnalyticsEngine,
    broker: Broker<Payload>,
}

impl SensorHub {
    /// Creates a hub with the default per-subscriber queue depth.
    ///
    /// # Errors
    ///
    /// Returns [`HubError::InvalidConfig`](sensorhub_core::HubError) for an
    /// invalid analytics configuration.
    pub fn new(config: AnalyticsConfig) -> Result<Self> {
        Self::with_capacity(config, DEFAULT_QUEUE_CAPACITY)
    }

    /// Creates a hub whose subscribers each buffer up to `capacity`
    /// undelivered payloads.
    ///
    /// # Errors
    ///
    /// Returns [`HubError::InvalidConfig`](sensorhub_core::HubError) for an
    /// invalid analytics configuration.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is 0.
    pub fn with_capacity(config: AnalyticsConfig, capacity: usize) -> Result<Self> {
        Ok(Self {
            engine: AnalyticsEngine::new(config)?,
            broker: Broker::with_capacity(capacity),
        })
    }

    /// Ingests one raw observation: enriches it, serializes it once and
    /// broadcasts the payload to all subscribers.
    ///
    /// Safe to call concurrently from independent producer paths, including
    /// for the same sensor: serialization and broadcast run inside that
    /// sensor's critical section, so each subscriber observes one sensor's
    /// readings in ingestion order. Different sensors publish fully in
    /// parallel.
    ///
    /// # Errors
    ///
    /// Rejected readings ([`HubError::MalformedReading`],
    /// [`HubError::StaleReading`]) leave the sensor's window unchanged and
    /// publish nothing. Delivery problems of individual subscribers are
    /// never surfaced here.
    ///
    /// [`HubError::MalformedReading`]: sensorhub_core::HubError
    /// [`HubError::StaleReading`]: sensorhub_core::HubError
    pub fn ingest(&self, sensor_id: &str, value: f64, timestamp: DateTime<Utc>) -> Result<()> {
        self.engine
            .ingest_with(sensor_id, value, timestamp, |reading| {
                let payload: Payload = serde_json::to_string(reading)?.into();
                self.broker.publish(payload)?;
                Ok(())
            })
    }

    /// Registers a new subscriber; one per client connection.
    ///
    /// # Errors
    ///
    /// Returns [`BrokerError::Closed`](sensorhub_core::BrokerError) once the
    /// hub's broker has been closed.
    pub fn subscribe(&self) -> Result<Subscription<Payload>> {
        Ok(self.broker.subscribe()?)
    }

    /// Removes a subscriber. Idempotent.
    pub fn unsubscribe(&self, id: SubscriberId) {
        self.broker.unsubscribe(id);
    }

    /// Number of currently registered subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.broker.subscriber_count()
    }

    /// The underlying broker, for hosts that want to spawn
    /// [`Broker::monitor`] or close the hub on shutdown.
    #[must_use]
    pub fn broker(&self) -> &Broker<Payload> {
        &self.broker
    }

    /// The underlying analytics engine.
    #[must_use]
    pub fn engine(&self) -> &AnalyticsEngine {
        &self.engine
    }
}
