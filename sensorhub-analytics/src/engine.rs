// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! The per-sensor windowed analytics engine.

use crate::trend;
use crate::window::SensorWindow;
use chrono::{DateTime, Utc};
use parking_lot::{Mutex, RwLock};
use sensorhub_core::{AlertMark, AnalyticsConfig, HubError, Reading, Result};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::warn;

/// Maintains a sliding window of recent values per sensor and enriches every
/// ingested observation with the moving average, alarm bounds and alert
/// state.
///
/// The engine is an explicitly constructed instance: it owns nothing but its
/// window map and is shared by reference (or inside an `Arc`) with whichever
/// component ingests readings. Ingestion for different sensors proceeds
/// fully in parallel; ingestion for one sensor is serialized by that
/// sensor's mutex.
///
/// # Examples
///
/// ```
/// use chrono::Utc;
/// use sensorhub_analytics::AnalyticsEngine;
/// use sensorhub_core::AnalyticsConfig;
///
/// let engine = AnalyticsEngine::new(AnalyticsConfig {
///     window_size: 3,
///     min_accepted: 1000.0,
///     ..AnalyticsConfig::default()
/// })
/// .unwrap();
///
/// let mut last = None;
/// for value in [1000.0, 1000.0, 1000.0] {
///     last = Some(engine.ingest("tag-1", value, Utc::now()).unwrap());
/// }
///
/// let reading = last.unwrap();
/// assert_eq!(reading.moving_average, Some(1000.0));
/// // 1000.0 <= min_accepted: the first full window already crossed.
/// assert_eq!(reading.alert.unwrap().index, 0);
/// ```
pub struct AnalyticsEngine {
    config: AnalyticsConfig,
    windows: RwLock<HashMap<String, Arc<Mutex<SensorWindow>>>>,
}

impl AnalyticsEngine {
    /// Creates an engine with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`HubError::InvalidConfig`] when the configuration fails
    /// validation; an engine never exists in a half-configured state.
    pub fn new(config: AnalyticsConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            windows: RwLock::new(HashMap::new()),
        })
    }

    /// The configuration this engine was constructed with.
    #[must_use]
    pub fn config(&self) -> &AnalyticsConfig {
        &self.config
    }

    /// Number of sensors with live window state.
    #[must_use]
    pub fn sensor_count(&self) -> usize {
        self.windows.read().len()
    }

    /// Ingests one observation and returns the fully enriched reading.
    ///
    /// Equivalent to [`ingest_with`](Self::ingest_with) with a closure that
    /// clones the reading out of the critical section. Note that once this
    /// returns, the sensor's mutex has been released: a caller that
    /// forwards the reading somewhere order-sensitive should use
    /// [`ingest_with`](Self::ingest_with) instead.
    ///
    /// # Errors
    ///
    /// - [`HubError::MalformedReading`] for a non-finite value; the window
    ///   is left unchanged.
    /// - [`HubError::StaleReading`] for a timestamp older than the sensor's
    ///   last accepted reading; the window is left unchanged.
    pub fn ingest(
        &self,
        sensor_id: &str,
        value: f64,
        timestamp: DateTime<Utc>,
    ) -> Result<Reading> {
        self.ingest_with(sensor_id, value, timestamp, |reading| Ok(reading.clone()))
    }

    /// Ingests one observation and hands the enriched reading to `deliver`
    /// while the sensor's window is still locked.
    ///
    /// Appends `value` to the sensor's window (evicting the oldest value if
    /// the window is full), recomputes the moving average incrementally,
    /// evaluates the alert predicates and invokes `deliver` with the
    /// complete [`Reading`]; no partially enriched state ever leaves the
    /// engine.
    ///
    /// Because `deliver` runs inside the per-sensor critical section,
    /// deliveries for one sensor happen in ingestion order even when
    /// independent producers ingest that sensor concurrently; the pipeline
    /// facade relies on this to broadcast readings FIFO per sensor. Keep
    /// the closure short: it blocks further ingestion for that sensor (and
    /// that sensor only) while it runs.
    ///
    /// Safe to call concurrently for different sensor IDs, which proceed
    /// fully in parallel.
    ///
    /// # Errors
    ///
    /// - [`HubError::MalformedReading`] for a non-finite value; the window
    ///   is left unchanged and `deliver` is not called.
    /// - [`HubError::StaleReading`] for a timestamp older than the sensor's
    ///   last accepted reading; the window is left unchanged and `deliver`
    ///   is not called.
    /// - Any error returned by `deliver` itself.
    pub fn ingest_with<R>(
        &self,
        sensor_id: &str,
        value: f64,
        timestamp: DateTime<Utc>,
        deliver: impl FnOnce(&Reading) -> Result<R>,
    ) -> Result<R> {
        if !value.is_finite() {
            warn!(sensor_id, value, "rejecting non-finite reading");
            return Err(HubError::malformed_reading(format!(
                "non-finite value {value} for sensor {sensor_id}"
            )));
        }

        let window = self.window_for(sensor_id);
        let mut window = window.lock();

        if !window.accepts(timestamp) {
            warn!(sensor_id, %timestamp, "rejecting stale reading");
            return Err(HubError::stale_reading(format!(
                "timestamp {timestamp} is older than the last reading for sensor {sensor_id}"
            )));
        }

        window.push(value, timestamp);

        let moving_average = window.average();
        if let Some(average) = moving_average {
            if window.avg_alert.is_none() && average <= self.config.min_accepted {
                window.avg_alert = Some(AlertMark {
                    index: window.start_index(),
                    value: average,
                    timestamp,
                });
            }
        }

        let trend = match (&self.config.trend, window.is_full()) {
            (Some(trend_config), true) => {
                let start_index = window.start_index();
                let estimate = trend::fit(window.as_slice());
                if let Some(estimate) = estimate {
                    if window.trend_alert.is_none()
                        && estimate.predicted >= trend_config.threshold
                        && estimate.slope.abs() >= trend_config.rate_of_change
                    {
                        window.trend_alert = Some(AlertMark {
                            index: start_index,
                            value: estimate.predicted,
                            timestamp,
                        });
                    }
                }
                estimate
            }
            _ => None,
        };

        let reading = Reading {
            sensor_id: sensor_id.to_owned(),
            value,
            timestamp,
            moving_average,
            alarm_lower: self.config.alarm_lower,
            alarm_upper: self.config.alarm_upper,
            alert: window.avg_alert,
            early_warning: window.trend_alert,
            trend,
        };

        // Deliver under the sensor's mutex so downstream observers see this
        // sensor's readings in ingestion order.
        deliver(&reading)
    }

    /// Looks up the sensor's window, creating it on first sight.
    ///
    /// Read lock on the common path; the write lock is only taken the first
    /// time a sensor ID appears.
    fn window_for(&self, sensor_id: &str) -> Arc<Mutex<SensorWindow>> {
        if let Some(window) = self.windows.read().get(sensor_id) {
            return Arc::clone(window);
        }

        let mut windows = self.windows.write();
        Arc::clone(
            windows
                .entry(sensor_id.to_owned())
                .or_insert_with(|| Arc::new(Mutex::new(SensorWindow::new(self.config.window_size)))),
        )
    }
}
