// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use chrono::{DateTime, Utc};
use sensorhub_core::AlertMark;
use std::collections::VecDeque;

/// Per-sensor sliding-window state.
///
/// Owned exclusively by the engine and only ever touched under that sensor's
/// mutex. Created lazily on the first reading for a sensor ID and kept for
/// the process lifetime.
pub(crate) struct SensorWindow {
    capacity: usize,
    values: VecDeque<f64>,
    /// Running sum of `values`; add on push, subtract on eviction.
    sum: f64,
    /// Total values ever accepted for this sensor.
    seen: u64,
    /// Timestamp of the last accepted reading, for the stale guard.
    last_timestamp: Option<DateTime<Utc>>,
    pub(crate) avg_alert: Option<AlertMark>,
    pub(crate) trend_alert: Option<AlertMark>,
}

impl SensorWindow {
    pub(crate) fn new(capacity: usize) -> Self {
        debug_assert!(capacity >= 1);
        Self {
            capacity,
            values: VecDeque::with_capacity(capacity),
            sum: 0.0,
            seen: 0,
            last_timestamp: None,
            avg_alert: None,
            trend_alert: None,
        }
    }

    /// Whether a reading at `timestamp` is in order for this sensor.
    /// Readings strictly older than the last accepted one are stale;
    /// equal timestamps pass.
    pub(crate) fn accepts(&self, timestamp: DateTime<Utc>) -> bool {
        self.last_timestamp.map_or(true, |last| timestamp >= last)
    }

    /// Appends a value, evicting the oldest if the window is full.
    pub(crate) fn push(&mut self, value: f64, timestamp: DateTime<Utc>) {
        if self.values.len() == self.capacity {
            if let Some(evicted) = self.values.pop_front() {
                self.sum -= evicted;
            }
        }
        self.values.push_back(value);
        self.sum += value;
        self.seen += 1;
        self.last_timestamp = Some(timestamp);
    }

    pub(crate) fn is_full(&self) -> bool {
        self.values.len() == self.capacity
    }

    /// Moving average over the window, defined only once the window is full.
    pub(crate) fn average(&self) -> Option<f64> {
        self.is_full().then(|| self.sum / self.capacity as f64)
    }

    /// Ingestion-order index of the first value in the current window.
    pub(crate) fn start_index(&self) -> u64 {
        self.seen - self.values.len() as u64
    }

    /// The window contents as a contiguous slice, oldest first.
    pub(crate) fn as_slice(&mut self) -> &[f64] {
        self.values.make_contiguous()
    }
}
