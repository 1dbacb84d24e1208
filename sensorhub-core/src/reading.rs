// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! The enriched sensor observation delivered to subscribers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One timestamped scalar observation from a sensor, enriched with the
/// analytics computed over that sensor's recent history.
///
/// A `Reading` is immutable once published: every ingestion produces a fresh
/// value, and every field is fully populated before the reading crosses the
/// broker boundary. Partially enriched readings never reach subscribers.
///
/// The serde projection of this struct is the wire format: a self-contained
/// JSON record carrying the raw measurement together with the moving average,
/// the alarm bounds and any recorded alerts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    /// Identifier of the originating sensor.
    pub sensor_id: String,
    /// Raw sensor measurement.
    pub value: f64,
    /// Acquisition time of the measurement.
    pub timestamp: DateTime<Utc>,
    /// Average over the last `window_size` values for this sensor.
    ///
    /// `None` until `window_size` values have been ingested ("skip until
    /// full window" — partial windows are never averaged).
    pub moving_average: Option<f64>,
    /// Lower alarm bound, stamped from the configuration at enrichment time.
    pub alarm_lower: f64,
    /// Upper alarm bound, stamped from the configuration at enrichment time.
    pub alarm_upper: f64,
    /// First crossing of the moving average below the accepted minimum.
    ///
    /// Recorded once per excursion; subsequent readings carry the same mark
    /// rather than re-firing while the condition persists.
    pub alert: Option<AlertMark>,
    /// First crossing of the trend prediction above the early-warning
    /// threshold. Independent of [`alert`](Self::alert); only populated when
    /// trend detection is configured.
    pub early_warning: Option<AlertMark>,
    /// Least-squares trend fit over the current window, when configured and
    /// the window is full.
    pub trend: Option<TrendEstimate>,
}

/// The recorded first crossing of an alert predicate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AlertMark {
    /// Start index (in ingestion order, zero-based) of the first window
    /// whose computed value crossed the threshold.
    pub index: u64,
    /// The computed value that crossed: the windowed average for the
    /// average-based alert, the predicted value for the trend-based one.
    pub value: f64,
    /// Timestamp of the reading that triggered the crossing.
    pub timestamp: DateTime<Utc>,
}

/// Linear trend fitted over the current window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendEstimate {
    /// Predicted value one step past the end of the window.
    pub predicted: f64,
    /// Fitted slope, in value units per step.
    pub slope: f64,
}
