// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Configuration consumed by the analytics engine at construction.

use crate::error::{HubError, Result};

/// Per-engine analytics configuration.
///
/// Validated once, at [`AnalyticsEngine::new`] time; an invalid configuration
/// is a fatal construction error, never a runtime surprise.
///
/// [`AnalyticsEngine::new`]: https://docs.rs/sensorhub-analytics
///
/// # Examples
///
/// ```
/// use sensorhub_core::AnalyticsConfig;
///
/// let config = AnalyticsConfig {
///     window_size: 3,
///     min_accepted: 1000.0,
///     ..AnalyticsConfig::default()
/// };
/// assert!(config.validate().is_ok());
///
/// let broken = AnalyticsConfig { window_size: 0, ..AnalyticsConfig::default() };
/// assert!(broken.validate().is_err());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyticsConfig {
    /// Number of values in the sliding window. Must be at least 1.
    pub window_size: usize,
    /// Average-based alert threshold: the alert fires the first time the
    /// moving average is less than or equal to this value.
    pub min_accepted: f64,
    /// Lower alarm bound stamped on every enriched reading.
    pub alarm_lower: f64,
    /// Upper alarm bound stamped on every enriched reading.
    pub alarm_upper: f64,
    /// Optional trend-based early-warning configuration.
    pub trend: Option<TrendConfig>,
}

/// Trend-based early-warning configuration.
///
/// A least-squares line is fitted to the window's (index, value) pairs and
/// evaluated one step past the window's end. The early warning fires the
/// first time the prediction is at or above `threshold` while the fitted
/// slope is at least as steep as `rate_of_change`; shallower fits are
/// treated as noise and ignored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrendConfig {
    /// Early-warning threshold: fires when the predicted value is greater
    /// than or equal to this bound. Note the opposite sense of
    /// [`AnalyticsConfig::min_accepted`]: the two predicates are independent.
    pub threshold: f64,
    /// Assumed real drift per step. The fitted slope magnitude must reach
    /// this value for the early warning to fire.
    pub rate_of_change: f64,
}

impl Default for AnalyticsConfig {
    /// Defaults taken from the HVAC monitoring deployment this pipeline was
    /// built for: a 30-sample window with an 800..1500 alarm band.
    fn default() -> Self {
        Self {
            window_size: 30,
            min_accepted: 1000.0,
            alarm_lower: 800.0,
            alarm_upper: 1500.0,
            trend: None,
        }
    }
}

impl AnalyticsConfig {
    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`HubError::InvalidConfig`] when the window size is zero, any
    /// threshold is non-finite, the alarm bounds are inverted, or the trend
    /// rate assumption is negative.
    pub fn validate(&self) -> Result<()> {
        if self.window_size == 0 {
            return Err(HubError::invalid_config("window_size must be at least 1"));
        }
        if !self.min_accepted.is_finite() {
            return Err(HubError::invalid_config("min_accepted must be finite"));
        }
        if !self.alarm_lower.is_finite() || !self.alarm_upper.is_finite() {
            return Err(HubError::invalid_config("alarm bounds must be finite"));
        }
        if self.alarm_lower > self.alarm_upper {
            return Err(HubError::invalid_config(format!(
                "alarm_lower ({}) exceeds alarm_upper ({})",
                self.alarm_lower, self.alarm_upper
            )));
        }
        if let Some(trend) = &self.trend {
            trend.validate()?;
        }
        Ok(())
    }
}

impl TrendConfig {
    fn validate(&self) -> Result<()> {
        if !self.threshold.is_finite() {
            return Err(HubError::invalid_config("trend threshold must be finite"));
        }
        if !self.rate_of_change.is_finite() || self.rate_of_change < 0.0 {
            return Err(HubError::invalid_config(
                "trend rate_of_change must be finite and non-negative",
            ));
        }
        Ok(())
    }
}
