// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Least-squares trend fitting over a window of values.

use sensorhub_core::TrendEstimate;

/// Fits a line through `(0, values[0]) .. (n-1, values[n-1])` and predicts
/// the value at index `n`, one step past the window's end.
///
/// Returns `None` for fewer than two points: a single observation has no
/// slope.
///
/// # Examples
///
/// ```
/// use sensorhub_analytics::trend::fit;
///
/// let estimate = fit(&[100.0, 200.0, 300.0]).unwrap();
/// assert_eq!(estimate.slope, 100.0);
/// assert_eq!(estimate.predicted, 400.0);
/// ```
pub fn fit(values: &[f64]) -> Option<TrendEstimate> {
    let n = values.len();
    if n < 2 {
        return None;
    }

    let n_f = n as f64;
    let mut sum_x = 0.0;
    let mut sum_y = 0.0;
    let mut sum_xx = 0.0;
    let mut sum_xy = 0.0;
    for (i, &y) in values.iter().enumerate() {
        let x = i as f64;
        sum_x += x;
        sum_y += y;
        sum_xx += x * x;
        sum_xy += x * y;
    }

    let denominator = n_f * sum_xx - sum_x * sum_x;
    // Index positions are distinct, so the denominator is nonzero for n >= 2.
    let slope = (n_f * sum_xy - sum_x * sum_y) / denominator;
    let intercept = (sum_y - slope * sum_x) / n_f;

    Some(TrendEstimate {
        predicted: slope * n_f + intercept,
        slope,
    })
}
