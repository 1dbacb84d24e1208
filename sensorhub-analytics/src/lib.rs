// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]
//! Windowed analytics over per-sensor time series.
//!
//! The [`AnalyticsEngine`] maintains one sliding window of recent raw values
//! per sensor and, on every ingested observation, answers two questions:
//! what is the current moving average, and does an alert condition now hold.
//!
//! ## Characteristics
//!
//! - **Incremental**: the moving average is maintained as a running sum —
//!   O(1) amortized per ingested value, independent of the window size.
//! - **Skip until full**: no average and no alert are emitted before
//!   `window_size` values have been seen for a sensor. Partial windows are
//!   never averaged.
//! - **First-crossing alerts**: each predicate records the first window that
//!   crossed its threshold and does not re-fire while the condition persists.
//! - **Parallel across sensors**: different sensors' windows are independent
//!   and update fully in parallel; writes to one sensor's window are
//!   serialized by a per-sensor mutex.
//! - **Pure**: no I/O; the engine only touches its own window map.

pub mod engine;
pub mod trend;
mod window;

pub use self::engine::AnalyticsEngine;
