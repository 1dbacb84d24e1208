// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]
//! Core types shared across the sensorhub workspace.
//!
//! This crate defines the data model ([`Reading`], [`AlertMark`],
//! [`TrendEstimate`]), the configuration surface ([`AnalyticsConfig`],
//! [`TrendConfig`]) and the error taxonomy ([`HubError`], [`BrokerError`])
//! consumed by the analytics engine, the broadcast broker and the pipeline
//! facade.

pub mod broker_error;
pub mod config;
pub mod error;
pub mod reading;

pub use self::broker_error::BrokerError;
pub use self::config::{AnalyticsConfig, TrendConfig};
pub use self::error::{HubError, Result};
pub use self::reading::{AlertMark, Reading, TrendEstimate};
