// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Error types for the sensorhub pipeline.
//!
//! The taxonomy mirrors the failure classes of the system: configuration
//! errors are fatal at construction, ingestion errors reject a single reading
//! and leave the sensor's window untouched, and delivery failures are not
//! errors at all — they are logged and isolated inside the broker.

use crate::broker_error::BrokerError;

/// Root error type for all sensorhub operations.
#[derive(Debug, thiserror::Error)]
pub enum HubError {
    /// The analytics configuration is invalid. Fatal at construction.
    #[error("Invalid configuration: {context}")]
    InvalidConfig {
        /// Description of the offending configuration field.
        context: String,
    },

    /// A malformed reading reached the core and was rejected.
    ///
    /// The sensor's window is left unchanged; the next well-formed reading
    /// proceeds as if the rejected one never happened.
    #[error("Malformed reading: {context}")]
    MalformedReading {
        /// Description of what was wrong with the reading.
        context: String,
    },

    /// A reading older than the sensor's last accepted one was rejected.
    #[error("Stale reading: {context}")]
    StaleReading {
        /// Description of the timestamp regression.
        context: String,
    },

    /// Serializing an enriched reading for the wire failed.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The broadcast broker refused the operation.
    #[error(transparent)]
    Broker(#[from] BrokerError),
}

impl HubError {
    /// Create an invalid-configuration error with the given context.
    pub fn invalid_config(context: impl Into<String>) -> Self {
        Self::InvalidConfig {
            context: context.into(),
        }
    }

    /// Create a malformed-reading error with the given context.
    pub fn malformed_reading(context: impl Into<String>) -> Self {
        Self::MalformedReading {
            context: context.into(),
        }
    }

    /// Create a stale-reading error with the given context.
    pub fn stale_reading(context: impl Into<String>) -> Self {
        Self::StaleReading {
            context: context.into(),
        }
    }
}

/// Convenience alias used throughout the workspace.
pub type Result<T> = core::result::Result<T, HubError>;
