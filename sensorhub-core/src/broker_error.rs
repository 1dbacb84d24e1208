// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use core::fmt;

/// Errors specific to broker lifecycle operations.
///
/// Per-endpoint delivery failures are deliberately absent: a slow or
/// vanished subscriber is pruned and logged inside the broker, never
/// surfaced to the publisher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrokerError {
    /// The broker has been closed and no longer accepts publishes or
    /// subscriptions.
    Closed,
}

impl fmt::Display for BrokerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Closed => write!(f, "Broker is closed"),
        }
    }
}

impl std::error::Error for BrokerError {}
