// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::subscription::{SubscriberId, Subscription};
use async_channel::{Sender, TrySendError};
use parking_lot::RwLock;
use sensorhub_core::BrokerError;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Default depth of each subscriber's delivery queue.
pub const DEFAULT_QUEUE_CAPACITY: usize = 64;

struct BrokerState<T> {
    closed: bool,
    next_id: u64,
    senders: Vec<(SubscriberId, Sender<T>)>,
}

/// A concurrency-safe broadcast hub.
///
/// Any number of producers may [`publish`](Self::publish) concurrently with
/// any number of [`subscribe`](Self::subscribe)/[`unsubscribe`](Self::unsubscribe)
/// calls. Delivery is at-most-once per subscriber: a full queue drops the
/// overflowing item for that subscriber, a vanished subscriber is pruned,
/// and neither ever stalls the publisher or the other subscribers.
///
/// # Examples
///
/// ```
/// use sensorhub_broker::Broker;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let broker = Broker::<i32>::new();
///
/// let first = broker.subscribe().unwrap();
/// broker.publish(1).unwrap();
///
/// // Late subscribers do not see earlier items.
/// let second = broker.subscribe().unwrap();
/// broker.publish(2).unwrap();
///
/// assert_eq!(first.recv().await, Some(1));
/// assert_eq!(first.recv().await, Some(2));
/// assert_eq!(second.recv().await, Some(2));
///
/// broker.unsubscribe(first.id());
/// assert_eq!(broker.subscriber_count(), 1);
/// # }
/// ```
pub struct Broker<T> {
    state: Arc<RwLock<BrokerState<T>>>,
    capacity: usize,
}

impl<T: Clone> Broker<T> {
    /// Creates a broker with the default per-subscriber queue depth.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_QUEUE_CAPACITY)
    }

    /// Creates a broker whose subscribers each buffer up to `capacity`
    /// undelivered items.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is 0.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        assert!(capacity >= 1, "Broker: queue capacity must be at least 1");
        Self {
            state: Arc::new(RwLock::new(BrokerState {
                closed: false,
                next_id: 0,
                senders: Vec::new(),
            })),
            capacity,
        }
    }

    /// Registers a new delivery endpoint.
    ///
    /// O(1); takes the write lock only for the insertion.
    ///
    /// # Errors
    ///
    /// Returns [`BrokerError::Closed`] after [`close`](Self::close).
    pub fn subscribe(&self) -> Result<Subscription<T>, BrokerError> {
        let mut state = self.state.write();
        if state.closed {
            return Err(BrokerError::Closed);
        }

        let id = SubscriberId(state.next_id);
        state.next_id += 1;

        let (tx, rx) = async_channel::bounded(self.capacity);
        state.senders.push((id, tx));
        Ok(Subscription { id, receiver: Box::pin(rx) })
    }

    /// Removes the endpoint registered under `id`.
    ///
    /// Idempotent: removing an already-removed endpoint is a no-op. Safe to
    /// call concurrently with an in-flight publish; a delivery racing the
    /// removal may still land in the endpoint's queue or be dropped, per the
    /// best-effort contract.
    pub fn unsubscribe(&self, id: SubscriberId) {
        let mut state = self.state.write();
        state.senders.retain(|(subscriber, _)| *subscriber != id);
    }

    /// Delivers `item` to every currently registered endpoint.
    ///
    /// The read lock is held only while snapshotting the endpoint set; the
    /// per-endpoint sends are non-blocking. A full queue drops the item for
    /// that subscriber; a disconnected endpoint is pruned afterwards.
    ///
    /// # Errors
    ///
    /// Returns [`BrokerError::Closed`] after [`close`](Self::close).
    pub fn publish(&self, item: T) -> Result<(), BrokerError> {
        let snapshot: Vec<(SubscriberId, Sender<T>)> = {
            let state = self.state.read();
            if state.closed {
                return Err(BrokerError::Closed);
            }
            state
                .senders
                .iter()
                .map(|(id, tx)| (*id, tx.clone()))
                .collect()
        };

        let mut dead = Vec::new();
        for (id, tx) in snapshot {
            match tx.try_send(item.clone()) {
                Ok(()) => {}
                Err(TrySendError::Full(_)) => {
                    debug!(subscriber = id.0, "queue full, dropping item");
                }
                Err(TrySendError::Closed(_)) => dead.push(id),
            }
        }

        if !dead.is_empty() {
            let mut state = self.state.write();
            state
                .senders
                .retain(|(subscriber, _)| !dead.contains(subscriber));
        }
        Ok(())
    }

    /// Closes the broker, completing all subscription streams.
    ///
    /// After closing, [`publish`](Self::publish) and
    /// [`subscribe`](Self::subscribe) return [`BrokerError::Closed`].
    /// Idempotent.
    pub fn close(&self) {
        let mut state = self.state.write();
        state.closed = true;
        state.senders.clear();
    }

    /// Returns `true` once [`close`](Self::close) has been called.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.state.read().closed
    }

    /// Number of currently registered endpoints. Read lock only.
    ///
    /// Endpoints whose `Subscription` was dropped without an explicit
    /// unsubscribe are counted until the next publish prunes them.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.state.read().senders.len()
    }

    /// Periodically logs the subscriber count, until the broker is closed.
    ///
    /// Intended to be spawned by the host as a long-lived observability
    /// task.
    pub async fn monitor(&self, interval: Duration) {
        while !self.is_closed() {
            info!(subscribers = self.subscriber_count(), "broker status");
            tokio::time::sleep(interval).await;
        }
    }
}

impl<T: Clone> Default for Broker<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for Broker<T> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
            capacity: self.capacity,
        }
    }
}
