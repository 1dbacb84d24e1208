// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use core::pin::Pin;
use core::task::{Context, Poll};
use futures::Stream;

/// Opaque identity of one registered delivery endpoint.
///
/// Used to cancel the matching subscription; copyable so the transport layer
/// can keep it after handing the [`Subscription`] to a reader task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(pub(crate) u64);

/// The receiving half of a broker subscription.
///
/// The broker holds only the sending half: dropping a `Subscription` closes
/// the channel and the dead endpoint is pruned on the next publish. For a
/// prompt, explicit removal call [`Broker::unsubscribe`] with
/// [`id`](Self::id).
///
/// Implements [`Stream`], so the usual `StreamExt` combinators apply.
///
/// [`Broker::unsubscribe`]: crate::Broker::unsubscribe
pub struct Subscription<T> {
    pub(crate) id: SubscriberId,
    pub(crate) receiver: Pin<Box<async_channel::Receiver<T>>>,
}

impl<T> Subscription<T> {
    /// The identity of this endpoint, for [`Broker::unsubscribe`].
    ///
    /// [`Broker::unsubscribe`]: crate::Broker::unsubscribe
    #[must_use]
    pub fn id(&self) -> SubscriberId {
        self.id
    }

    /// Receives the next delivered item.
    ///
    /// Returns `None` once the subscription has been removed (or the broker
    /// closed) and the queue has been drained.
    pub async fn recv(&self) -> Option<T> {
        self.receiver.recv().await.ok()
    }
}

impl<T> Stream for Subscription<T> {
    type Item = T;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.receiver.as_mut().poll_next(cx)
    }
}
