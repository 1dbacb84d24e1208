// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]
//! Broadcast broker for fanning readings out to live subscribers.
//!
//! A [`Broker`] holds the set of currently subscribed delivery endpoints and
//! delivers each published item to every one of them, without letting a slow
//! or stalled subscriber block the publisher or its siblings.
//!
//! ## Characteristics
//!
//! - **Hot**: late subscribers never receive previously published items.
//! - **Bounded**: each subscriber has its own bounded queue; when it is full
//!   the overflowing item is dropped for that subscriber only (drop-newest,
//!   at-most-once, best-effort). No per-delivery task is ever spawned.
//! - **Lock discipline**: `publish` holds the read lock only long enough to
//!   snapshot the endpoint set; `subscribe`/`unsubscribe` take the write
//!   lock for the minimal mutation.
//! - **Ordered**: items delivered to any one subscriber arrive in publish
//!   order; dropping never reorders.
//! - **Thread-safe**: cheap to clone; all clones share the same state.

pub mod broker;
pub mod subscription;

pub use self::broker::{Broker, DEFAULT_QUEUE_CAPACITY};
pub use self::subscription::{SubscriberId, Subscription};
