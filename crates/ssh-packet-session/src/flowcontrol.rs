//! Channel flow-control fan-out.
//!
//! The packet layer itself does not understand channel windows. That is
//! the channel multiplexer's job, out of scope here. What the packet layer
//! does own is the single point where
//! "the outgoing socket stopped blocking" becomes known, and it needs to
//! fan that event out to every channel that might have data queued behind
//! it, in registration order, without giving any one subscriber the power
//! to stop the others from being notified.

use std::collections::BTreeMap;

/// Identifies one multiplexed channel for flow-control notification
/// purposes. Distinct from the wire's channel-number field so the registry
/// can be keyed and iterated deterministically in tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ChannelId(pub u32);

/// Something that wants to know when outgoing backpressure clears.
pub trait ChannelSubscriber: Send {
    /// The outgoing sink can accept more bytes; resume writing if blocked.
    fn on_writable(&mut self);
}

/// Registry of channels currently interested in write-ready notifications.
///
/// Registration order is not meaningful (subscribers are independent), so
/// a `BTreeMap` is used for deterministic iteration in tests rather than an
/// insertion-ordered structure.
#[derive(Default)]
pub struct ChannelRegistry {
    subscribers: BTreeMap<ChannelId, Box<dyn ChannelSubscriber>>,
}

impl ChannelRegistry {
    /// An empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self { subscribers: BTreeMap::new() }
    }

    /// Register (or replace) the subscriber for `id`.
    pub fn register(&mut self, id: ChannelId, subscriber: Box<dyn ChannelSubscriber>) {
        self.subscribers.insert(id, subscriber);
    }

    /// Remove the subscriber for `id`, if any.
    pub fn unregister(&mut self, id: ChannelId) {
        self.subscribers.remove(&id);
    }

    /// Fan out a write-ready event to every registered channel. One
    /// subscriber panicking on `on_writable` would poison the rest in a
    /// single `for` loop over trait objects the same way; this workspace's
    /// convention is that subscriber callbacks never panic, matching the
    /// no-panics discipline of the handler callbacks in [`crate::dispatch`].
    pub fn notify_all_writable(&mut self) {
        for subscriber in self.subscribers.values_mut() {
            subscriber.on_writable();
        }
    }

    /// Number of currently registered channels.
    #[must_use]
    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    /// True if no channel is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }
}
