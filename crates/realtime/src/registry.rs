// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Channel registry mapping channel names to registered callbacks.
//!
//! The registry is the single source of truth for subscription state: the
//! connection manager opens the socket iff the registry is non-empty, and
//! the connect URL enumerates `channels()` verbatim.
//!
//! Callbacks are stored type-erased as decode closures: each subscription
//! captures its expected payload type inside an `Fn(&EventPayload)` that
//! decodes and invokes the user callback. This keeps the registry free of
//! runtime type tokens.

use std::sync::Arc;

use pulse_core::EventPayload;

/// Type-erased decode-and-invoke closure for one subscription.
///
/// Returns the decode failure so the dispatcher can report it scoped to
/// this single callback invocation.
pub type DecodeFn = Arc<dyn Fn(&EventPayload) -> Result<(), serde_json::Error> + Send + Sync>;

/// Identifier of one `subscribe` call, used for per-handle removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    /// Returns the numeric value, for logging.
    pub fn value(self) -> u64 {
        self.0
    }
}

/// One registered callback under one channel.
struct CallbackEntry {
    /// The subscription that created this entry.
    owner: SubscriptionId,
    /// Decode-and-invoke closure.
    decode: DecodeFn,
}

/// All callbacks registered under one channel name.
struct ChannelBucket {
    channel: String,
    entries: Vec<CallbackEntry>,
}

/// Registry of channel subscriptions.
///
/// Buckets keep insertion order so the connect query lists channels in the
/// order they were first subscribed.
#[derive(Default)]
pub struct ChannelRegistry {
    buckets: Vec<ChannelBucket>,
    next_id: u64,
}

impl ChannelRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        ChannelRegistry::default()
    }

    /// Registers one callback under each of the given channels.
    ///
    /// Buckets are created on demand. Duplicate handlers for the same
    /// channel are all retained; there is no deduplication.
    pub fn register(&mut self, channels: &[String], decode: DecodeFn) -> SubscriptionId {
        self.next_id += 1;
        let id = SubscriptionId(self.next_id);

        for channel in channels {
            let entry = CallbackEntry {
                owner: id,
                decode: Arc::clone(&decode),
            };
            match self.buckets.iter_mut().find(|b| b.channel == *channel) {
                Some(bucket) => bucket.entries.push(entry),
                None => self.buckets.push(ChannelBucket {
                    channel: channel.clone(),
                    entries: vec![entry],
                }),
            }
        }

        id
    }

    /// Removes every entry created by the given subscription.
    ///
    /// Other subscriptions on the same channels are untouched. Buckets left
    /// empty are dropped so `channels()` reflects live interest only.
    ///
    /// Returns true if any entry was removed.
    pub fn unregister(&mut self, id: SubscriptionId) -> bool {
        let mut removed = false;

        for bucket in &mut self.buckets {
            let before = bucket.entries.len();
            bucket.entries.retain(|entry| entry.owner != id);
            removed |= bucket.entries.len() != before;
        }
        self.buckets.retain(|bucket| !bucket.entries.is_empty());

        removed
    }

    /// True iff no channel has any registered callback.
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Current channel names in first-subscription order, each listed once.
    pub fn channels(&self) -> Vec<String> {
        self.buckets.iter().map(|b| b.channel.clone()).collect()
    }

    /// Snapshot of the decode closures registered under a channel.
    ///
    /// Empty for unknown channels; the dispatcher treats that as a no-op.
    pub fn decoders_for(&self, channel: &str) -> Vec<DecodeFn> {
        self.buckets
            .iter()
            .find(|b| b.channel == channel)
            .map(|b| b.entries.iter().map(|e| Arc::clone(&e.decode)).collect())
            .unwrap_or_default()
    }

    /// Number of callbacks registered under a channel.
    pub fn entry_count(&self, channel: &str) -> usize {
        self.buckets
            .iter()
            .find(|b| b.channel == channel)
            .map_or(0, |b| b.entries.len())
    }
}
