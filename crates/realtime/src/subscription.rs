// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Subscription handles returned by `subscribe`.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::debug;

use crate::client::Shared;
use crate::connection::Command;
use crate::registry::SubscriptionId;

/// Handle for one active subscription.
///
/// Cancellation is explicit: dropping the handle leaves the callbacks
/// registered. `cancel` is idempotent and safe to call from any thread.
pub struct Subscription {
    id: SubscriptionId,
    shared: Arc<Shared>,
    cancelled: AtomicBool,
}

impl Subscription {
    pub(crate) fn new(id: SubscriptionId, shared: Arc<Shared>) -> Self {
        Subscription {
            id,
            shared,
            cancelled: AtomicBool::new(false),
        }
    }

    /// Identifier of this subscription.
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// True once `cancel` has been called.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Removes this subscription's callbacks from the registry.
    ///
    /// Only entries created by this handle are removed; other
    /// subscriptions on the same channels keep receiving events. If the
    /// registry empties, the connection is closed. Repeat calls are no-ops.
    ///
    /// An event already pulled off the wire when `cancel` runs may still
    /// be delivered once; nothing fires after that.
    pub fn cancel(&self) {
        if self.cancelled.swap(true, Ordering::SeqCst) {
            return;
        }

        let emptied = {
            let mut registry = self.shared.lock_registry();
            registry.unregister(self.id);
            registry.is_empty()
        };
        debug!(id = self.id.value(), emptied, "cancelled subscription");

        if emptied {
            self.shared.send_command(Command::Disconnect);
        }
    }
}
