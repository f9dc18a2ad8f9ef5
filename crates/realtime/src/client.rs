// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Realtime client: the public subscribe/unsubscribe surface.
//!
//! The client owns the shared subscription state and a handle to the
//! connection actor. `subscribe` registers callbacks and nudges the actor
//! to (re)connect after a short debounce window, so several subscriptions
//! set up back-to-back share a single socket open.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use serde::de::DeserializeOwned;
use tokio::sync::{mpsc, watch};
use tracing::debug;

use pulse_core::{ClientConfig, EventPayload, RealtimeEvent};

use crate::connection::{Command, ConnectionActor, ConnectionState};
use crate::error::RealtimeError;
use crate::registry::{ChannelRegistry, DecodeFn};
use crate::subscription::Subscription;
use crate::transport::{Transport, WebSocketTransport};

/// Callback registered with [`RealtimeClient::on_error`].
pub type ErrorCallback = Arc<dyn Fn(&RealtimeError) + Send + Sync>;

/// Timing knobs for the realtime client.
#[derive(Debug, Clone)]
pub struct RealtimeOptions {
    /// Window within which concurrent subscribe calls coalesce into one
    /// reconnect.
    pub debounce: Duration,
    /// Delay before the single reconnect attempt after an unexpected close.
    pub reconnect_delay: Duration,
}

impl Default for RealtimeOptions {
    fn default() -> Self {
        RealtimeOptions {
            debounce: Duration::from_millis(1),
            reconnect_delay: Duration::from_secs(1),
        }
    }
}

/// Subscription state shared between the client, its subscription handles,
/// and the connection actor.
pub(crate) struct Shared {
    /// Channel registry; the one lock guarding all callback state.
    registry: Mutex<ChannelRegistry>,
    /// Error callbacks, invoked in registration order.
    error_callbacks: Mutex<Vec<ErrorCallback>>,
    /// Command channel into the connection actor.
    commands: mpsc::UnboundedSender<Command>,
    /// Subscribe calls currently inside the debounce window.
    pending_subscribes: AtomicUsize,
}

impl Shared {
    pub(crate) fn new(commands: mpsc::UnboundedSender<Command>) -> Self {
        Shared {
            registry: Mutex::new(ChannelRegistry::new()),
            error_callbacks: Mutex::new(Vec::new()),
            commands,
            pending_subscribes: AtomicUsize::new(0),
        }
    }

    /// Locks the registry, recovering from poisoning.
    ///
    /// Callbacks never run under this lock, so a poisoned mutex can only
    /// mean a panic in registry bookkeeping; the state is still coherent.
    pub(crate) fn lock_registry(&self) -> MutexGuard<'_, ChannelRegistry> {
        self.registry.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn lock_error_callbacks(&self) -> MutexGuard<'_, Vec<ErrorCallback>> {
        self.error_callbacks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Invokes every registered error callback, outside the lock.
    pub(crate) fn report_error(&self, error: &RealtimeError) {
        let callbacks: Vec<ErrorCallback> = self.lock_error_callbacks().clone();
        for callback in callbacks {
            callback(error);
        }
    }

    /// Sends a command to the connection actor.
    ///
    /// A closed channel means the actor is gone (client shutdown); the
    /// command is irrelevant then.
    pub(crate) fn send_command(&self, command: Command) {
        let _ = self.commands.send(command);
    }
}

/// Client for the realtime event-subscription channel.
///
/// Maintains at most one WebSocket connection whose subscribed channel list
/// mirrors the registry. The socket is open iff at least one subscription
/// is registered.
pub struct RealtimeClient {
    shared: Arc<Shared>,
    state_rx: watch::Receiver<ConnectionState>,
    options: RealtimeOptions,
}

impl RealtimeClient {
    /// Creates a client with the default WebSocket transport and options.
    ///
    /// Must be called within a tokio runtime; the connection actor is
    /// spawned immediately (it stays idle until the first subscription).
    pub fn new(config: ClientConfig) -> Self {
        Self::with_transport(config, WebSocketTransport::new(), RealtimeOptions::default())
    }

    /// Creates a client with custom timing options.
    pub fn with_options(config: ClientConfig, options: RealtimeOptions) -> Self {
        Self::with_transport(config, WebSocketTransport::new(), options)
    }

    /// Creates a client with a custom transport (for testing).
    pub fn with_transport<T: Transport + 'static>(
        config: ClientConfig,
        transport: T,
        options: RealtimeOptions,
    ) -> Self {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (state_tx, state_rx) = watch::channel(ConnectionState::Closed);

        let shared = Arc::new(Shared::new(command_tx));
        let actor = ConnectionActor::new(
            transport,
            config,
            Arc::downgrade(&shared),
            command_rx,
            state_tx,
            options.reconnect_delay,
        );
        tokio::spawn(actor.run());

        RealtimeClient {
            shared,
            state_rx,
            options,
        }
    }

    /// Subscribes to the given channels with a typed callback.
    ///
    /// Events published to any of the channels are decoded into `T` and
    /// handed to `callback` on the connection task. Returns after the
    /// debounce window; connection failures are reported through error
    /// callbacks, never from this method.
    ///
    /// The returned [`Subscription`] must be kept and cancelled explicitly;
    /// dropping it does not unsubscribe.
    pub async fn subscribe<T, F>(&self, channels: &[&str], callback: F) -> Subscription
    where
        T: DeserializeOwned + 'static,
        F: Fn(RealtimeEvent<T>) + Send + Sync + 'static,
    {
        let decode: DecodeFn = Arc::new(move |event: &EventPayload| {
            let typed = event.decode::<T>()?;
            callback(typed);
            Ok(())
        });

        let channels: Vec<String> = channels.iter().map(|c| (*c).to_string()).collect();
        let id = self.shared.lock_registry().register(&channels, decode);
        debug!(id = id.value(), count = channels.len(), "registered subscription");

        // Debounce: every concurrent subscribe bumps the counter and waits
        // out the window; only the last one to decrement issues the
        // reconnect, so N near-simultaneous calls open one socket carrying
        // the combined channel list.
        self.shared
            .pending_subscribes
            .fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.options.debounce).await;
        if self
            .shared
            .pending_subscribes
            .fetch_sub(1, Ordering::SeqCst)
            == 1
        {
            self.shared.send_command(Command::Reconnect);
        }

        Subscription::new(id, Arc::clone(&self.shared))
    }

    /// Registers a callback for transport failures and server error frames.
    ///
    /// Callbacks are invoked in registration order and stay registered for
    /// the lifetime of the client.
    pub fn on_error<F>(&self, callback: F)
    where
        F: Fn(&RealtimeError) + Send + Sync + 'static,
    {
        self.shared.lock_error_callbacks().push(Arc::new(callback));
    }

    /// Current connection state.
    pub fn state(&self) -> ConnectionState {
        *self.state_rx.borrow()
    }

    /// True iff the connection is open.
    pub fn is_connected(&self) -> bool {
        self.state() == ConnectionState::Open
    }

    /// Returns a watch receiver that tracks connection state changes.
    pub fn watch_state(&self) -> watch::Receiver<ConnectionState> {
        self.state_rx.clone()
    }

    /// Snapshot of the currently subscribed channels.
    pub fn channels(&self) -> Vec<String> {
        self.shared.lock_registry().channels()
    }
}
