// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Connection actor owning the realtime transport.
//!
//! The actor is the only code that touches the transport, so connection
//! opens and closes are serialized by construction and at most one
//! physical connection exists at a time. It is driven by two event
//! sources:
//! - commands from the client (`Reconnect` after a debounced subscribe,
//!   `Disconnect` when the registry empties), and
//! - the transport itself (inbound frames, close, errors).
//!
//! Lifecycle is an explicit state machine, `Closed -> Connecting -> Open
//! -> Closed`, published through a watch channel. The reconnect policy is
//! a function of state and cause: an unexpected close while subscriptions
//! remain triggers exactly one delayed reconnect with the registry's
//! current channel list; an explicit disconnect never does.

use std::sync::Weak;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

use pulse_core::ClientConfig;

use crate::client::Shared;
use crate::dispatcher;
use crate::error::RealtimeError;
use crate::transport::{Transport, TransportError};

/// State of the realtime connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// No connection.
    Closed,
    /// Connection attempt in progress.
    Connecting,
    /// Connection established; frames are being dispatched.
    Open,
}

/// Commands from the client into the actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Command {
    /// Replace the current connection with one reflecting the registry.
    Reconnect,
    /// Close the connection and stay closed until the next reconnect.
    Disconnect,
}

/// Actor task owning the transport.
pub(crate) struct ConnectionActor<T: Transport> {
    transport: T,
    config: ClientConfig,
    /// Weak so a dropped client (and its handles) shuts the actor down.
    shared: Weak<Shared>,
    commands: mpsc::UnboundedReceiver<Command>,
    state: watch::Sender<ConnectionState>,
    reconnect_delay: Duration,
}

impl<T: Transport> ConnectionActor<T> {
    pub(crate) fn new(
        transport: T,
        config: ClientConfig,
        shared: Weak<Shared>,
        commands: mpsc::UnboundedReceiver<Command>,
        state: watch::Sender<ConnectionState>,
        reconnect_delay: Duration,
    ) -> Self {
        ConnectionActor {
            transport,
            config,
            shared,
            commands,
            state,
            reconnect_delay,
        }
    }

    /// Runs until the command channel closes (client and handles dropped).
    pub(crate) async fn run(mut self) {
        loop {
            if self.transport.is_connected() {
                tokio::select! {
                    command = self.commands.recv() => match command {
                        Some(Command::Reconnect) => self.reconnect().await,
                        Some(Command::Disconnect) => self.disconnect().await,
                        None => break,
                    },
                    frame = self.transport.recv() => match frame {
                        Ok(Some(text)) => {
                            if let Some(shared) = self.shared.upgrade() {
                                dispatcher::dispatch_frame(&shared, &text);
                            }
                        }
                        Ok(None) => {
                            debug!("realtime connection closed by peer");
                            self.connection_lost(None).await;
                        }
                        Err(error) => {
                            self.connection_lost(Some(error)).await;
                        }
                    },
                }
            } else {
                match self.commands.recv().await {
                    Some(Command::Reconnect) => self.reconnect().await,
                    Some(Command::Disconnect) => {}
                    None => break,
                }
            }
        }

        let _ = self.transport.close().await;
        self.state.send_replace(ConnectionState::Closed);
        debug!("connection actor stopped");
    }

    /// Opens a connection reflecting the registry's current channel list,
    /// replacing any live connection.
    ///
    /// There is no incremental channel-add on a live socket: a changed
    /// subscription set always means close-and-reopen with the full list.
    async fn reconnect(&mut self) {
        let Some(shared) = self.shared.upgrade() else {
            return;
        };

        let channels = shared.lock_registry().channels();
        if channels.is_empty() {
            self.disconnect().await;
            return;
        }

        if self.transport.is_connected() {
            let _ = self.transport.close().await;
        }

        self.state.send_replace(ConnectionState::Connecting);
        let url = self.config.realtime_url(&channels);
        debug!(channels = channels.len(), "opening realtime connection");

        match self.transport.connect(&url).await {
            Ok(()) => {
                info!("realtime connection open ({} channels)", channels.len());
                self.state.send_replace(ConnectionState::Open);
            }
            Err(error) => {
                warn!("realtime connect failed: {}", error);
                self.state.send_replace(ConnectionState::Closed);
                shared.report_error(&RealtimeError::Transport(error.to_string()));
            }
        }
    }

    /// Explicit close; never followed by an automatic reconnect.
    async fn disconnect(&mut self) {
        if self.transport.is_connected() {
            let _ = self.transport.close().await;
            info!("realtime connection closed");
        }
        self.state.send_replace(ConnectionState::Closed);
    }

    /// Unexpected close or receive failure on a live connection.
    ///
    /// Reports the error, then makes a single delayed reconnect attempt
    /// with whatever the registry holds by then. A `Disconnect` arriving
    /// during the wait, or a registry emptied in the meantime, cancels the
    /// attempt.
    async fn connection_lost(&mut self, error: Option<TransportError>) {
        let _ = self.transport.close().await;
        self.state.send_replace(ConnectionState::Closed);

        let Some(shared) = self.shared.upgrade() else {
            return;
        };
        if let Some(error) = error {
            warn!("realtime receive failed: {}", error);
            shared.report_error(&RealtimeError::Transport(error.to_string()));
        }
        if shared.lock_registry().is_empty() {
            return;
        }
        drop(shared);

        warn!(
            "realtime connection lost, reconnecting in {:?}",
            self.reconnect_delay
        );
        tokio::select! {
            () = tokio::time::sleep(self.reconnect_delay) => self.reconnect().await,
            command = self.commands.recv() => match command {
                Some(Command::Reconnect) => self.reconnect().await,
                Some(Command::Disconnect) | None => {}
            },
        }
    }
}
