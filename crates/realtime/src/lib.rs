// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! pulse-realtime: event-subscription channel for the pulse platform.
//!
//! Provides WebSocket client functionality for subscribing to server-side
//! events by channel name.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐ register  ┌──────────────┐ snapshot ┌─────────────┐
//! │    Client    │──────────►│   Registry   │◄─────────│ Dispatcher  │
//! │ (subscribe)  │           │ (channel map)│          │ (routing)   │
//! └──────┬───────┘           └──────────────┘          └──────▲──────┘
//!        │ Reconnect/Disconnect                               │ frames
//!        ▼                                                    │
//! ┌──────────────┐           ┌──────────────┐          ┌──────┴──────┐
//! │ Subscription │           │  Connection  │─────────►│  Transport  │
//! │   (handle)   │           │   (actor)    │◄─────────│   (trait)   │
//! └──────────────┘           └──────────────┘          └─────────────┘
//! ```
//!
//! # Features
//!
//! - One WebSocket connection carrying the combined channel list, open iff
//!   at least one subscription is registered
//! - Typed callbacks: each subscription decodes event payloads against its
//!   own expected type
//! - Debounced connect: back-to-back subscribe calls coalesce into one
//!   socket open
//! - Single delayed reconnect after an unexpected close; explicit
//!   unsubscribe-to-empty closes for good
//! - Injectable transport trait for testing

mod client;
mod connection;
mod dispatcher;
mod error;
mod registry;
mod subscription;
mod transport;

pub use client::{ErrorCallback, RealtimeClient, RealtimeOptions};
pub use connection::ConnectionState;
pub use error::{DecodeError, RealtimeError};
pub use registry::{ChannelRegistry, DecodeFn, SubscriptionId};
pub use subscription::Subscription;
pub use transport::{Transport, TransportError, TransportResult, WebSocketTransport};

pub use pulse_core::{ClientConfig, RealtimeEvent, ServerError};

#[cfg(test)]
mod test_helpers;


#[cfg(test)]
mod dispatcher_tests;
