// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Error types surfaced by the realtime client.
//!
//! Taxonomy:
//! - [`RealtimeError`] reaches registered error callbacks: server error
//!   frames and transport-level failures. Both feed the reconnect policy
//!   without tearing down the registry.
//! - [`DecodeError`] is scoped to one callback invocation: a payload that
//!   does not match the subscription's expected type is logged and skipped,
//!   other callbacks on the same event are unaffected.
//! - Unrecognized or malformed frames are dropped silently (protocol
//!   errors have no caller-visible surface).

use pulse_core::ServerError;
use thiserror::Error;

/// Error delivered to callbacks registered with `on_error`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RealtimeError {
    /// Structured error pushed by the server in an `"error"` frame.
    #[error(transparent)]
    Server(#[from] ServerError),

    /// Connection-level failure (connect, receive, unexpected close).
    #[error("transport error: {0}")]
    Transport(String),
}

/// Payload decode failure for a single callback invocation.
///
/// Never fatal: the dispatcher logs it and keeps routing the event to the
/// remaining callbacks. A subscription whose expected type can never match
/// surfaces one of these per event until the caller fixes the type.
#[derive(Debug, Error)]
#[error("failed to decode payload for channel '{channel}': {source}")]
pub struct DecodeError {
    /// Channel the event was routed on.
    pub channel: String,
    /// The underlying decode failure.
    #[source]
    pub source: serde_json::Error,
}
