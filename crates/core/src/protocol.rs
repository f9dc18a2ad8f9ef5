// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Wire protocol types for the realtime channel.
//!
//! The protocol is simple:
//! - The client subscribes by listing channels in the connect URL; it never
//!   sends application messages over the socket.
//! - The server pushes text frames shaped as `{"type": ..., "data": ...}`,
//!   where `type` is `"event"` for channel events and `"error"` for
//!   server-side failures. Frames with any other type are ignored.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// One inbound message unit from the realtime transport.
///
/// The `data` field stays opaque until the frame is classified; events and
/// errors carry differently shaped bodies.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Frame {
    /// Frame type tag, `"event"` or `"error"` for recognized frames.
    #[serde(rename = "type")]
    pub kind: String,

    /// Opaque frame body, decoded once the frame is classified.
    #[serde(default)]
    pub data: serde_json::Value,
}

/// Classification of an inbound frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameKind {
    /// A server error to fan out to error callbacks.
    Error,
    /// A channel event to route to subscribed callbacks.
    Event,
    /// Anything else; dropped silently.
    Unknown,
}

impl Frame {
    /// Classifies the frame by its type tag.
    pub fn classify(&self) -> FrameKind {
        match self.kind.as_str() {
            "error" => FrameKind::Error,
            "event" => FrameKind::Event,
            _ => FrameKind::Unknown,
        }
    }

    /// Creates an event frame from a payload.
    pub fn event(payload: &EventPayload) -> Result<Self, serde_json::Error> {
        Ok(Frame {
            kind: "event".to_string(),
            data: serde_json::to_value(payload)?,
        })
    }

    /// Creates an error frame from a server error.
    pub fn error(error: &ServerError) -> Result<Self, serde_json::Error> {
        Ok(Frame {
            kind: "error".to_string(),
            data: serde_json::to_value(error)?,
        })
    }

    /// Serializes the frame to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserializes a frame from JSON.
    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}

/// Structured error pushed by the server in an `"error"` frame.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, thiserror::Error)]
#[error("server error: {message}")]
pub struct ServerError {
    /// Human-readable error description.
    pub message: String,

    /// Optional numeric error code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<i64>,
}

/// Body of an `"event"` frame, with the payload still undecoded.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EventPayload {
    /// Channels this event was published to.
    pub channels: Vec<String>,

    /// Server-side timestamp of the event.
    #[serde(default)]
    pub timestamp: String,

    /// Opaque payload, decoded per subscription against its expected type.
    #[serde(default)]
    pub payload: serde_json::Value,

    /// Optional event name (e.g. `"database.documents.create"`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event: Option<String>,
}

impl EventPayload {
    /// Decodes the opaque payload into a typed event.
    ///
    /// A single event may be decoded several times, once per expected type
    /// registered across its channels.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<RealtimeEvent<T>, serde_json::Error> {
        let payload: T = serde_json::from_value(self.payload.clone())?;

        Ok(RealtimeEvent {
            channels: self.channels.clone(),
            timestamp: self.timestamp.clone(),
            event: self.event.clone(),
            payload,
        })
    }
}

/// A realtime event with its payload decoded to the subscriber's type.
#[derive(Debug, Clone, PartialEq)]
pub struct RealtimeEvent<T> {
    /// Channels this event was published to.
    pub channels: Vec<String>,

    /// Server-side timestamp of the event.
    pub timestamp: String,

    /// Optional event name.
    pub event: Option<String>,

    /// The decoded payload.
    pub payload: T,
}

#[cfg(test)]
#[path = "protocol_tests.rs"]
mod tests;
