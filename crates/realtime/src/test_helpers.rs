// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Shared helpers for realtime tests.

#![allow(clippy::panic)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use std::time::Duration;

use serde::Deserialize;

use pulse_core::{ClientConfig, EventPayload, Frame, ServerError};

use super::client::{RealtimeClient, RealtimeOptions};
use super::connection::ConnectionState;

/// Payload type used across tests.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Document {
    pub name: String,
    pub description: String,
}

pub fn test_config() -> ClientConfig {
    ClientConfig::new("http://localhost", "test-project").unwrap()
}

/// Short timings so tests settle quickly but debounce is still observable.
pub fn test_options() -> RealtimeOptions {
    RealtimeOptions {
        debounce: Duration::from_millis(20),
        reconnect_delay: Duration::from_millis(50),
    }
}

/// Builds the JSON text of an event frame for the given channels.
pub fn event_frame(channels: &[&str], payload: serde_json::Value) -> String {
    let event = EventPayload {
        channels: channels.iter().map(|c| (*c).to_string()).collect(),
        timestamp: "2026-01-15T10:00:00.000+00:00".to_string(),
        payload,
        event: Some("database.documents.create".to_string()),
    };
    Frame::event(&event).unwrap().to_json().unwrap()
}

/// Builds the JSON text of an error frame.
pub fn error_frame(message: &str, code: Option<i64>) -> String {
    let error = ServerError {
        message: message.to_string(),
        code,
    };
    Frame::error(&error).unwrap().to_json().unwrap()
}

pub fn document_payload() -> serde_json::Value {
    serde_json::json!({"name": "x", "description": "y"})
}

/// Waits until the client reaches the given state, or panics after 2s.
pub async fn wait_for_state(client: &RealtimeClient, state: ConnectionState) {
    let mut rx = client.watch_state();
    tokio::time::timeout(Duration::from_secs(2), async {
        loop {
            if *rx.borrow() == state {
                return;
            }
            rx.changed().await.expect("state channel closed");
        }
    })
    .await
    .unwrap_or_else(|_| panic!("timed out waiting for state {state:?}"));
}

/// Lets in-flight actor work finish before asserting on the outcome.
pub async fn settle() {
    tokio::time::sleep(Duration::from_millis(100)).await;
}
