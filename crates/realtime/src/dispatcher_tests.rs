// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Tests for frame classification and routing, driven directly against the
//! shared state without a connection actor.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use super::client::Shared;
use super::dispatcher::dispatch_frame;
use super::error::RealtimeError;
use super::registry::DecodeFn;
use super::test_helpers::{document_payload, error_frame, event_frame, Document};

fn test_shared() -> Arc<Shared> {
    // The command receiver is dropped; dispatch never sends commands.
    let (command_tx, _command_rx) = tokio::sync::mpsc::unbounded_channel();
    Arc::new(Shared::new(command_tx))
}

fn register(shared: &Shared, channels: &[&str], decode: DecodeFn) {
    let channels: Vec<String> = channels.iter().map(|c| (*c).to_string()).collect();
    shared.lock_registry().register(&channels, decode);
}

/// Registers a typed decoder that records decoded documents.
fn register_document_recorder(shared: &Shared, channels: &[&str]) -> Arc<Mutex<Vec<Document>>> {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    register(
        shared,
        channels,
        Arc::new(move |event| {
            let typed = event.decode::<Document>()?;
            sink.lock().unwrap().push(typed.payload);
            Ok(())
        }),
    );
    seen
}

#[test]
fn event_routed_to_registered_channel_exactly_once() {
    let shared = test_shared();
    let seen_a = register_document_recorder(&shared, &["a"]);
    let seen_b = register_document_recorder(&shared, &["b"]);

    dispatch_frame(&shared, &event_frame(&["a"], document_payload()));

    assert_eq!(seen_a.lock().unwrap().len(), 1);
    assert_eq!(seen_a.lock().unwrap()[0].name, "x");
    assert!(seen_b.lock().unwrap().is_empty());
}

#[test]
fn event_naming_multiple_channels_reaches_each() {
    let shared = test_shared();
    let seen_a = register_document_recorder(&shared, &["a"]);
    let seen_b = register_document_recorder(&shared, &["b"]);

    dispatch_frame(&shared, &event_frame(&["a", "b"], document_payload()));

    assert_eq!(seen_a.lock().unwrap().len(), 1);
    assert_eq!(seen_b.lock().unwrap().len(), 1);
}

#[test]
fn event_for_unregistered_channel_is_noop() {
    let shared = test_shared();
    dispatch_frame(&shared, &event_frame(&["ghost"], document_payload()));
    // Nothing to assert beyond "no panic": the channel has no bucket.
    assert!(shared.lock_registry().is_empty());
}

#[test]
fn decode_failure_is_scoped_to_one_callback() {
    let shared = test_shared();

    // First decoder expects a shape the payload cannot satisfy.
    let failures = Arc::new(AtomicUsize::new(0));
    let failure_counter = Arc::clone(&failures);
    register(
        &shared,
        &["a"],
        Arc::new(move |event| {
            #[derive(serde::Deserialize)]
            struct Wrong {
                #[allow(dead_code)]
                size: u64,
            }
            let result = event.decode::<Wrong>();
            if result.is_err() {
                failure_counter.fetch_add(1, Ordering::SeqCst);
            }
            result.map(|_| ())
        }),
    );
    let seen = register_document_recorder(&shared, &["a"]);

    dispatch_frame(&shared, &event_frame(&["a"], document_payload()));

    assert_eq!(failures.load(Ordering::SeqCst), 1);
    assert_eq!(seen.lock().unwrap().len(), 1, "second callback still fires");
}

#[test]
fn error_frame_fans_out_in_registration_order() {
    let shared = test_shared();
    let order = Arc::new(Mutex::new(Vec::new()));

    for tag in ["first", "second"] {
        let order = Arc::clone(&order);
        shared
            .lock_error_callbacks()
            .push(Arc::new(move |error: &RealtimeError| {
                if let RealtimeError::Server(server) = error {
                    order.lock().unwrap().push((tag, server.message.clone()));
                }
            }));
    }

    dispatch_frame(&shared, &error_frame("boom", Some(401)));

    let order = order.lock().unwrap();
    assert_eq!(
        *order,
        vec![
            ("first", "boom".to_string()),
            ("second", "boom".to_string())
        ]
    );
}

#[test]
fn error_frame_does_not_reach_channel_callbacks() {
    let shared = test_shared();
    let seen = register_document_recorder(&shared, &["a"]);

    dispatch_frame(&shared, &error_frame("boom", None));

    assert!(seen.lock().unwrap().is_empty());
}

#[test]
fn unknown_frame_type_is_dropped() {
    let shared = test_shared();
    let seen = register_document_recorder(&shared, &["a"]);
    let errors = Arc::new(AtomicUsize::new(0));
    let error_counter = Arc::clone(&errors);
    shared
        .lock_error_callbacks()
        .push(Arc::new(move |_| {
            error_counter.fetch_add(1, Ordering::SeqCst);
        }));

    dispatch_frame(
        &shared,
        r#"{"type":"connected","data":{"channels":["a"]}}"#,
    );

    assert!(seen.lock().unwrap().is_empty());
    assert_eq!(errors.load(Ordering::SeqCst), 0);
}

#[test]
fn malformed_frames_are_dropped() {
    let shared = test_shared();
    let seen = register_document_recorder(&shared, &["a"]);

    dispatch_frame(&shared, "not json at all");
    dispatch_frame(&shared, r#"{"no_type_field":1}"#);
    // Event frame whose body is not an event payload
    dispatch_frame(&shared, r#"{"type":"event","data":"just a string"}"#);
    // Error frame whose body is not an error payload
    dispatch_frame(&shared, r#"{"type":"error","data":[1,2,3]}"#);

    assert!(seen.lock().unwrap().is_empty());
}

#[test]
fn event_decoded_once_per_expected_type() {
    let shared = test_shared();
    let seen_typed = register_document_recorder(&shared, &["a"]);

    // Second subscription on the same channel expects raw JSON.
    let seen_raw = Arc::new(Mutex::new(Vec::new()));
    let raw_sink = Arc::clone(&seen_raw);
    register(
        &shared,
        &["a"],
        Arc::new(move |event| {
            let typed = event.decode::<serde_json::Value>()?;
            raw_sink.lock().unwrap().push(typed.payload);
            Ok(())
        }),
    );

    dispatch_frame(&shared, &event_frame(&["a"], document_payload()));

    assert_eq!(seen_typed.lock().unwrap().len(), 1);
    assert_eq!(seen_raw.lock().unwrap().len(), 1);
    assert_eq!(seen_raw.lock().unwrap()[0]["name"], "x");
}
