// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Inbound frame classification and callback routing.
//!
//! Runs on the connection task. The registry lock is held only to snapshot
//! the decoders for a channel; callbacks are invoked after it is released,
//! so a callback may subscribe or cancel without deadlocking.
//!
//! Nothing here is fatal: malformed frames and unknown frame types are
//! dropped, and a payload that fails to decode for one callback does not
//! affect other callbacks, channels, or the read loop.

use tracing::{debug, warn};

use pulse_core::{EventPayload, Frame, FrameKind, ServerError};

use crate::client::Shared;
use crate::error::{DecodeError, RealtimeError};

/// Classifies one inbound text frame and routes it.
pub(crate) fn dispatch_frame(shared: &Shared, text: &str) {
    let frame = match Frame::from_json(text) {
        Ok(frame) => frame,
        Err(error) => {
            debug!("dropping malformed frame: {}", error);
            return;
        }
    };

    match frame.classify() {
        FrameKind::Error => dispatch_error(shared, &frame.data),
        FrameKind::Event => dispatch_event(shared, &frame.data),
        FrameKind::Unknown => {
            debug!(kind = %frame.kind, "dropping frame with unrecognized type");
        }
    }
}

/// Fans a server error out to every registered error callback.
fn dispatch_error(shared: &Shared, data: &serde_json::Value) {
    let error: ServerError = match serde_json::from_value(data.clone()) {
        Ok(error) => error,
        Err(decode_error) => {
            debug!("dropping error frame with malformed body: {}", decode_error);
            return;
        }
    };

    debug!(code = ?error.code, "server error frame: {}", error.message);
    shared.report_error(&RealtimeError::Server(error));
}

/// Routes an event to the callbacks of every channel it names.
///
/// The payload is decoded once per callback, each against that
/// subscription's expected type. Channels without callbacks (including
/// ones unsubscribed after the event was sent) are skipped silently.
fn dispatch_event(shared: &Shared, data: &serde_json::Value) {
    let event: EventPayload = match serde_json::from_value(data.clone()) {
        Ok(event) => event,
        Err(decode_error) => {
            debug!("dropping event frame with malformed body: {}", decode_error);
            return;
        }
    };

    for channel in &event.channels {
        let decoders = shared.lock_registry().decoders_for(channel);
        for decode in decoders {
            if let Err(source) = decode(&event) {
                let error = DecodeError {
                    channel: channel.clone(),
                    source,
                };
                warn!("{}", error);
            }
        }
    }
}
