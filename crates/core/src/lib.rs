// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! pulse-core: Shared library for the pulse realtime client
//!
//! This crate provides the client configuration, realtime endpoint URL
//! construction, and the wire protocol types shared by the pulse SDK crates.

pub mod config;
pub mod error;
pub mod protocol;

pub use config::ClientConfig;
pub use error::{Error, Result};
pub use protocol::{EventPayload, Frame, FrameKind, RealtimeEvent, ServerError};
