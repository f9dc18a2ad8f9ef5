// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Client configuration and realtime endpoint URL construction.
//!
//! The realtime endpoint is derived from the HTTP endpoint by swapping the
//! scheme (`http` becomes `ws`, `https` becomes `wss`) unless an explicit
//! realtime endpoint is configured. The connect URL carries the project ID
//! and the full subscribed channel list as query parameters:
//!
//! ```text
//! wss://host/v1/realtime?project=<id>&channels[]=<ch1>&channels[]=<ch2>
//! ```

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

use crate::error::{Error, Result};

/// Characters percent-encoded in query parameter values.
///
/// Kept minimal so channel names like `collections.abc.documents` stay
/// readable in logs and server access traces.
const QUERY_VALUE: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'&')
    .add(b'+')
    .add(b'<')
    .add(b'=')
    .add(b'>')
    .add(b'?');

/// Configuration for a pulse client.
///
/// Holds the platform endpoint, the project ID sent with every connection,
/// and an optional realtime endpoint override.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// HTTP endpoint of the platform, without a trailing slash.
    endpoint: String,
    /// Explicit realtime endpoint, if set.
    endpoint_realtime: Option<String>,
    /// Project ID.
    project: String,
}

impl ClientConfig {
    /// Creates a configuration for the given endpoint and project.
    ///
    /// The endpoint must use the `http://` or `https://` scheme; a trailing
    /// slash is tolerated and removed.
    pub fn new(endpoint: impl Into<String>, project: impl Into<String>) -> Result<Self> {
        let endpoint = endpoint.into();
        if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
            return Err(Error::InvalidEndpoint(endpoint));
        }

        Ok(ClientConfig {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            endpoint_realtime: None,
            project: project.into(),
        })
    }

    /// Overrides the derived realtime endpoint.
    ///
    /// Useful when the realtime service is exposed on a different host than
    /// the HTTP API.
    pub fn with_endpoint_realtime(mut self, endpoint: impl Into<String>) -> Self {
        let endpoint = endpoint.into();
        self.endpoint_realtime = Some(endpoint.trim_end_matches('/').to_string());
        self
    }

    /// Returns the HTTP endpoint.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Returns the project ID.
    pub fn project(&self) -> &str {
        &self.project
    }

    /// Returns the realtime endpoint.
    ///
    /// Defaults to the HTTP endpoint with the scheme swapped to `ws`/`wss`.
    pub fn endpoint_realtime(&self) -> String {
        match self.endpoint_realtime {
            Some(ref endpoint) => endpoint.clone(),
            None => self.endpoint.replacen("http", "ws", 1),
        }
    }

    /// Builds the realtime connect URL for the given channel list.
    ///
    /// Channels appear in the given order; the caller is responsible for
    /// deduplication (the channel registry hands over each channel once).
    pub fn realtime_url(&self, channels: &[String]) -> String {
        let mut url = format!(
            "{}/realtime?project={}",
            self.endpoint_realtime(),
            encode_value(&self.project)
        );

        for channel in channels {
            url.push_str("&channels[]=");
            url.push_str(&encode_value(channel));
        }

        url
    }
}

/// Percent-encodes a query parameter value.
fn encode_value(value: &str) -> String {
    utf8_percent_encode(value, QUERY_VALUE).to_string()
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
