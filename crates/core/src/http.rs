// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Transport-neutral HTTP response and error types

use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::collections::BTreeMap;
use thiserror::Error;

/// A completed HTTP exchange. Header names are stored lowercase.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub headers: BTreeMap<String, String>,
    pub body: Vec<u8>,
}

impl Response {
    pub fn new(status: u16) -> Self {
        Self { status, ..Self::default() }
    }

    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.insert(name.to_ascii_lowercase(), value.into());
        self
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_ascii_lowercase()).map(String::as_str)
    }

    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }
}

/// Failure to complete an HTTP exchange at all.
///
/// Non-2xx statuses are not errors at this level; callers inspect
/// [`Response::status`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HttpError {
    /// The peer reset the connection. Retried on the next poll.
    #[error("connection reset: {0}")]
    ConnectionReset(String),

    #[error("request failed: {0}")]
    Transport(String),

    #[error("failed to read response body: {0}")]
    Body(String),

    #[error("failed to write {path}: {message}")]
    Io { path: String, message: String },
}

impl HttpError {
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::ConnectionReset(_))
    }
}
