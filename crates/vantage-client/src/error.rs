// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Client error types.

use std::fmt;
use std::time::Duration;

use thiserror::Error;
use vantage_proto::wire::WireError;
use vantage_query::QueryError;
use vantage_scene::SceneError;

/// Required wire fields that were absent, as dotted paths.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodeError {
    /// Every missing path, in discovery order.
    pub missing: Vec<String>,
}

impl DecodeError {
    pub(crate) fn is_empty(&self) -> bool {
        self.missing.is_empty()
    }

    pub(crate) fn record(&mut self, path: &str) {
        self.missing.push(path.to_string());
    }

    /// Passes `value` through, recording `path` when it is absent.
    pub(crate) fn require<T>(&mut self, value: Option<T>, path: &str) -> Option<T> {
        if value.is_none() {
            self.record(path);
        }
        value
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "missing required fields: {}", self.missing.join(", "))
    }
}

impl std::error::Error for DecodeError {}

/// Everything a session operation can fail with.
#[derive(Debug, Error)]
pub enum ClientError {
    /// A required wire field was absent.
    #[error(transparent)]
    Decode(#[from] DecodeError),
    /// A camera or pixel buffer could not be assembled.
    #[error("scene: {0}")]
    Scene(#[from] SceneError),
    /// A query or operation was malformed.
    #[error("query: {0}")]
    Query(#[from] QueryError),
    /// No matching response arrived in time.
    #[error("timed out after {timeout:?} waiting for {what}")]
    Timeout {
        /// What was awaited.
        what: String,
        /// Window that elapsed.
        timeout: Duration,
    },
    /// A hit result lacked an item id, point or normal.
    #[error("invalid hit response: {0}")]
    InvalidHitResponse(String),
    /// The renderer answered with an error.
    #[error("server error {code}: {message}")]
    Server {
        /// Status code.
        code: u32,
        /// Message.
        message: String,
    },
    /// The transport closed.
    #[error("connection closed")]
    Closed,
    /// Packet framing failed.
    #[error("wire: {0}")]
    Wire(#[from] WireError),
    /// Transport I/O failed.
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    /// A pixel buffer could not be decoded.
    #[error("pixels: {0}")]
    Pixels(String),
    /// The operation needs a frame and none has arrived.
    #[error("no frame received yet")]
    NoFrame,
}
