//! Canonical error and result types for the crate.
//!
//! [`ConnectionError`] is the single surface returned by
//! [`BufferedConnection`](crate::connection::BufferedConnection). It wraps the
//! narrower errors raised by the envelope, fragmentation and routing layers.

use thiserror::Error;

use crate::{envelope::EnvelopeError, fragment::FragmentationError, router::RouterError};

/// Top-level error type exposed by `fragwire`.
#[derive(Debug, Error)]
pub enum ConnectionError {
    /// The connection was closed before the operation.
    #[error("connection is closed")]
    Closed,
    /// An outbound envelope could not be encoded.
    #[error(transparent)]
    Envelope(#[from] EnvelopeError),
    /// An outbound message could not be split.
    #[error(transparent)]
    Fragmentation(#[from] FragmentationError),
    /// An inbound delivery could not be routed.
    #[error(transparent)]
    Router(#[from] RouterError),
}

impl ConnectionError {
    /// Returns true if the error stems from malformed inbound bytes.
    #[must_use]
    pub fn is_decode_error(&self) -> bool {
        matches!(
            self,
            Self::Router(RouterError::Envelope(
                EnvelopeError::Decode(_) | EnvelopeError::Payload(_)
            ))
        )
    }
}

/// Canonical result alias used by `fragwire` public APIs.
pub type Result<T> = std::result::Result<T, ConnectionError>;
