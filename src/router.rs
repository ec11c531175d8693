//! Shared decode-and-route path for inbound deliveries.
//!
//! [`MessageRouter`] turns raw transport bytes into a [`Routed`] outcome.
//! Fragments are fed to the connection's [`Reassembler`]; when one completes a
//! message the reconstructed buffer runs through the same decode step again,
//! so a rebuilt message may itself turn out to be a control signal. The
//! re-entry is an explicit loop rather than recursion.

use std::borrow::Cow;

use log::debug;
use thiserror::Error;

use crate::{
    config::SerializationFormat,
    envelope::{ControlTag, Envelope, EnvelopeError},
    fragment::{Reassembler, ReassemblyError},
    message::Message,
};

/// Number of reconstructed buffers a single delivery may pass back through
/// the router.
pub const MAX_REENTRY_DEPTH: usize = 4;

/// Outcome of routing one delivery.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Routed<M> {
    /// A complete application message is available.
    Data(M),
    /// The peer asked to close the connection.
    Close,
    /// A fragment was buffered; nothing is available yet.
    Pending,
}

/// Errors raised while routing a delivery.
#[derive(Debug, Error)]
pub enum RouterError {
    /// The delivery or a reconstructed buffer was not a valid envelope.
    #[error(transparent)]
    Envelope(#[from] EnvelopeError),
    /// A fragment could not be placed in its message.
    #[error(transparent)]
    Reassembly(#[from] ReassemblyError),
    /// Reconstructed buffers kept decoding into further fragments.
    #[error("reconstructed message nested deeper than {depth} levels")]
    NestingTooDeep { depth: usize },
}

/// Decodes deliveries and classifies them as data, control or pending.
#[derive(Clone, Copy, Debug, Default)]
pub struct MessageRouter {
    format: SerializationFormat,
}

impl MessageRouter {
    /// Create a router decoding with `format`.
    #[must_use]
    pub const fn new(format: SerializationFormat) -> Self { Self { format } }

    /// Return the wire format used for decoding.
    #[must_use]
    pub const fn format(&self) -> SerializationFormat { self.format }

    /// Route one raw delivery.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError`] when the bytes (or a buffer rebuilt from
    /// fragments) are not a valid envelope, when a fragment does not fit its
    /// message, or when rebuilt buffers nest beyond [`MAX_REENTRY_DEPTH`].
    pub fn dispatch<M: Message>(
        &self,
        raw: &[u8],
        reassembler: &mut Reassembler,
    ) -> Result<Routed<M>, RouterError> {
        let mut buffer = Cow::Borrowed(raw);
        let mut depth = 0;

        loop {
            let frame = match self.format.decode_envelope::<M>(&buffer)? {
                Envelope::Plain(message) => return Ok(Routed::Data(message)),
                Envelope::Control(ControlTag::Close) => return Ok(Routed::Close),
                Envelope::Fragment(frame) => frame,
            };

            if depth == MAX_REENTRY_DEPTH {
                return Err(RouterError::NestingTooDeep { depth });
            }

            let (header, payload) = frame.into_parts();
            let Some(message) = reassembler.push(header, payload)? else {
                return Ok(Routed::Pending);
            };

            depth += 1;
            debug!(
                "re-routing reassembled message: message_id={}, depth={depth}",
                message.message_id()
            );
            buffer = Cow::Owned(message.into_payload());
        }
    }
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroUsize;

    use serde_json::{Value, json};

    use super::*;
    use crate::fragment::{FragmentFrame, Fragmenter};

    fn encode(envelope: &Envelope<Value>) -> Vec<u8> {
        SerializationFormat::Json
            .encode_envelope(envelope)
            .expect("encode envelope")
    }

    fn split(bytes: &[u8], cap: usize) -> Vec<Vec<u8>> {
        let fragmenter = Fragmenter::new(NonZeroUsize::new(cap).expect("non-zero"));
        fragmenter
            .fragment_bytes(bytes)
            .expect("fragment bytes")
            .into_iter()
            .map(|frame: FragmentFrame| encode(&Envelope::Fragment(frame)))
            .collect()
    }

    #[test]
    fn plain_messages_route_as_data() {
        let router = MessageRouter::default();
        let mut reassembler = Reassembler::new();
        let raw = encode(&Envelope::plain(json!({ "hello": "world" })));

        let routed: Routed<Value> = router.dispatch(&raw, &mut reassembler).expect("route");
        assert_eq!(routed, Routed::Data(json!({ "hello": "world" })));
    }

    #[test]
    fn malformed_bytes_surface_decode_error() {
        let router = MessageRouter::default();
        let mut reassembler = Reassembler::new();
        let err = router
            .dispatch::<Value>(b"{not json", &mut reassembler)
            .expect_err("malformed input must fail");
        assert!(matches!(err, RouterError::Envelope(EnvelopeError::Decode(_))));
    }

    #[test]
    fn fragments_route_as_pending_until_complete() {
        let router = MessageRouter::default();
        let mut reassembler = Reassembler::new();
        let message = json!({ "text": "x".repeat(40) });
        let frames = split(&encode(&Envelope::plain(message.clone())), 16);
        let (last, head) = frames.split_last().expect("several fragments");

        for frame in head {
            let routed: Routed<Value> = router.dispatch(frame, &mut reassembler).expect("route");
            assert_eq!(routed, Routed::Pending);
        }
        let routed: Routed<Value> = router.dispatch(last, &mut reassembler).expect("route");
        assert_eq!(routed, Routed::Data(message));
        assert_eq!(reassembler.buffered_len(), 0);
    }

    #[test]
    fn reassembled_close_signal_routes_as_close() {
        let router = MessageRouter::default();
        let mut reassembler = Reassembler::new();
        let frames = split(&encode(&Envelope::close()), 4);

        let mut outcomes = Vec::new();
        for frame in &frames {
            outcomes.push(router.dispatch::<Value>(frame, &mut reassembler).expect("route"));
        }
        assert_eq!(outcomes.pop(), Some(Routed::Close));
        assert!(outcomes.iter().all(|routed| *routed == Routed::Pending));
    }

    #[test]
    fn nested_fragments_are_rebuilt_in_a_loop() {
        let router = MessageRouter::default();
        let mut reassembler = Reassembler::new();
        let inner = encode(&Envelope::plain(json!("nested")));
        let mut wrapped = split(&inner, usize::MAX).remove(0);
        for _ in 0..MAX_REENTRY_DEPTH - 1 {
            wrapped = split(&wrapped, usize::MAX).remove(0);
        }

        let routed: Routed<Value> = router.dispatch(&wrapped, &mut reassembler).expect("route");
        assert_eq!(routed, Routed::Data(json!("nested")));
    }

    #[test]
    fn nesting_beyond_limit_is_rejected() {
        let router = MessageRouter::default();
        let mut reassembler = Reassembler::new();
        let mut wrapped = encode(&Envelope::plain(json!("nested")));
        for _ in 0..=MAX_REENTRY_DEPTH {
            wrapped = split(&wrapped, usize::MAX).remove(0);
        }

        let err = router
            .dispatch::<Value>(&wrapped, &mut reassembler)
            .expect_err("nesting must be bounded");
        assert!(matches!(
            err,
            RouterError::NestingTooDeep {
                depth: MAX_REENTRY_DEPTH
            }
        ));
    }
}
