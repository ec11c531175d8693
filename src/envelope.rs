//! Envelope types exchanged with the transport.
//!
//! Every transport delivery decodes into exactly one [`Envelope`]: a plain
//! application message, a fragment of a larger message, or a control signal.
//! The variant is decided once at decode time so the router never probes
//! application data for reserved fields.
//!
//! On the wire fragments and control signals are JSON objects keyed by the
//! reserved [`PEER_DATA_MARKER`] field:
//!
//! ```text
//! plain     <the message itself>
//! fragment  {"__peerData": 7, "n": 0, "total": 3, "data": "<base64>"}
//! control   {"__peerData": {"type": "close"}}
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    fragment::{
        FragmentFrame,
        FragmentHeader,
        FragmentIndex,
        MessageId,
        decode_fragment_payload,
        encode_fragment_payload,
    },
};

/// Reserved field name marking fragments and control signals.
pub const PEER_DATA_MARKER: &str = "__peerData";

/// Control signals carried in place of application data.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ControlTag {
    /// The peer is closing the connection.
    Close,
}

/// Decoded unit exchanged with the transport.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Envelope<M> {
    /// A complete application message without fragmentation metadata.
    Plain(M),
    /// One piece of an oversized message.
    Fragment(FragmentFrame),
    /// A connection-level control signal.
    Control(ControlTag),
}

/// Errors raised while converting envelopes to or from their wire form.
#[derive(Debug, Error)]
pub enum EnvelopeError {
    /// The envelope could not be serialized.
    #[error("failed to encode envelope: {0}")]
    Encode(#[source] serde_json::Error),
    /// The bytes did not hold a well-formed envelope.
    #[error("failed to decode envelope: {0}")]
    Decode(#[source] serde_json::Error),
    /// A fragment's text payload was not valid base64.
    #[error("invalid fragment payload: {0}")]
    Payload(#[from] base64::DecodeError),
}

#[derive(Serialize, Deserialize)]
pub(crate) struct ControlMarker {
    #[serde(rename = "type")]
    tag: ControlTag,
}

/// Serde view of an [`Envelope`].
///
/// Variant order matters: untagged deserialization tries each in turn, so
/// reserved shapes win over application data. An object holding the marker
/// that still lands in `Plain` is malformed and rejected by the decoder.
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
pub(crate) enum WireEnvelope<M> {
    Control {
        #[serde(rename = "__peerData")]
        marker: ControlMarker,
    },
    Fragment {
        #[serde(rename = "__peerData")]
        id: MessageId,
        n: FragmentIndex,
        total: FragmentIndex,
        data: String,
    },
    Plain(M),
}

impl<M> Envelope<M> {
    /// Wrap an application message.
    #[must_use]
    pub fn plain(message: M) -> Self { Self::Plain(message) }

    /// Build the close control signal.
    #[must_use]
    pub fn close() -> Self { Self::Control(ControlTag::Close) }

    pub(crate) fn to_wire(&self) -> WireEnvelope<&M> {
        match self {
            Self::Plain(message) => WireEnvelope::Plain(message),
            Self::Fragment(frame) => {
                let header = frame.header();
                WireEnvelope::Fragment {
                    id: header.message_id(),
                    n: header.sequence(),
                    total: header.total(),
                    data: encode_fragment_payload(frame.payload()),
                }
            }
            Self::Control(tag) => WireEnvelope::Control {
                marker: ControlMarker { tag: *tag },
            },
        }
    }

    pub(crate) fn from_wire(wire: WireEnvelope<M>) -> Result<Self, EnvelopeError> {
        Ok(match wire {
            WireEnvelope::Plain(message) => Self::Plain(message),
            WireEnvelope::Fragment { id, n, total, data } => {
                let payload = decode_fragment_payload(&data)?;
                Self::Fragment(FragmentFrame::new(FragmentHeader::new(id, n, total), payload))
            }
            WireEnvelope::Control { marker } => Self::Control(marker.tag),
        })
    }
}

/// Encoded bytes a fragment envelope needs beyond its text payload.
///
/// The figure assumes the widest possible identifier, sequence and total, so
/// it bounds every fragment this crate emits.
///
/// # Panics
///
/// Panics if serializing the constant worst-case envelope fails, which would
/// indicate a programmer error in the wire definition.
#[must_use]
pub fn fragment_overhead() -> usize {
    let wire: WireEnvelope<()> = WireEnvelope::Fragment {
        id: MessageId::new(u64::MAX),
        n: FragmentIndex::new(u32::MAX),
        total: FragmentIndex::new(u32::MAX),
        data: String::new(),
    };
    serde_json::to_vec(&wire)
        .map(|bytes| bytes.len())
        .unwrap_or_else(|err| panic!("fragment envelope encoding must be infallible: {err}"))
}
