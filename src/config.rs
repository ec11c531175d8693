//! Wire format configuration.
//!
//! [`SerializationFormat`] selects how envelopes are encoded before they are
//! handed to the transport and how inbound bytes are decoded back into
//! envelopes.

use serde::{Serialize, de::Error as _};

use crate::{
    envelope::{Envelope, EnvelopeError, PEER_DATA_MARKER, WireEnvelope},
    message::Message,
};

/// Serialization formats supported by `fragwire`.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SerializationFormat {
    /// UTF-8 JSON text with base64 fragment payloads.
    #[default]
    Json,
}

impl SerializationFormat {
    /// Encode an envelope into bytes for the transport.
    ///
    /// # Errors
    ///
    /// Returns [`EnvelopeError::Encode`] if the message cannot be serialized.
    pub fn encode_envelope<M: Serialize>(
        self,
        envelope: &Envelope<M>,
    ) -> Result<Vec<u8>, EnvelopeError> {
        match self {
            SerializationFormat::Json => {
                serde_json::to_vec(&envelope.to_wire()).map_err(EnvelopeError::Encode)
            }
        }
    }

    /// Decode bytes received from the transport into an envelope.
    ///
    /// # Errors
    ///
    /// Returns [`EnvelopeError::Decode`] for malformed input, including objects
    /// that carry the reserved marker without forming a valid fragment or
    /// control signal. Returns [`EnvelopeError::Payload`] when a fragment
    /// carries invalid base64.
    pub fn decode_envelope<M: Message>(
        self,
        bytes: &[u8],
    ) -> Result<Envelope<M>, EnvelopeError> {
        match self {
            SerializationFormat::Json => {
                let value: serde_json::Value =
                    serde_json::from_slice(bytes).map_err(EnvelopeError::Decode)?;
                let reserved = value.get(PEER_DATA_MARKER).is_some();
                let wire: WireEnvelope<M> =
                    serde_json::from_value(value).map_err(EnvelopeError::Decode)?;
                if reserved && matches!(wire, WireEnvelope::Plain(_)) {
                    return Err(EnvelopeError::Decode(serde_json::Error::custom(format!(
                        "malformed `{PEER_DATA_MARKER}` envelope"
                    ))));
                }
                Envelope::from_wire(wire)
            }
        }
    }
}
