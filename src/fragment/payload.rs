//! Text-safe encoding for fragment payloads carried inside envelopes.
//!
//! Envelopes travel as text, so raw fragment bytes are wrapped in standard
//! padded base64 before they are embedded. Base64 inflates data by a factor of
//! four thirds, which [`encoded_payload_len`] reports so callers can size
//! fragments against a transport MTU.

use base64::{DecodeError, Engine as _, engine::general_purpose::STANDARD};

/// Encode raw fragment bytes into their text form.
///
/// # Examples
///
/// ```
/// use fragwire::fragment::encode_fragment_payload;
/// assert_eq!(encode_fragment_payload(b"hi"), "aGk=");
/// ```
#[must_use]
pub fn encode_fragment_payload(payload: &[u8]) -> String { STANDARD.encode(payload) }

/// Decode the text form of a fragment payload back into raw bytes.
///
/// # Errors
///
/// Returns a [`DecodeError`] when `text` is not valid padded base64.
pub fn decode_fragment_payload(text: &str) -> Result<Vec<u8>, DecodeError> {
    STANDARD.decode(text)
}

/// Number of text bytes needed to carry `raw_len` payload bytes.
#[must_use]
pub const fn encoded_payload_len(raw_len: usize) -> usize { raw_len.div_ceil(3) * 4 }
