#![doc(html_root_url = "https://docs.rs/fragwire/latest")]
//! Public API for the `fragwire` library.
//!
//! This crate carries application messages of any size over transports that
//! only accept payloads up to a fixed MTU. Oversized messages are split into
//! self-describing fragment envelopes; the receiving side buffers fragments
//! per message and hands the rebuilt message to the same decode path used
//! for messages that were never split.

pub mod config;
pub mod connection;
pub mod envelope;
pub mod error;
pub mod fragment;
pub mod message;
pub mod router;

pub use config::SerializationFormat;
pub use connection::{BufferedConnection, DataHandler, Transport};
pub use envelope::{ControlTag, Envelope, EnvelopeError, PEER_DATA_MARKER};
pub use error::{ConnectionError, Result};
pub use fragment::{
    FragmentBatch,
    FragmentFrame,
    FragmentHeader,
    FragmentIndex,
    FragmentationConfig,
    FragmentationError,
    Fragmenter,
    MessageId,
    ReassembledMessage,
    Reassembler,
    ReassemblyError,
};
pub use message::Message;
pub use router::{MAX_REENTRY_DEPTH, MessageRouter, Routed, RouterError};
