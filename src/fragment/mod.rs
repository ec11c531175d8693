//! Fragment primitives for transparent message splitting.
//!
//! This module collects the domain types used by the fragmentation and
//! re-assembly layer. Each sub-module focuses on a single concept to keep the
//! code small and easy to audit while still providing a cohesive API at the
//! crate root.

pub mod config;
pub mod error;
pub mod fragmenter;
pub mod header;
pub mod id;
pub mod index;
pub mod payload;
pub mod reassembler;

pub use config::FragmentationConfig;
pub use error::{FragmentationError, ReassemblyError};
pub use fragmenter::{FragmentBatch, FragmentFrame, Fragmenter};
pub use header::FragmentHeader;
pub use id::MessageId;
pub use index::FragmentIndex;
pub use payload::{decode_fragment_payload, encode_fragment_payload, encoded_payload_len};
pub use reassembler::{ReassembledMessage, Reassembler};

#[cfg(test)]
mod tests;
