//! Error types emitted by the fragmentation layer.
//!
//! These enums keep both the outbound and inbound logic decoupled from the
//! wire format while still surfacing precise diagnostics for tests.

use thiserror::Error;

use super::{FragmentIndex, MessageId};

/// Errors produced while fragmenting outbound messages.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum FragmentationError {
    /// The fragment index cannot advance because it would overflow `u32`.
    #[error("fragment index overflow after {last}")]
    IndexOverflow { last: FragmentIndex },
}

/// Errors produced while re-assembling inbound fragments.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum ReassemblyError {
    /// A fragment opened a record while announcing zero fragments.
    #[error("message {message_id} announced zero fragments")]
    ZeroTotal { message_id: MessageId },
    /// A fragment opened a record announcing more fragments than allowed.
    #[error("message {message_id} announced {total} fragments, limit is {limit}")]
    TooManyFragments {
        message_id: MessageId,
        total: FragmentIndex,
        limit: FragmentIndex,
    },
    /// The fragment position lies outside the record's slot range.
    #[error("fragment {sequence} of message {message_id} is outside 0..{total}")]
    SequenceOutOfRange {
        message_id: MessageId,
        sequence: FragmentIndex,
        total: FragmentIndex,
    },
}
