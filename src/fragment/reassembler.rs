//! Inbound helper that stitches fragments back into complete messages.
//!
//! [`Reassembler`] mirrors the outbound [`Fragmenter`](crate::fragment::Fragmenter)
//! by collecting fragment payloads keyed by [`MessageId`]. Each in-flight
//! message owns a fixed arena of `total` slots allocated when its first
//! fragment arrives, so fragments may land in any order. A record is removed
//! the moment its last empty slot is filled.
//!
//! There is no eviction: a message missing a fragment stays buffered until
//! [`Reassembler::clear`] is called, which the owning connection does on close.

use std::collections::{HashMap, hash_map::Entry};

use log::{debug, warn};

use super::{FragmentHeader, FragmentIndex, MessageId, ReassemblyError};

#[derive(Debug)]
struct PartialMessage {
    parts: Box<[Option<Vec<u8>>]>,
    received: usize,
    total: FragmentIndex,
}

impl PartialMessage {
    fn new(total: FragmentIndex) -> Self {
        Self {
            parts: vec![None; total.as_usize()].into_boxed_slice(),
            received: 0,
            total,
        }
    }

    /// Store `payload` at `sequence`, returning `true` once every slot is filled.
    fn store(&mut self, sequence: FragmentIndex, payload: Vec<u8>) -> bool {
        let slot = &mut self.parts[sequence.as_usize()];
        if slot.replace(payload).is_none() {
            self.received += 1;
        }
        self.received == self.parts.len()
    }

    fn into_buffer(self) -> Vec<u8> {
        let len = self.parts.iter().flatten().map(Vec::len).sum();
        let mut buffer = Vec::with_capacity(len);
        for part in self.parts.into_vec().into_iter().flatten() {
            buffer.extend_from_slice(&part);
        }
        buffer
    }
}

/// Container for a fully re-assembled message payload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReassembledMessage {
    message_id: MessageId,
    payload: Vec<u8>,
}

impl ReassembledMessage {
    /// Construct a new [`ReassembledMessage`].
    #[must_use]
    pub fn new(message_id: MessageId, payload: Vec<u8>) -> Self {
        Self {
            message_id,
            payload,
        }
    }

    /// Identifier shared by the fragments that formed this message.
    #[must_use]
    pub const fn message_id(&self) -> MessageId { self.message_id }

    /// Borrow the re-assembled payload.
    #[must_use]
    pub fn payload(&self) -> &[u8] { self.payload.as_slice() }

    /// Consume the message, returning the owned payload bytes.
    #[must_use]
    pub fn into_payload(self) -> Vec<u8> { self.payload }
}

/// Per-connection fragment re-assembler.
#[derive(Debug)]
pub struct Reassembler {
    fragment_limit: FragmentIndex,
    buffers: HashMap<MessageId, PartialMessage>,
}

impl Default for Reassembler {
    fn default() -> Self { Self::new() }
}

impl Reassembler {
    /// Largest fragment count a message may announce by default.
    pub const DEFAULT_FRAGMENT_LIMIT: FragmentIndex = FragmentIndex::new(1 << 16);

    /// Create an empty re-assembler using [`Self::DEFAULT_FRAGMENT_LIMIT`].
    #[must_use]
    pub fn new() -> Self { Self::with_fragment_limit(Self::DEFAULT_FRAGMENT_LIMIT) }

    /// Create an empty re-assembler that refuses messages announcing more
    /// than `fragment_limit` fragments.
    ///
    /// Slots are allocated up front from the announced total, so the limit
    /// bounds the memory a single first fragment can claim.
    #[must_use]
    pub fn with_fragment_limit(fragment_limit: FragmentIndex) -> Self {
        Self {
            fragment_limit,
            buffers: HashMap::new(),
        }
    }

    /// Process a fragment.
    ///
    /// Returns `Ok(Some(_))` when the fragment fills the last empty slot of its
    /// message and `Ok(None)` while more fragments are required. A fragment
    /// repeating an already filled position overwrites it without advancing
    /// completion.
    ///
    /// The first fragment seen for an identifier fixes the number of slots.
    /// Later fragments announcing a different total are still accepted
    /// against the original slot count.
    ///
    /// # Errors
    ///
    /// Returns [`ReassemblyError::ZeroTotal`] when a new message announces no
    /// fragments, [`ReassemblyError::TooManyFragments`] when it announces more
    /// than the configured limit, or [`ReassemblyError::SequenceOutOfRange`]
    /// when the fragment position does not fit the message's slots. None of
    /// these disturb fragments already buffered.
    pub fn push(
        &mut self,
        header: FragmentHeader,
        payload: impl Into<Vec<u8>>,
    ) -> Result<Option<ReassembledMessage>, ReassemblyError> {
        let message_id = header.message_id();
        let sequence = header.sequence();

        let mut entry = match self.buffers.entry(message_id) {
            Entry::Occupied(occupied) => {
                let recorded = occupied.get().total;
                if recorded != header.total() {
                    warn!(
                        "fragment total mismatch: message_id={message_id}, recorded={recorded}, \
                         found={}",
                        header.total()
                    );
                }
                occupied
            }
            Entry::Vacant(vacant) => {
                if header.total().get() == 0 {
                    return Err(ReassemblyError::ZeroTotal { message_id });
                }
                if header.total() > self.fragment_limit {
                    return Err(ReassemblyError::TooManyFragments {
                        message_id,
                        total: header.total(),
                        limit: self.fragment_limit,
                    });
                }
                vacant.insert_entry(PartialMessage::new(header.total()))
            }
        };

        let total = entry.get().total;
        if sequence >= total {
            if entry.get().received == 0 {
                entry.remove();
            }
            return Err(ReassemblyError::SequenceOutOfRange {
                message_id,
                sequence,
                total,
            });
        }

        if !entry.get_mut().store(sequence, payload.into()) {
            debug!(
                "stored fragment: message_id={message_id}, sequence={sequence}, received={}, \
                 total={total}",
                entry.get().received
            );
            return Ok(None);
        }

        let buffer = entry.remove().into_buffer();
        debug!(
            "reassembled message: message_id={message_id}, fragments={total}, bytes={}",
            buffer.len()
        );
        Ok(Some(ReassembledMessage::new(message_id, buffer)))
    }

    /// Drop every partially received message.
    ///
    /// Returns the identifiers that were abandoned.
    pub fn clear(&mut self) -> Vec<MessageId> {
        self.buffers.drain().map(|(message_id, _)| message_id).collect()
    }

    /// Number of partial messages currently buffered.
    #[must_use]
    pub fn buffered_len(&self) -> usize { self.buffers.len() }

    /// Report whether fragments of `message_id` are currently buffered.
    #[must_use]
    pub fn is_buffering(&self, message_id: MessageId) -> bool {
        self.buffers.contains_key(&message_id)
    }
}
