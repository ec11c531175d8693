//! Splitter for encoded messages that exceed the per-send payload cap.
//!
//! A [`Fragmenter`] cuts a byte buffer into contiguous slices no longer than
//! its cap. Every slice travels as a [`FragmentFrame`] whose header repeats the
//! message identity and fragment count, so the receiving side can rebuild the
//! buffer regardless of arrival order. Identities come from a per-fragmenter
//! counter; one fragmenter per connection keeps in-flight ids distinct.

use std::{
    num::NonZeroUsize,
    sync::atomic::{AtomicU64, Ordering},
};

use super::{FragmentHeader, FragmentIndex, FragmentationError, MessageId};

/// Cuts buffers into capped slices tagged with a fresh [`MessageId`].
#[derive(Debug)]
pub struct Fragmenter {
    max_fragment_size: NonZeroUsize,
    id_counter: AtomicU64,
}

impl Fragmenter {
    /// Fragmenter with a `max_fragment_size` byte cap, numbering messages from
    /// [`MessageId::FIRST`].
    #[must_use]
    pub const fn new(max_fragment_size: NonZeroUsize) -> Self {
        Self::with_starting_id(max_fragment_size, MessageId::FIRST)
    }

    /// Fragmenter whose first generated id is `start_at`.
    #[must_use]
    pub const fn with_starting_id(max_fragment_size: NonZeroUsize, start_at: MessageId) -> Self {
        Self {
            max_fragment_size,
            id_counter: AtomicU64::new(start_at.get()),
        }
    }

    #[must_use]
    pub const fn max_fragment_size(&self) -> NonZeroUsize { self.max_fragment_size }

    /// Take the next id from the counter.
    ///
    /// # Panics
    ///
    /// Panics once the counter has handed out `u64::MAX - 1`; wrapping would
    /// reuse ids of messages that may still be in flight.
    #[must_use]
    pub fn next_message_id(&self) -> MessageId {
        let taken = self
            .id_counter
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |id| id.checked_add(1))
            .unwrap_or_else(|_| panic!("message id counter exhausted"));
        MessageId::new(taken)
    }

    /// Split `payload` under a freshly generated id.
    ///
    /// `total` is the ceiling of `len / cap`. An empty buffer still produces one
    /// empty fragment with a total of one.
    ///
    /// # Errors
    ///
    /// Returns [`FragmentationError::IndexOverflow`] if more than `u32::MAX`
    /// fragments are required.
    pub fn fragment_bytes(
        &self,
        payload: impl AsRef<[u8]>,
    ) -> Result<FragmentBatch, FragmentationError> {
        let message_id = self.next_message_id();
        self.fragment_with_id(message_id, payload)
    }

    /// Split `payload` under a caller-chosen id. The counter is left alone.
    ///
    /// # Errors
    ///
    /// [`FragmentationError::IndexOverflow`] when the count does not fit a
    /// `u32`.
    pub fn fragment_with_id(
        &self,
        message_id: MessageId,
        payload: impl AsRef<[u8]>,
    ) -> Result<FragmentBatch, FragmentationError> {
        let payload = payload.as_ref();
        let cap = self.max_fragment_size.get();
        let total = FragmentIndex::try_from(payload.len().div_ceil(cap).max(1)).map_err(|_| {
            FragmentationError::IndexOverflow {
                last: FragmentIndex::new(u32::MAX),
            }
        })?;

        let slices: Vec<&[u8]> = if payload.is_empty() {
            vec![payload]
        } else {
            payload.chunks(cap).collect()
        };
        let frames = (0..total.get())
            .zip(slices)
            .map(|(sequence, slice)| {
                let header = FragmentHeader::new(message_id, FragmentIndex::new(sequence), total);
                FragmentFrame::new(header, slice.to_vec())
            })
            .collect();

        Ok(FragmentBatch::new(message_id, frames))
    }
}

/// One slice of a split message together with its placement header.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FragmentFrame {
    header: FragmentHeader,
    payload: Vec<u8>,
}

impl FragmentFrame {
    #[must_use]
    pub fn new(header: FragmentHeader, payload: Vec<u8>) -> Self { Self { header, payload } }

    #[must_use]
    pub fn header(&self) -> &FragmentHeader { &self.header }

    /// Raw bytes of this slice, before any wire encoding.
    #[must_use]
    pub fn payload(&self) -> &[u8] { self.payload.as_slice() }

    /// Split into header and owned bytes, as the reassembler stores them.
    #[must_use]
    pub fn into_parts(self) -> (FragmentHeader, Vec<u8>) { (self.header, self.payload) }
}

/// Frames of one split message, ordered by sequence.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FragmentBatch {
    message_id: MessageId,
    fragments: Vec<FragmentFrame>,
}

impl FragmentBatch {
    fn new(message_id: MessageId, fragments: Vec<FragmentFrame>) -> Self {
        debug_assert!(!fragments.is_empty(), "a split always yields a frame");
        Self {
            message_id,
            fragments,
        }
    }

    /// Id stamped on every frame of the batch.
    #[must_use]
    pub const fn message_id(&self) -> MessageId { self.message_id }

    #[must_use]
    pub fn fragments(&self) -> &[FragmentFrame] { self.fragments.as_slice() }

    /// Equals the `total` carried by each frame.
    #[expect(
        clippy::len_without_is_empty,
        reason = "a batch holds at least one frame"
    )]
    #[must_use]
    pub fn len(&self) -> usize { self.fragments.len() }

    /// True when the buffer did not fit a single frame.
    #[must_use]
    pub fn is_fragmented(&self) -> bool { self.len() > 1 }

    #[must_use]
    pub fn into_fragments(self) -> Vec<FragmentFrame> { self.fragments }
}

impl IntoIterator for FragmentBatch {
    type Item = FragmentFrame;
    type IntoIter = std::vec::IntoIter<FragmentFrame>;

    fn into_iter(self) -> Self::IntoIter { self.fragments.into_iter() }
}
