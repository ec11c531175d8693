use super::{FragmentIndex, MessageId};

/// Header describing a single fragment.
///
/// `FragmentHeader` is agnostic of the wire format. It carries the message
/// identity, the fragment's position and the number of fragments that make up
/// the message, which is enough for the receiver to place fragments arriving
/// in any order.
///
/// # Examples
///
/// ```
/// use fragwire::fragment::{FragmentHeader, FragmentIndex, MessageId};
/// let header = FragmentHeader::new(MessageId::new(7), FragmentIndex::zero(), FragmentIndex::new(3));
/// assert_eq!(header.message_id().get(), 7);
/// assert_eq!(header.sequence().get(), 0);
/// assert_eq!(header.total().get(), 3);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FragmentHeader {
    message_id: MessageId,
    sequence: FragmentIndex,
    total: FragmentIndex,
}

impl FragmentHeader {
    /// Create a new fragment header.
    #[must_use]
    pub const fn new(message_id: MessageId, sequence: FragmentIndex, total: FragmentIndex) -> Self {
        Self {
            message_id,
            sequence,
            total,
        }
    }

    /// Return the logical message identifier.
    #[must_use]
    pub const fn message_id(&self) -> MessageId { self.message_id }

    /// Return the fragment position relative to the message.
    #[must_use]
    pub const fn sequence(&self) -> FragmentIndex { self.sequence }

    /// Return the number of fragments making up the message.
    #[must_use]
    pub const fn total(&self) -> FragmentIndex { self.total }
}
