use derive_more::{Display, From, Into};
use serde::{Deserialize, Serialize};

/// Identifier scoping one reassembly job on a connection.
///
/// Identifiers only need to be unique among the fragmented messages that are
/// in flight at the same time on one connection.
///
/// # Examples
///
/// ```
/// use fragwire::fragment::MessageId;
/// let id = MessageId::new(42);
/// assert_eq!(id.get(), 42);
/// ```
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Display, From, Into,
)]
#[serde(transparent)]
#[display("{_0}")]
pub struct MessageId(u64);

impl MessageId {
    /// First identifier a [`Fragmenter`](super::Fragmenter) hands out.
    ///
    /// Zero is skipped: peers that test the marker for truthiness would read a
    /// zero identifier as plain data.
    pub const FIRST: Self = Self(1);

    /// Create a new identifier.
    #[must_use]
    pub const fn new(value: u64) -> Self { Self(value) }

    /// Return the inner numeric identifier.
    #[must_use]
    pub const fn get(self) -> u64 { self.0 }
}
