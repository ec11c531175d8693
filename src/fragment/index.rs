//! Zero-based fragment positioning within logical messages.
//!
//! Provides [`FragmentIndex`], a type-safe wrapper around `u32` used both for
//! a fragment's `sequence` and for the `total` fragment count of its message.

use std::num::TryFromIntError;

use derive_more::{Display, From};
use serde::{Deserialize, Serialize};

/// Zero-based ordinal describing a fragment's position within its message.
///
/// # Examples
///
/// ```
/// use fragwire::fragment::FragmentIndex;
/// let index = FragmentIndex::new(3);
/// assert_eq!(index.get(), 3);
/// assert_eq!(index.as_usize(), 3);
/// ```
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    From,
)]
#[serde(transparent)]
#[display("{_0}")]
pub struct FragmentIndex(u32);

impl FragmentIndex {
    /// Construct an index from a `u32` value.
    #[must_use]
    pub const fn new(value: u32) -> Self { Self(value) }

    /// Return the first valid fragment index.
    #[must_use]
    pub const fn zero() -> Self { Self(0) }

    /// Return the underlying numeric value.
    #[must_use]
    pub const fn get(self) -> u32 { self.0 }

    /// Return the value as a slot offset.
    #[must_use]
    pub fn as_usize(self) -> usize {
        // u32 always fits in usize on the 32- and 64-bit targets we build for.
        usize::try_from(self.0).unwrap_or(usize::MAX)
    }
}

impl TryFrom<usize> for FragmentIndex {
    type Error = TryFromIntError;

    fn try_from(value: usize) -> Result<Self, Self::Error> { u32::try_from(value).map(Self) }
}

impl From<FragmentIndex> for u32 {
    fn from(value: FragmentIndex) -> Self { value.0 }
}
