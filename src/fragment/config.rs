//! Configuration used by outbound fragmentation.

use std::num::NonZeroUsize;

use super::encoded_payload_len;
use crate::envelope::fragment_overhead;

/// Per-connection fragmentation setting.
///
/// `max_fragment_payload` is both the encoded message size above which a
/// message is split and the number of raw bytes each fragment carries. It
/// must already leave room for envelope metadata and text-encoding inflation;
/// [`FragmentationConfig::for_transport_mtu`] derives a value that does.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FragmentationConfig {
    /// Maximum number of raw message bytes carried by a single fragment.
    pub max_fragment_payload: NonZeroUsize,
}

impl FragmentationConfig {
    /// Chunk size used when nothing else is configured.
    pub const DEFAULT_MAX_FRAGMENT_PAYLOAD: NonZeroUsize =
        NonZeroUsize::new(16_300).expect("default fragment payload is non-zero");

    /// Build a configuration from an explicit payload cap.
    #[must_use]
    pub const fn new(max_fragment_payload: NonZeroUsize) -> Self {
        Self {
            max_fragment_payload,
        }
    }

    /// Derive a configuration whose fragment envelopes never exceed `mtu`.
    ///
    /// The cap accounts for the worst-case fragment metadata and for the
    /// base64 expansion of the payload. Returns `None` when `mtu` cannot fit
    /// even a single payload byte.
    ///
    /// # Examples
    ///
    /// ```
    /// use fragwire::fragment::FragmentationConfig;
    /// let cfg = FragmentationConfig::for_transport_mtu(1200).expect("mtu fits");
    /// assert!(cfg.encoded_fragment_ceiling() <= 1200);
    /// assert!(FragmentationConfig::for_transport_mtu(16).is_none());
    /// ```
    #[must_use]
    pub fn for_transport_mtu(mtu: usize) -> Option<Self> {
        let text_budget = mtu.checked_sub(fragment_overhead())?;
        let raw = text_budget / 4 * 3;
        NonZeroUsize::new(raw).map(Self::new)
    }

    /// Worst-case encoded size of one fragment envelope under this config.
    #[must_use]
    pub fn encoded_fragment_ceiling(&self) -> usize {
        fragment_overhead() + encoded_payload_len(self.max_fragment_payload.get())
    }
}

impl Default for FragmentationConfig {
    fn default() -> Self { Self::new(Self::DEFAULT_MAX_FRAGMENT_PAYLOAD) }
}
