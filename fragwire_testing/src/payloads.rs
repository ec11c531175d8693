//! Deterministic payloads and delivery orders for fragmentation tests.

/// Build a `len`-byte payload whose bytes encode their own offset.
///
/// Every 251-byte window is distinct, so misplaced fragments show up as a
/// content mismatch rather than an accidental match.
#[must_use]
pub fn patterned_payload(len: usize) -> Vec<u8> {
    (0..len)
        .map(|offset| u8::try_from(offset % 251).unwrap_or(u8::MAX))
        .collect()
}

/// Return `frames` rearranged so position `i` holds `frames[order[i]]`.
///
/// # Panics
///
/// Panics if `order` is not a permutation of `0..frames.len()`.
#[must_use]
pub fn reorder<T: Clone>(frames: &[T], order: &[usize]) -> Vec<T> {
    assert_eq!(order.len(), frames.len(), "order must cover every frame");
    let mut seen = vec![false; frames.len()];
    order
        .iter()
        .map(|&position| {
            assert!(!seen[position], "position {position} repeated");
            seen[position] = true;
            frames[position].clone()
        })
        .collect()
}
