//! Tests for fragment header and index accessors.

use rstest::rstest;

use crate::fragment::{FragmentHeader, FragmentIndex, MessageId};

#[test]
fn fragment_header_exposes_fields() {
    let header = FragmentHeader::new(MessageId::new(9), FragmentIndex::new(2), FragmentIndex::new(5));
    assert_eq!(header.message_id(), MessageId::new(9));
    assert_eq!(header.sequence(), FragmentIndex::new(2));
    assert_eq!(header.total(), FragmentIndex::new(5));
}

#[rstest]
#[case(0, Some(0))]
#[case(65_536, Some(65_536))]
#[case(u32::MAX as usize, Some(u32::MAX))]
#[case(u32::MAX as usize + 1, None)]
fn index_conversion_rejects_counts_beyond_u32(#[case] count: usize, #[case] expected: Option<u32>) {
    assert_eq!(
        FragmentIndex::try_from(count).ok().map(FragmentIndex::get),
        expected
    );
}

#[test]
fn index_slot_offset_matches_value() {
    assert_eq!(FragmentIndex::new(41).as_usize(), 41);
}
