//! Tests for inbound reassembly ordering, completion and teardown.

use std::num::NonZeroUsize;

use rstest::{fixture, rstest};

use crate::fragment::{
    FragmentFrame,
    FragmentHeader,
    FragmentIndex,
    Fragmenter,
    MessageId,
    Reassembler,
    ReassemblyError,
};

fn header(message_id: u64, sequence: u32, total: u32) -> FragmentHeader {
    FragmentHeader::new(
        MessageId::new(message_id),
        FragmentIndex::new(sequence),
        FragmentIndex::new(total),
    )
}

#[fixture]
fn reassembler() -> Reassembler { Reassembler::new() }

fn split(payload: &[u8], cap: usize) -> Vec<FragmentFrame> {
    Fragmenter::new(NonZeroUsize::new(cap).expect("non-zero"))
        .fragment_bytes(payload)
        .expect("fragment payload")
        .into_fragments()
}

#[rstest]
fn single_fragment_completes_immediately(mut reassembler: Reassembler) {
    let complete = reassembler
        .push(header(1, 0, 1), [1_u8, 2, 3, 4])
        .expect("reassembly must succeed")
        .expect("single fragment should complete message");

    assert_eq!(complete.message_id(), MessageId::new(1));
    assert_eq!(complete.payload(), &[1, 2, 3, 4]);
    assert_eq!(reassembler.buffered_len(), 0);
}

#[rstest]
#[case(&[0, 1, 2])]
#[case(&[2, 1, 0])]
#[case(&[1, 2, 0])]
#[case(&[2, 0, 1])]
fn any_arrival_order_rebuilds_sequence_order(
    mut reassembler: Reassembler,
    #[case] order: &[usize],
) {
    let payload: Vec<u8> = (0..=200).collect();
    let frames = split(&payload, 70);
    assert_eq!(frames.len(), 3);

    let (last, head) = order.split_last().expect("non-empty order");
    for &position in head {
        let (header, bytes) = frames[position].clone().into_parts();
        assert!(reassembler.push(header, bytes).expect("accepted").is_none());
    }
    let (header, bytes) = frames[*last].clone().into_parts();
    let complete = reassembler
        .push(header, bytes)
        .expect("accepted")
        .expect("final fragment completes the message");
    assert_eq!(complete.into_payload(), payload);
}

#[rstest]
fn completed_id_starts_a_fresh_record(mut reassembler: Reassembler) {
    assert!(reassembler.push(header(5, 0, 2), [1_u8]).expect("accepted").is_none());
    let done = reassembler
        .push(header(5, 1, 2), [2_u8])
        .expect("accepted")
        .expect("complete");
    assert_eq!(done.payload(), &[1, 2]);
    assert!(!reassembler.is_buffering(MessageId::new(5)));

    assert!(reassembler.push(header(5, 1, 2), [9_u8]).expect("accepted").is_none());
    assert!(reassembler.is_buffering(MessageId::new(5)));
    let again = reassembler
        .push(header(5, 0, 2), [8_u8])
        .expect("accepted")
        .expect("complete");
    assert_eq!(again.payload(), &[8, 9]);
}

#[rstest]
fn interleaved_messages_complete_independently(mut reassembler: Reassembler) {
    assert!(reassembler.push(header(1, 1, 2), *b"lo").expect("ok").is_none());
    assert!(reassembler.push(header(2, 2, 3), *b"!").expect("ok").is_none());
    assert!(reassembler.push(header(2, 0, 3), *b"wor").expect("ok").is_none());
    assert_eq!(reassembler.buffered_len(), 2);

    let first = reassembler
        .push(header(1, 0, 2), *b"hel")
        .expect("ok")
        .expect("first message complete");
    assert_eq!(first.payload(), b"hello");

    let second = reassembler
        .push(header(2, 1, 3), *b"ld")
        .expect("ok")
        .expect("second message complete");
    assert_eq!(second.payload(), b"world!");
    assert_eq!(reassembler.buffered_len(), 0);
}

#[rstest]
fn repeated_fragment_overwrites_without_completing(mut reassembler: Reassembler) {
    assert!(reassembler.push(header(3, 0, 2), [1_u8]).expect("ok").is_none());
    assert!(reassembler.push(header(3, 0, 2), [7_u8]).expect("ok").is_none());
    assert!(reassembler.is_buffering(MessageId::new(3)));

    let complete = reassembler
        .push(header(3, 1, 2), [2_u8])
        .expect("ok")
        .expect("complete");
    assert_eq!(complete.payload(), &[7, 2]);
}

#[rstest]
fn accepts_zero_length_fragments(mut reassembler: Reassembler) {
    assert!(reassembler.push(header(44, 0, 2), Vec::<u8>::new()).expect("ok").is_none());
    let complete = reassembler
        .push(header(44, 1, 2), [7_u8, 8])
        .expect("ok")
        .expect("complete");
    assert_eq!(complete.payload(), &[7, 8]);
}

#[rstest]
fn first_seen_total_is_kept(mut reassembler: Reassembler) {
    assert!(reassembler.push(header(6, 0, 2), [1_u8]).expect("ok").is_none());
    let complete = reassembler
        .push(header(6, 1, 5), [2_u8])
        .expect("mismatched total is tolerated")
        .expect("two slots fill the record");
    assert_eq!(complete.payload(), &[1, 2]);
}

#[rstest]
fn out_of_range_sequence_is_rejected_without_losing_state(mut reassembler: Reassembler) {
    assert!(reassembler.push(header(7, 0, 2), [1_u8]).expect("ok").is_none());

    let err = reassembler
        .push(header(7, 2, 3), [3_u8])
        .expect_err("slot 2 does not exist");
    assert_eq!(
        err,
        ReassemblyError::SequenceOutOfRange {
            message_id: MessageId::new(7),
            sequence: FragmentIndex::new(2),
            total: FragmentIndex::new(2),
        }
    );
    assert!(reassembler.is_buffering(MessageId::new(7)));

    assert!(reassembler.push(header(7, 1, 2), [2_u8]).expect("ok").is_some());
}

#[rstest]
fn out_of_range_first_fragment_leaves_no_record(mut reassembler: Reassembler) {
    assert!(reassembler.push(header(8, 4, 2), [1_u8]).is_err());
    assert_eq!(reassembler.buffered_len(), 0);
}

#[rstest]
fn zero_total_is_rejected(mut reassembler: Reassembler) {
    let err = reassembler
        .push(header(9, 0, 0), [1_u8])
        .expect_err("zero total is malformed");
    assert_eq!(err, ReassemblyError::ZeroTotal { message_id: MessageId::new(9) });
    assert_eq!(reassembler.buffered_len(), 0);
}

#[test]
fn announced_total_is_bounded() {
    let mut reassembler = Reassembler::with_fragment_limit(FragmentIndex::new(4));
    let err = reassembler
        .push(header(10, 0, 5), [1_u8])
        .expect_err("too many fragments");
    assert!(matches!(err, ReassemblyError::TooManyFragments { .. }));
    assert!(reassembler.push(header(11, 0, 4), [1_u8]).expect("ok").is_none());
}

#[rstest]
fn clear_abandons_partial_messages(mut reassembler: Reassembler) {
    assert!(reassembler.push(header(12, 0, 3), [1_u8]).expect("ok").is_none());
    assert!(reassembler.push(header(13, 2, 3), [1_u8]).expect("ok").is_none());

    let mut abandoned = reassembler.clear();
    abandoned.sort_by_key(|id| id.get());
    assert_eq!(abandoned, vec![MessageId::new(12), MessageId::new(13)]);
    assert_eq!(reassembler.buffered_len(), 0);

    assert!(reassembler.push(header(12, 1, 3), [2_u8]).expect("ok").is_none());
    assert!(reassembler.push(header(12, 2, 3), [3_u8]).expect("ok").is_none());
}
