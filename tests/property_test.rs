use bytes::{Bytes, BytesMut};
use citrinedb::core::protocol::{RespFrame, RespFrameCodec};
use citrinedb::core::storage::stream::StreamId;
use citrinedb::core::storage::zset::SortedSet;
use proptest::prelude::*;
use tokio_util::codec::{Decoder, Encoder};

proptest! {
    /// Parsing the display form of any id yields the id back.
    #[test]
    fn stream_id_display_parse_round_trip(ms in any::<u64>(), seq in any::<u64>()) {
        let id = StreamId::new(ms, seq);
        let parsed: StreamId = id.to_string().parse().unwrap();
        prop_assert_eq!(parsed, id);
    }

    /// Id ordering agrees with ordering on the (ms, seq) pair.
    #[test]
    fn stream_id_order_matches_pair_order(
        a in any::<(u64, u64)>(),
        b in any::<(u64, u64)>(),
    ) {
        let ida = StreamId::new(a.0, a.1);
        let idb = StreamId::new(b.0, b.1);
        prop_assert_eq!(ida.cmp(&idb), a.cmp(&b));
    }

    /// Rank ranges never panic and match a naive model of inclusive,
    /// clamped, negative-index selection.
    #[test]
    fn zset_range_by_rank_matches_naive_model(
        members in proptest::collection::btree_set("[a-z]{1,4}", 0..12),
        start in -20i64..20,
        stop in -20i64..20,
    ) {
        let mut zset = SortedSet::new();
        let sorted: Vec<String> = members.iter().cloned().collect();
        for (i, member) in sorted.iter().enumerate() {
            zset.insert(i as f64, Bytes::from(member.clone()));
        }

        let len = sorted.len() as i64;
        let lo = (if start < 0 { len + start } else { start }).max(0);
        let hi = (if stop < 0 { len + stop } else { stop }).min(len - 1);
        let expected: Vec<&String> = if len == 0 || lo > hi {
            vec![]
        } else {
            sorted[lo as usize..=hi as usize].iter().collect()
        };

        let actual = zset.range_by_rank(start, stop);
        prop_assert_eq!(actual.len(), expected.len());
        for ((member, _score), want) in actual.iter().zip(expected) {
            prop_assert_eq!(&member[..], want.as_bytes());
        }
    }

    /// Any bulk payload survives an encode/decode cycle byte for byte.
    #[test]
    fn resp_bulk_string_round_trip(payload in proptest::collection::vec(any::<u8>(), 0..512)) {
        let frame = RespFrame::BulkString(Bytes::from(payload));
        let mut buf = BytesMut::new();
        RespFrameCodec.encode(frame.clone(), &mut buf).unwrap();
        let decoded = RespFrameCodec.decode(&mut buf).unwrap().unwrap();
        prop_assert_eq!(decoded, frame);
    }
}
