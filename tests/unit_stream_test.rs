mod common;

use citrinedb::core::storage::stream::{EntryIdSpec, StreamId};
use citrinedb::core::{CitrineError, RespValue};
use common::*;

#[test]
fn test_stream_id_parse_and_display_round_trip() {
    let id: StreamId = "1526919030474-55".parse().unwrap();
    assert_eq!(id, StreamId::new(1526919030474, 55));
    assert_eq!(id.to_string(), "1526919030474-55");

    // A bare millisecond part defaults its sequence by side.
    assert_eq!(
        StreamId::parse_with_default("7", 0).unwrap(),
        StreamId::new(7, 0)
    );
    assert_eq!(
        StreamId::parse_with_default("7", u64::MAX).unwrap(),
        StreamId::new(7, u64::MAX)
    );
}

#[test]
fn test_stream_id_ordering_follows_the_pair() {
    assert!(StreamId::new(1, 5) < StreamId::new(2, 0));
    assert!(StreamId::new(2, 0) < StreamId::new(2, 1));
    assert!(StreamId::MIN < StreamId::new(0, 1));
    assert!(StreamId::new(u64::MAX, u64::MAX - 1) < StreamId::MAX);
}

#[test]
fn test_stream_id_rejects_malformed_forms() {
    for bad in ["", "abc", "1-", "-5", "1-2-3", "1.5-0"] {
        assert!(
            bad.parse::<StreamId>().is_err(),
            "expected '{bad}' to be rejected"
        );
    }
}

#[test]
fn test_entry_id_spec_parse() {
    assert_eq!(EntryIdSpec::parse("*").unwrap(), EntryIdSpec::Auto);
    assert_eq!(EntryIdSpec::parse("5-*").unwrap(), EntryIdSpec::AutoSeq(5));
    assert_eq!(
        EntryIdSpec::parse("5-3").unwrap(),
        EntryIdSpec::Explicit(StreamId::new(5, 3))
    );
    assert_eq!(
        EntryIdSpec::parse("5").unwrap(),
        EntryIdSpec::Explicit(StreamId::new(5, 0))
    );
    assert!(EntryIdSpec::parse("*-1").is_err());
}

#[tokio::test]
async fn test_xadd_explicit_id_round_trips() {
    let state = test_state();
    assert_eq!(
        run_simple(&state, &["xadd", "s", "1-1", "f", "v"]).await.unwrap(),
        bulk("1-1")
    );
    assert_eq!(run_simple(&state, &["xlen", "s"]).await.unwrap(), RespValue::Integer(1));
}

#[tokio::test]
async fn test_xadd_equal_or_smaller_id_is_rejected() {
    let state = test_state();
    run_simple(&state, &["xadd", "s", "1-1", "f", "v"]).await.unwrap();
    let err = run_simple(&state, &["xadd", "s", "1-1", "f", "v"]).await.unwrap_err();
    assert!(matches!(err, CitrineError::StreamIdTooSmall));
    let err = run_simple(&state, &["xadd", "s", "0-5", "f", "v"]).await.unwrap_err();
    assert!(matches!(err, CitrineError::StreamIdTooSmall));
    assert_eq!(run_simple(&state, &["xlen", "s"]).await.unwrap(), RespValue::Integer(1));
}

#[tokio::test]
async fn test_xadd_zero_id_is_rejected_and_leaves_no_key() {
    let state = test_state();
    let err = run_simple(&state, &["xadd", "s", "0-0", "f", "v"]).await.unwrap_err();
    assert!(matches!(err, CitrineError::StreamIdZero));
    assert_eq!(run_simple(&state, &["type", "s"]).await.unwrap(), simple("none"));
}

#[tokio::test]
async fn test_xadd_auto_increments_sequence_when_clock_does_not_advance() {
    let state = test_state();
    // Pin the stream far in the future so `*` lands on the same millisecond.
    let future_ms = 99_999_999_999_999u64;
    let pinned = format!("{future_ms}-5");
    run_simple(&state, &["xadd", "s", &pinned, "f", "v"]).await.unwrap();

    let expected = format!("{future_ms}-6");
    assert_eq!(
        run_simple(&state, &["xadd", "s", "*", "f", "v"]).await.unwrap(),
        bulk(&expected)
    );
}

#[tokio::test]
async fn test_xadd_auto_sequence_rules() {
    let state = test_state();
    run_simple(&state, &["xadd", "s", "5-5", "f", "v"]).await.unwrap();

    // Same millisecond: the sequence continues.
    assert_eq!(
        run_simple(&state, &["xadd", "s", "5-*", "f", "v"]).await.unwrap(),
        bulk("5-6")
    );
    // A later millisecond restarts the sequence at zero.
    assert_eq!(
        run_simple(&state, &["xadd", "s", "9-*", "f", "v"]).await.unwrap(),
        bulk("9-0")
    );
    // An earlier millisecond can never be generated.
    let err = run_simple(&state, &["xadd", "s", "4-*", "f", "v"]).await.unwrap_err();
    assert!(matches!(err, CitrineError::StreamIdTooSmall));
}

#[tokio::test]
async fn test_xrange_is_inclusive_and_ordered() {
    let state = test_state();
    for id in ["1-1", "1-2", "2-1", "3-1"] {
        run_simple(&state, &["xadd", "s", id, "f", id]).await.unwrap();
    }

    let RespValue::Array(all) = run_simple(&state, &["xrange", "s", "-", "+"]).await.unwrap()
    else {
        panic!("expected array reply");
    };
    assert_eq!(all.len(), 4);
    assert_eq!(
        all[0],
        RespValue::Array(vec![bulk("1-1"), RespValue::Array(vec![bulk("f"), bulk("1-1")])])
    );

    // Inclusive explicit bounds.
    let RespValue::Array(mid) =
        run_simple(&state, &["xrange", "s", "1-2", "2-1"]).await.unwrap()
    else {
        panic!("expected array reply");
    };
    assert_eq!(mid.len(), 2);

    // A bare millisecond spans the whole millisecond on both ends.
    let RespValue::Array(ms_only) =
        run_simple(&state, &["xrange", "s", "1", "1"]).await.unwrap()
    else {
        panic!("expected array reply");
    };
    assert_eq!(ms_only.len(), 2);
}

#[tokio::test]
async fn test_xrange_count_and_absent_key() {
    let state = test_state();
    assert_eq!(
        run_simple(&state, &["xrange", "missing", "-", "+"]).await.unwrap(),
        RespValue::Array(vec![])
    );

    for id in ["1-1", "1-2", "1-3"] {
        run_simple(&state, &["xadd", "s", id, "f", "v"]).await.unwrap();
    }
    let RespValue::Array(limited) =
        run_simple(&state, &["xrange", "s", "-", "+", "COUNT", "2"]).await.unwrap()
    else {
        panic!("expected array reply");
    };
    assert_eq!(limited.len(), 2);
}

#[tokio::test]
async fn test_xread_returns_strictly_greater_entries() {
    let state = test_state();
    run_simple(&state, &["xadd", "s", "1-1", "f", "a"]).await.unwrap();
    run_simple(&state, &["xadd", "s", "2-2", "f", "b"]).await.unwrap();

    let reply = run_simple(&state, &["xread", "STREAMS", "s", "1-1"]).await.unwrap();
    assert_eq!(
        reply,
        RespValue::Array(vec![RespValue::Array(vec![
            bulk("s"),
            RespValue::Array(vec![RespValue::Array(vec![
                bulk("2-2"),
                RespValue::Array(vec![bulk("f"), bulk("b")]),
            ])]),
        ])])
    );
}

#[tokio::test]
async fn test_xread_with_no_new_entries_is_nil_array() {
    let state = test_state();
    run_simple(&state, &["xadd", "s", "1-1", "f", "a"]).await.unwrap();
    assert_eq!(
        run_simple(&state, &["xread", "STREAMS", "s", "1-1"]).await.unwrap(),
        RespValue::NullArray
    );
    assert_eq!(
        run_simple(&state, &["xread", "STREAMS", "missing", "0"]).await.unwrap(),
        RespValue::NullArray
    );
}

#[tokio::test]
async fn test_xread_over_multiple_streams_skips_quiet_ones() {
    let state = test_state();
    run_simple(&state, &["xadd", "a", "1-1", "f", "v"]).await.unwrap();
    run_simple(&state, &["xadd", "b", "1-1", "f", "v"]).await.unwrap();

    let RespValue::Array(per_stream) = run_simple(
        &state,
        &["xread", "STREAMS", "a", "b", "0", "1-1"],
    )
    .await
    .unwrap() else {
        panic!("expected array reply");
    };
    // Only stream "a" moved past the supplied id.
    assert_eq!(per_stream.len(), 1);
}

#[tokio::test]
async fn test_concurrent_xadd_ids_are_strictly_increasing() {
    let state = test_state();
    const TASKS: usize = 8;
    const PER_TASK: usize = 25;

    let mut handles = Vec::new();
    for _ in 0..TASKS {
        let state = state.clone();
        handles.push(tokio::spawn(async move {
            for _ in 0..PER_TASK {
                run_simple(&state, &["xadd", "s", "*", "f", "v"]).await.unwrap();
            }
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    assert_eq!(
        run_simple(&state, &["xlen", "s"]).await.unwrap(),
        RespValue::Integer((TASKS * PER_TASK) as i64)
    );

    // Insertion order and id order agree, with no duplicates.
    let RespValue::Array(entries) = run_simple(&state, &["xrange", "s", "-", "+"]).await.unwrap()
    else {
        panic!("expected array reply");
    };
    let ids: Vec<StreamId> = entries
        .iter()
        .map(|entry| match entry {
            RespValue::Array(parts) => match &parts[0] {
                RespValue::BulkString(id) => {
                    std::str::from_utf8(id).unwrap().parse().unwrap()
                }
                other => panic!("unexpected id element {other:?}"),
            },
            other => panic!("unexpected entry {other:?}"),
        })
        .collect();
    assert_eq!(ids.len(), TASKS * PER_TASK);
    for pair in ids.windows(2) {
        assert!(pair[0] < pair[1]);
    }
}

#[tokio::test]
async fn test_stream_commands_on_string_key_are_wrong_type() {
    let state = test_state();
    run_simple(&state, &["set", "s", "v"]).await.unwrap();
    let err = run_simple(&state, &["xadd", "s", "*", "f", "v"]).await.unwrap_err();
    assert!(matches!(err, CitrineError::WrongType));
    let err = run_simple(&state, &["xrange", "s", "-", "+"]).await.unwrap_err();
    assert!(matches!(err, CitrineError::WrongType));
}
