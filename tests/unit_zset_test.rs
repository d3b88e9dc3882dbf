mod common;

use citrinedb::core::{CitrineError, RespValue};
use common::*;

#[tokio::test]
async fn test_zadd_counts_only_new_members() {
    let state = test_state();
    assert_eq!(
        run_simple(&state, &["zadd", "z", "1", "a", "2", "b"]).await.unwrap(),
        RespValue::Integer(2)
    );
    // Updating a score is not an addition.
    assert_eq!(
        run_simple(&state, &["zadd", "z", "5", "a"]).await.unwrap(),
        RespValue::Integer(0)
    );
    assert_eq!(run_simple(&state, &["zcard", "z"]).await.unwrap(), RespValue::Integer(2));
}

#[tokio::test]
async fn test_zscore() {
    let state = test_state();
    run_simple(&state, &["zadd", "z", "1.5", "a"]).await.unwrap();
    assert_eq!(run_simple(&state, &["zscore", "z", "a"]).await.unwrap(), bulk("1.5"));
    assert_eq!(run_simple(&state, &["zscore", "z", "b"]).await.unwrap(), RespValue::Null);
    assert_eq!(
        run_simple(&state, &["zscore", "missing", "a"]).await.unwrap(),
        RespValue::Null
    );

    run_simple(&state, &["zadd", "z", "3", "whole"]).await.unwrap();
    assert_eq!(run_simple(&state, &["zscore", "z", "whole"]).await.unwrap(), bulk("3"));
}

#[tokio::test]
async fn test_zrange_orders_by_score_then_member() {
    let state = test_state();
    run_simple(&state, &["zadd", "z", "2", "b", "1", "c", "1", "a"]).await.unwrap();
    assert_eq!(
        run_simple(&state, &["zrange", "z", "0", "-1"]).await.unwrap(),
        RespValue::Array(vec![bulk("a"), bulk("c"), bulk("b")])
    );
    assert_eq!(
        run_simple(&state, &["zrange", "z", "0", "0", "WITHSCORES"]).await.unwrap(),
        RespValue::Array(vec![bulk("a"), bulk("1")])
    );
    assert_eq!(
        run_simple(&state, &["zrange", "z", "5", "9"]).await.unwrap(),
        RespValue::Array(vec![])
    );
}

#[tokio::test]
async fn test_zadd_score_update_reorders() {
    let state = test_state();
    run_simple(&state, &["zadd", "z", "1", "a", "2", "b"]).await.unwrap();
    run_simple(&state, &["zadd", "z", "9", "a"]).await.unwrap();
    assert_eq!(
        run_simple(&state, &["zrange", "z", "0", "-1"]).await.unwrap(),
        RespValue::Array(vec![bulk("b"), bulk("a")])
    );
}

#[tokio::test]
async fn test_zrem_deletes_key_when_empty() {
    let state = test_state();
    run_simple(&state, &["zadd", "z", "1", "a", "2", "b"]).await.unwrap();
    assert_eq!(
        run_simple(&state, &["zrem", "z", "a", "missing"]).await.unwrap(),
        RespValue::Integer(1)
    );
    run_simple(&state, &["zrem", "z", "b"]).await.unwrap();
    assert_eq!(run_simple(&state, &["type", "z"]).await.unwrap(), simple("none"));
}

#[tokio::test]
async fn test_zadd_bad_score_is_not_a_float() {
    let state = test_state();
    let err = run_simple(&state, &["zadd", "z", "abc", "m"]).await.unwrap_err();
    assert!(matches!(err, CitrineError::NotAFloat));
}

#[tokio::test]
async fn test_zset_commands_on_string_key_are_wrong_type() {
    let state = test_state();
    run_simple(&state, &["set", "s", "v"]).await.unwrap();
    let err = run_simple(&state, &["zadd", "s", "1", "a"]).await.unwrap_err();
    assert!(matches!(err, CitrineError::WrongType));
}
