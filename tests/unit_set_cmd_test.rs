mod common;

use citrinedb::core::{CitrineError, RespValue};
use common::*;

#[tokio::test]
async fn test_sadd_counts_only_new_members() {
    let state = test_state();
    assert_eq!(
        run_simple(&state, &["sadd", "s", "a", "b", "a"]).await.unwrap(),
        RespValue::Integer(2)
    );
    assert_eq!(
        run_simple(&state, &["sadd", "s", "b", "c"]).await.unwrap(),
        RespValue::Integer(1)
    );
    assert_eq!(run_simple(&state, &["scard", "s"]).await.unwrap(), RespValue::Integer(3));
}

#[tokio::test]
async fn test_sismember() {
    let state = test_state();
    run_simple(&state, &["sadd", "s", "a"]).await.unwrap();
    assert_eq!(
        run_simple(&state, &["sismember", "s", "a"]).await.unwrap(),
        RespValue::Integer(1)
    );
    assert_eq!(
        run_simple(&state, &["sismember", "s", "b"]).await.unwrap(),
        RespValue::Integer(0)
    );
    assert_eq!(
        run_simple(&state, &["sismember", "missing", "a"]).await.unwrap(),
        RespValue::Integer(0)
    );
}

#[tokio::test]
async fn test_smembers_holds_every_member() {
    let state = test_state();
    run_simple(&state, &["sadd", "s", "a", "b", "c"]).await.unwrap();
    let RespValue::Array(members) = run_simple(&state, &["smembers", "s"]).await.unwrap() else {
        panic!("expected array reply");
    };
    let mut found: Vec<_> = members
        .into_iter()
        .map(|m| match m {
            RespValue::BulkString(b) => b,
            other => panic!("unexpected element {other:?}"),
        })
        .collect();
    found.sort();
    assert_eq!(found, vec!["a", "b", "c"]);
}

#[tokio::test]
async fn test_srem_deletes_key_when_empty() {
    let state = test_state();
    run_simple(&state, &["sadd", "s", "a", "b"]).await.unwrap();
    assert_eq!(
        run_simple(&state, &["srem", "s", "a", "missing"]).await.unwrap(),
        RespValue::Integer(1)
    );
    run_simple(&state, &["srem", "s", "b"]).await.unwrap();
    assert_eq!(run_simple(&state, &["type", "s"]).await.unwrap(), simple("none"));
    assert_eq!(run_simple(&state, &["srem", "s", "a"]).await.unwrap(), RespValue::Integer(0));
}

#[tokio::test]
async fn test_set_commands_on_string_key_are_wrong_type() {
    let state = test_state();
    run_simple(&state, &["set", "str", "v"]).await.unwrap();
    let err = run_simple(&state, &["sadd", "str", "a"]).await.unwrap_err();
    assert!(matches!(err, CitrineError::WrongType));
    let err = run_simple(&state, &["smembers", "str"]).await.unwrap_err();
    assert!(matches!(err, CitrineError::WrongType));
}
