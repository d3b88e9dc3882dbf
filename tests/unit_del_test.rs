mod common;

use citrinedb::core::RespValue;
use common::*;

#[tokio::test]
async fn test_del_counts_existing_keys() {
    let state = test_state();
    run_simple(&state, &["set", "a", "1"]).await.unwrap();
    run_simple(&state, &["set", "b", "2"]).await.unwrap();
    assert_eq!(
        run_simple(&state, &["del", "a", "b", "missing"]).await.unwrap(),
        RespValue::Integer(2)
    );
    assert_eq!(run_simple(&state, &["get", "a"]).await.unwrap(), RespValue::Null);
}

#[tokio::test]
async fn test_del_twice_counts_zero() {
    let state = test_state();
    run_simple(&state, &["set", "k", "v"]).await.unwrap();
    assert_eq!(run_simple(&state, &["del", "k"]).await.unwrap(), RespValue::Integer(1));
    assert_eq!(run_simple(&state, &["get", "k"]).await.unwrap(), RespValue::Null);
    assert_eq!(run_simple(&state, &["del", "k"]).await.unwrap(), RespValue::Integer(0));
}

#[tokio::test]
async fn test_exists_counts_per_mention() {
    let state = test_state();
    run_simple(&state, &["set", "k", "v"]).await.unwrap();
    assert_eq!(
        run_simple(&state, &["exists", "k", "k", "missing"]).await.unwrap(),
        RespValue::Integer(2)
    );
}

#[tokio::test]
async fn test_type_reports_every_kind() {
    let state = test_state();
    run_simple(&state, &["set", "str", "v"]).await.unwrap();
    run_simple(&state, &["rpush", "lst", "v"]).await.unwrap();
    run_simple(&state, &["hset", "hsh", "f", "v"]).await.unwrap();
    run_simple(&state, &["sadd", "st", "v"]).await.unwrap();
    run_simple(&state, &["zadd", "zst", "1", "v"]).await.unwrap();
    run_simple(&state, &["xadd", "strm", "1-1", "f", "v"]).await.unwrap();

    for (key, kind) in [
        ("str", "string"),
        ("lst", "list"),
        ("hsh", "hash"),
        ("st", "set"),
        ("zst", "zset"),
        ("strm", "stream"),
        ("missing", "none"),
    ] {
        assert_eq!(run_simple(&state, &["type", key]).await.unwrap(), simple(kind));
    }
}

#[tokio::test]
async fn test_dbsize_tracks_live_keys() {
    let state = test_state();
    assert_eq!(run_simple(&state, &["dbsize"]).await.unwrap(), RespValue::Integer(0));
    run_simple(&state, &["set", "a", "1"]).await.unwrap();
    run_simple(&state, &["rpush", "b", "x"]).await.unwrap();
    assert_eq!(run_simple(&state, &["dbsize"]).await.unwrap(), RespValue::Integer(2));
    run_simple(&state, &["del", "a", "b"]).await.unwrap();
    assert_eq!(run_simple(&state, &["dbsize"]).await.unwrap(), RespValue::Integer(0));
}
