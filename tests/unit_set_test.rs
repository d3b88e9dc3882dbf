mod common;

use bytes::Bytes;
use citrinedb::core::commands::command_trait::ParseCommand;
use citrinedb::core::commands::string::{Set, SetCondition, TtlOption};
use citrinedb::core::protocol::RespFrame;
use citrinedb::core::{CitrineError, RespValue};
use common::*;
use std::time::Duration;

fn args(parts: &[&str]) -> Vec<RespFrame> {
    parts
        .iter()
        .map(|p| RespFrame::BulkString(Bytes::copy_from_slice(p.as_bytes())))
        .collect()
}

#[tokio::test]
async fn test_set_parse_plain() {
    let cmd = Set::parse(&args(&["k", "v"])).unwrap();
    assert_eq!(cmd.key, Bytes::from_static(b"k"));
    assert_eq!(cmd.value, Bytes::from_static(b"v"));
    assert_eq!(cmd.condition, SetCondition::None);
    assert_eq!(cmd.ttl, TtlOption::None);
}

#[tokio::test]
async fn test_set_parse_options() {
    let cmd = Set::parse(&args(&["k", "v", "EX", "10", "NX"])).unwrap();
    assert_eq!(cmd.ttl, TtlOption::Seconds(10));
    assert_eq!(cmd.condition, SetCondition::IfNotExists);

    let cmd = Set::parse(&args(&["k", "v", "px", "250", "xx"])).unwrap();
    assert_eq!(cmd.ttl, TtlOption::Milliseconds(250));
    assert_eq!(cmd.condition, SetCondition::IfExists);
}

#[tokio::test]
async fn test_set_parse_conflicting_options_is_syntax_error() {
    let err = Set::parse(&args(&["k", "v", "EX", "10", "PX", "500"])).unwrap_err();
    assert!(matches!(err, CitrineError::SyntaxError));

    let err = Set::parse(&args(&["k", "v", "NX", "XX"])).unwrap_err();
    assert!(matches!(err, CitrineError::SyntaxError));
}

#[tokio::test]
async fn test_set_parse_too_few_args() {
    let err = Set::parse(&args(&["k"])).unwrap_err();
    assert!(matches!(err, CitrineError::WrongArgumentCount(_)));
}

#[tokio::test]
async fn test_set_get_round_trip() {
    let state = test_state();
    assert_eq!(run_simple(&state, &["set", "k", "v"]).await.unwrap(), simple("OK"));
    assert_eq!(run_simple(&state, &["get", "k"]).await.unwrap(), bulk("v"));

    // The last SET wins.
    run_simple(&state, &["set", "k", "v2"]).await.unwrap();
    assert_eq!(run_simple(&state, &["get", "k"]).await.unwrap(), bulk("v2"));
}

#[tokio::test]
async fn test_get_absent_is_nil() {
    let state = test_state();
    assert_eq!(run_simple(&state, &["get", "nope"]).await.unwrap(), RespValue::Null);
}

#[tokio::test]
async fn test_set_nx_on_existing_key_is_nil() {
    let state = test_state();
    run_simple(&state, &["set", "k", "v"]).await.unwrap();
    assert_eq!(
        run_simple(&state, &["set", "k", "other", "NX"]).await.unwrap(),
        RespValue::Null
    );
    assert_eq!(run_simple(&state, &["get", "k"]).await.unwrap(), bulk("v"));
}

#[tokio::test]
async fn test_set_nx_on_absent_key_succeeds() {
    let state = test_state();
    assert_eq!(
        run_simple(&state, &["set", "k", "v", "NX"]).await.unwrap(),
        simple("OK")
    );
}

#[tokio::test]
async fn test_set_xx_on_absent_key_is_nil() {
    let state = test_state();
    assert_eq!(
        run_simple(&state, &["set", "k", "v", "XX"]).await.unwrap(),
        RespValue::Null
    );
    assert_eq!(run_simple(&state, &["get", "k"]).await.unwrap(), RespValue::Null);
}

#[tokio::test]
async fn test_set_on_list_key_is_wrong_type() {
    let state = test_state();
    run_simple(&state, &["rpush", "l", "a"]).await.unwrap();
    let err = run_simple(&state, &["set", "l", "v"]).await.unwrap_err();
    assert!(matches!(err, CitrineError::WrongType));

    let err = run_simple(&state, &["get", "l"]).await.unwrap_err();
    assert!(matches!(err, CitrineError::WrongType));
}

#[tokio::test]
async fn test_set_with_px_expires() {
    let state = test_state();
    run_simple(&state, &["set", "k", "v", "PX", "40"]).await.unwrap();
    assert_eq!(run_simple(&state, &["get", "k"]).await.unwrap(), bulk("v"));

    tokio::time::sleep(Duration::from_millis(80)).await;
    // Lazy expiration treats the key as absent and removes it.
    assert_eq!(run_simple(&state, &["get", "k"]).await.unwrap(), RespValue::Null);
    assert_eq!(run_simple(&state, &["del", "k"]).await.unwrap(), RespValue::Integer(0));
}

#[tokio::test]
async fn test_set_without_ttl_option_clears_deadline() {
    let state = test_state();
    run_simple(&state, &["set", "k", "v", "PX", "50"]).await.unwrap();
    run_simple(&state, &["set", "k", "v2"]).await.unwrap();

    tokio::time::sleep(Duration::from_millis(90)).await;
    // The replacement had no TTL option, so the old deadline is gone.
    assert_eq!(run_simple(&state, &["get", "k"]).await.unwrap(), bulk("v2"));
}
