mod common;

use citrinedb::core::CitrineError;
use citrinedb::core::RespValue;
use citrinedb::core::commands::command_trait::ParseCommand;
use citrinedb::core::commands::generic::Ping;
use common::*;

#[tokio::test]
async fn test_ping_without_message() {
    let state = test_state();
    let reply = run_simple(&state, &["ping"]).await.unwrap();
    assert_eq!(reply, simple("PONG"));
}

#[tokio::test]
async fn test_ping_with_message() {
    let state = test_state();
    let reply = run_simple(&state, &["ping", "hello"]).await.unwrap();
    assert_eq!(reply, bulk("hello"));
}

#[tokio::test]
async fn test_ping_rejects_two_arguments() {
    let err = Ping::parse(&[
        citrinedb::core::protocol::RespFrame::BulkString("a".into()),
        citrinedb::core::protocol::RespFrame::BulkString("b".into()),
    ])
    .unwrap_err();
    assert!(matches!(err, CitrineError::WrongArgumentCount(_)));
}

#[tokio::test]
async fn test_ping_is_case_insensitive() {
    let state = test_state();
    let reply = run_simple(&state, &["PiNg"]).await.unwrap();
    assert_eq!(reply, simple("PONG"));
}

#[tokio::test]
async fn test_echo_round_trips_message() {
    let state = test_state();
    let reply = run_simple(&state, &["echo", "payload"]).await.unwrap();
    assert_eq!(reply, bulk("payload"));
}

#[tokio::test]
async fn test_unknown_command_is_an_error() {
    let state = test_state();
    let err = run_simple(&state, &["frobnicate", "x"]).await.unwrap_err();
    assert!(matches!(err, CitrineError::UnknownCommand(name) if name == "frobnicate"));
}

#[tokio::test]
async fn test_quit_replies_ok_when_executed() {
    let state = test_state();
    let reply = run_simple(&state, &["quit"]).await.unwrap();
    assert_eq!(reply, RespValue::SimpleString("OK".into()));
}
