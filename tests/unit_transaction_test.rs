mod common;

use citrinedb::connection::SessionState;
use citrinedb::core::{CitrineError, RespValue};
use common::*;
use std::sync::Arc;

async fn multi(state: &Arc<citrinedb::core::state::ServerState>, session: &mut SessionState) {
    assert_eq!(
        run_cmd(state, 7, session, &["multi"]).await.unwrap(),
        simple("OK")
    );
    assert!(session.is_in_transaction);
}

#[tokio::test]
async fn test_commands_are_queued_and_executed_in_order() {
    let state = test_state();
    let mut session = SessionState::default();

    multi(&state, &mut session).await;
    assert_eq!(
        run_cmd(&state, 7, &mut session, &["set", "k", "v"]).await.unwrap(),
        simple("QUEUED")
    );
    assert_eq!(
        run_cmd(&state, 7, &mut session, &["get", "k"]).await.unwrap(),
        simple("QUEUED")
    );

    // Nothing ran yet.
    assert_eq!(run_simple(&state, &["get", "k"]).await.unwrap(), RespValue::Null);

    let reply = run_cmd(&state, 7, &mut session, &["exec"]).await.unwrap();
    assert_eq!(reply, RespValue::Array(vec![simple("OK"), bulk("v")]));
    assert!(!session.is_in_transaction);
}

#[tokio::test]
async fn test_exec_reply_length_matches_queue_length() {
    let state = test_state();
    let mut session = SessionState::default();

    multi(&state, &mut session).await;
    for i in 0..5 {
        let key = format!("k{i}");
        run_cmd(&state, 7, &mut session, &["set", &key, "v"]).await.unwrap();
    }
    let RespValue::Array(replies) = run_cmd(&state, 7, &mut session, &["exec"]).await.unwrap()
    else {
        panic!("expected array reply");
    };
    assert_eq!(replies.len(), 5);
}

#[tokio::test]
async fn test_runtime_error_is_reported_in_place_and_execution_continues() {
    let state = test_state();
    let mut session = SessionState::default();

    multi(&state, &mut session).await;
    run_cmd(&state, 7, &mut session, &["set", "k", "v"]).await.unwrap();
    run_cmd(&state, 7, &mut session, &["incr", "k"]).await.unwrap();
    run_cmd(&state, 7, &mut session, &["set", "after", "ran"]).await.unwrap();

    let reply = run_cmd(&state, 7, &mut session, &["exec"]).await.unwrap();
    assert_eq!(
        reply,
        RespValue::Array(vec![
            simple("OK"),
            RespValue::Error("ERR value is not an integer or out of range".to_string()),
            simple("OK"),
        ])
    );
    // The command after the failing one still ran.
    assert_eq!(run_simple(&state, &["get", "after"]).await.unwrap(), bulk("ran"));
}

#[tokio::test]
async fn test_queue_time_error_aborts_exec() {
    let state = test_state();
    let mut session = SessionState::default();

    multi(&state, &mut session).await;
    run_cmd(&state, 7, &mut session, &["set", "k", "v"]).await.unwrap();

    // An unknown command poisons the queue but is answered immediately.
    let err = run_cmd(&state, 7, &mut session, &["nonsense"]).await.unwrap_err();
    assert!(matches!(err, CitrineError::UnknownCommand(_)));

    // Later valid commands still queue.
    assert_eq!(
        run_cmd(&state, 7, &mut session, &["set", "k2", "v"]).await.unwrap(),
        simple("QUEUED")
    );

    let err = run_cmd(&state, 7, &mut session, &["exec"]).await.unwrap_err();
    assert!(matches!(err, CitrineError::ExecAborted));
    session.is_in_transaction = false;

    // Nothing from the aborted queue was applied.
    assert_eq!(run_simple(&state, &["get", "k"]).await.unwrap(), RespValue::Null);
}

#[tokio::test]
async fn test_exec_without_multi_is_an_error() {
    let state = test_state();
    let err = run_simple(&state, &["exec"]).await.unwrap_err();
    assert!(matches!(err, CitrineError::ExecWithoutMulti));
}

#[tokio::test]
async fn test_discard_without_multi_is_an_error() {
    let state = test_state();
    let err = run_simple(&state, &["discard"]).await.unwrap_err();
    assert!(matches!(err, CitrineError::DiscardWithoutMulti));
}

#[tokio::test]
async fn test_discard_drops_the_queue() {
    let state = test_state();
    let mut session = SessionState::default();

    multi(&state, &mut session).await;
    run_cmd(&state, 7, &mut session, &["set", "k", "v"]).await.unwrap();
    assert_eq!(
        run_cmd(&state, 7, &mut session, &["discard"]).await.unwrap(),
        simple("OK")
    );
    assert!(!session.is_in_transaction);
    assert_eq!(run_simple(&state, &["get", "k"]).await.unwrap(), RespValue::Null);

    let err = run_cmd(&state, 7, &mut session, &["exec"]).await.unwrap_err();
    assert!(matches!(err, CitrineError::ExecWithoutMulti));
}

#[tokio::test]
async fn test_nested_multi_is_rejected_but_harmless() {
    let state = test_state();
    let mut session = SessionState::default();

    multi(&state, &mut session).await;
    run_cmd(&state, 7, &mut session, &["set", "k", "v"]).await.unwrap();

    let err = run_cmd(&state, 7, &mut session, &["multi"]).await.unwrap_err();
    assert!(matches!(err, CitrineError::NestedMulti));
    assert!(session.is_in_transaction);

    // The transaction is still usable.
    let reply = run_cmd(&state, 7, &mut session, &["exec"]).await.unwrap();
    assert_eq!(reply, RespValue::Array(vec![simple("OK")]));
    assert_eq!(run_simple(&state, &["get", "k"]).await.unwrap(), bulk("v"));
}

#[tokio::test]
async fn test_empty_exec_is_an_empty_array() {
    let state = test_state();
    let mut session = SessionState::default();
    multi(&state, &mut session).await;
    assert_eq!(
        run_cmd(&state, 7, &mut session, &["exec"]).await.unwrap(),
        RespValue::Array(vec![])
    );
}

#[tokio::test]
async fn test_blpop_inside_exec_does_not_block() {
    let state = test_state();
    let mut session = SessionState::default();

    multi(&state, &mut session).await;
    run_cmd(&state, 7, &mut session, &["blpop", "empty", "0"]).await.unwrap();
    let reply = run_cmd(&state, 7, &mut session, &["exec"]).await.unwrap();
    assert_eq!(reply, RespValue::Array(vec![RespValue::NullArray]));
}

#[tokio::test]
async fn test_transactions_are_per_session() {
    let state = test_state();
    let mut queuing = SessionState::default();
    let mut other = SessionState::default();

    run_cmd(&state, 7, &mut queuing, &["multi"]).await.unwrap();
    run_cmd(&state, 7, &mut queuing, &["set", "k", "queued"]).await.unwrap();

    // Another connection interleaves between queue and EXEC.
    run_cmd(&state, 8, &mut other, &["set", "k", "direct"]).await.unwrap();
    assert_eq!(run_cmd(&state, 8, &mut other, &["get", "k"]).await.unwrap(), bulk("direct"));

    run_cmd(&state, 7, &mut queuing, &["exec"]).await.unwrap();
    assert_eq!(run_simple(&state, &["get", "k"]).await.unwrap(), bulk("queued"));
}
