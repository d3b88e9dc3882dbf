mod common;

use citrinedb::config::Config;
use citrinedb::core::RespValue;
use citrinedb::core::state::{ServerInit, ServerState};
use citrinedb::core::storage::expiry::ExpiryManager;
use common::*;
use std::time::Duration;
use tokio::sync::broadcast;

#[tokio::test]
async fn test_expire_then_get_after_deadline_is_nil() {
    let state = test_state();
    run_simple(&state, &["set", "k", "v"]).await.unwrap();
    assert_eq!(
        run_simple(&state, &["pexpire", "k", "40"]).await.unwrap(),
        RespValue::Integer(1)
    );
    tokio::time::sleep(Duration::from_millis(80)).await;
    assert_eq!(run_simple(&state, &["get", "k"]).await.unwrap(), RespValue::Null);
}

#[tokio::test]
async fn test_expire_on_absent_key_is_zero() {
    let state = test_state();
    assert_eq!(
        run_simple(&state, &["expire", "missing", "10"]).await.unwrap(),
        RespValue::Integer(0)
    );
}

#[tokio::test]
async fn test_negative_expire_deletes_the_key() {
    let state = test_state();
    run_simple(&state, &["set", "k", "v"]).await.unwrap();
    assert_eq!(
        run_simple(&state, &["expire", "k", "-1"]).await.unwrap(),
        RespValue::Integer(1)
    );
    assert_eq!(run_simple(&state, &["get", "k"]).await.unwrap(), RespValue::Null);
}

#[tokio::test]
async fn test_ttl_reporting() {
    let state = test_state();
    assert_eq!(run_simple(&state, &["ttl", "missing"]).await.unwrap(), RespValue::Integer(-2));

    run_simple(&state, &["set", "k", "v"]).await.unwrap();
    assert_eq!(run_simple(&state, &["ttl", "k"]).await.unwrap(), RespValue::Integer(-1));

    run_simple(&state, &["expire", "k", "100"]).await.unwrap();
    let RespValue::Integer(ttl) = run_simple(&state, &["ttl", "k"]).await.unwrap() else {
        panic!("expected integer ttl");
    };
    assert!((98..=100).contains(&ttl));

    let RespValue::Integer(pttl) = run_simple(&state, &["pttl", "k"]).await.unwrap() else {
        panic!("expected integer pttl");
    };
    assert!(pttl > 90_000 && pttl <= 100_000);
}

#[tokio::test]
async fn test_persist_removes_the_deadline() {
    let state = test_state();
    run_simple(&state, &["set", "k", "v", "PX", "60"]).await.unwrap();
    assert_eq!(run_simple(&state, &["persist", "k"]).await.unwrap(), RespValue::Integer(1));
    // A second persist has nothing to remove.
    assert_eq!(run_simple(&state, &["persist", "k"]).await.unwrap(), RespValue::Integer(0));

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(run_simple(&state, &["get", "k"]).await.unwrap(), bulk("v"));
}

#[tokio::test]
async fn test_reaper_removes_untouched_expired_keys() {
    let ServerInit { state, expiry_rx } = ServerState::initialize(Config::default());
    let (shutdown_tx, _) = broadcast::channel(1);
    tokio::spawn(ExpiryManager::new(state.db.clone(), expiry_rx).run(shutdown_tx.subscribe()));

    run_simple(&state, &["set", "gone", "v", "PX", "30"]).await.unwrap();
    run_simple(&state, &["set", "stays", "v"]).await.unwrap();
    assert_eq!(run_simple(&state, &["dbsize"]).await.unwrap(), RespValue::Integer(2));

    tokio::time::sleep(Duration::from_millis(200)).await;
    // DBSIZE reads shard counters without touching the keys, so only the
    // reaper can have brought the count down.
    assert_eq!(run_simple(&state, &["dbsize"]).await.unwrap(), RespValue::Integer(1));

    let _ = shutdown_tx.send(());
}

#[tokio::test]
async fn test_reaper_skips_stale_registrations() {
    let ServerInit { state, expiry_rx } = ServerState::initialize(Config::default());
    let (shutdown_tx, _) = broadcast::channel(1);
    tokio::spawn(ExpiryManager::new(state.db.clone(), expiry_rx).run(shutdown_tx.subscribe()));

    // The first deadline is overwritten before it fires; the stale heap entry
    // must not take the replacement down with it.
    run_simple(&state, &["set", "k", "v", "PX", "40"]).await.unwrap();
    run_simple(&state, &["set", "k", "v2"]).await.unwrap();

    tokio::time::sleep(Duration::from_millis(150)).await;
    assert_eq!(run_simple(&state, &["get", "k"]).await.unwrap(), bulk("v2"));

    let _ = shutdown_tx.send(());
}
