// src/core/commands/list/logic.rs

//! Shared logic for the list commands.

use crate::core::storage::data_types::{DataValue, StoredValue};
use crate::core::storage::db::{ExecutionContext, PopDirection, PushDirection};
use crate::core::{CitrineError, RespValue};
use bytes::Bytes;
use std::collections::VecDeque;

/// Shared logic for `LPUSH` and `RPUSH`.
///
/// Values are inserted in argv order at the chosen end; the reply is the new
/// length. Once the mutation has committed, parked blocking consumers are
/// woken through the waiter registry.
pub(crate) async fn list_push_logic(
    ctx: &mut ExecutionContext<'_>,
    key: &Bytes,
    values: &[Bytes],
    direction: PushDirection,
) -> Result<RespValue, CitrineError> {
    let values = values.to_vec();
    let new_len = ctx
        .db
        .compute(key, move |current| {
            let mut stored =
                current.unwrap_or_else(|| StoredValue::new(DataValue::List(VecDeque::new())));
            let DataValue::List(list) = &mut stored.data else {
                return (Some(stored), Err(CitrineError::WrongType));
            };
            for value in values {
                match direction {
                    PushDirection::Left => list.push_front(value),
                    PushDirection::Right => list.push_back(value),
                }
            }
            let len = list.len() as i64;
            (Some(stored), Ok(len))
        })
        .await?;

    // The list grew; hand elements to any parked consumers.
    ctx.state
        .blocker_manager
        .notify_list_grew(ctx.db, key)
        .await;

    Ok(RespValue::Integer(new_len))
}

/// Shared logic for `LPOP` and `RPOP` without a count: one element or nil.
pub(crate) async fn list_pop_single(
    ctx: &mut ExecutionContext<'_>,
    key: &Bytes,
    direction: PopDirection,
) -> Result<RespValue, CitrineError> {
    match ctx.db.list_pop(key, direction).await? {
        Some(element) => Ok(RespValue::BulkString(element)),
        None => Ok(RespValue::Null),
    }
}

/// Shared logic for `LPOP`/`RPOP` with a count: up to `count` elements as an
/// array, an empty array when the key is absent. Draining deletes the key.
pub(crate) async fn list_pop_many(
    ctx: &mut ExecutionContext<'_>,
    key: &Bytes,
    direction: PopDirection,
    count: usize,
) -> Result<RespValue, CitrineError> {
    ctx.db
        .compute(key, move |current| {
            let Some(mut stored) = current else {
                return (None, Ok(RespValue::Array(vec![])));
            };
            let DataValue::List(list) = &mut stored.data else {
                return (Some(stored), Err(CitrineError::WrongType));
            };
            let mut popped = Vec::with_capacity(count.min(list.len()));
            for _ in 0..count {
                let element = match direction {
                    PopDirection::Left => list.pop_front(),
                    PopDirection::Right => list.pop_back(),
                };
                match element {
                    Some(e) => popped.push(RespValue::BulkString(e)),
                    None => break,
                }
            }
            let reply = Ok(RespValue::Array(popped));
            if list.is_empty() {
                (None, reply)
            } else {
                (Some(stored), reply)
            }
        })
        .await
}
