// src/core/blocking.rs

//! Manages clients that are blocked waiting for data on list keys.
//!
//! Each waiter is parked on one or more keys with a one-shot delivery channel
//! and a terminal-state CAS (`pending` -> `delivered` | `timed_out`) so that a
//! delivery racing a timeout has exactly one winner.

use crate::core::CitrineError;
use crate::core::RespValue;
use crate::core::storage::db::{Db, ExecutionContext, PopDirection};
use bytes::Bytes;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::time::timeout;
use tracing::debug;

const STATE_PENDING: u8 = 0;
const STATE_DELIVERED: u8 = 1;
const STATE_TIMED_OUT: u8 = 2;

/// A parked blocking-pop request. Registered in the queue of every key it
/// waits on; delivery is one-shot.
#[derive(Debug)]
struct Waiter {
    session_id: u64,
    side: PopDirection,
    state: AtomicU8,
    /// Taken exactly once by the winning delivery.
    tx: Mutex<Option<oneshot::Sender<(Bytes, Bytes)>>>,
}

impl Waiter {
    fn new(session_id: u64, side: PopDirection, tx: oneshot::Sender<(Bytes, Bytes)>) -> Self {
        Self {
            session_id,
            side,
            state: AtomicU8::new(STATE_PENDING),
            tx: Mutex::new(Some(tx)),
        }
    }

    fn is_pending(&self) -> bool {
        self.state.load(Ordering::Acquire) == STATE_PENDING
    }

    /// Attempts to win this waiter for a delivery and hand over the element.
    /// Returns `false` when the waiter already timed out or its receiver is
    /// gone, in which case the element is still owned by the caller.
    fn try_deliver(&self, key: Bytes, element: Bytes) -> bool {
        if self
            .state
            .compare_exchange(
                STATE_PENDING,
                STATE_DELIVERED,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_err()
        {
            return false;
        }
        let sender = self.tx.lock().expect("waiter sender mutex poisoned").take();
        match sender {
            Some(tx) => tx.send((key, element)).is_ok(),
            None => false,
        }
    }

    /// Attempts to win this waiter for a timeout. Losing means a delivery is
    /// in flight and the value must be awaited instead.
    fn try_expire(&self) -> bool {
        self.state
            .compare_exchange(
                STATE_PENDING,
                STATE_TIMED_OUT,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_ok()
    }
}

/// Manages all clients currently blocked on list pop operations.
#[derive(Debug, Default)]
pub struct BlockerManager {
    // Key: the list key being watched.
    // Value: the FIFO of waiters parked on this key.
    waiters: dashmap::DashMap<Bytes, VecDeque<Arc<Waiter>>>,
}

impl BlockerManager {
    pub fn new() -> Self {
        Default::default()
    }

    /// Orchestrates blocking list pop operations (`BLPOP`, `BRPOP`).
    ///
    /// A zero timeout means wait indefinitely. Inside EXEC only the
    /// non-blocking attempt runs; an empty result is a nil reply.
    pub async fn orchestrate_blocking_pop(
        self: &Arc<Self>,
        ctx: &ExecutionContext<'_>,
        keys: &[Bytes],
        side: PopDirection,
        wait_timeout: Duration,
    ) -> Result<RespValue, CitrineError> {
        // 1. Attempt a non-blocking pop across all keys first, in argv order.
        for key in keys {
            if let Some(element) = ctx.db.list_pop(key, side).await? {
                return Ok(popped_reply(key.clone(), element));
            }
        }

        if ctx.in_exec {
            return Ok(RespValue::NullArray);
        }

        // 2. Register the waiter on every requested key.
        let (tx, mut rx) = oneshot::channel();
        let waiter = Arc::new(Waiter::new(ctx.session_id, side, tx));
        for key in keys {
            self.waiters
                .entry(key.clone())
                .or_default()
                .push_back(waiter.clone());
        }
        debug!(
            "Session {}: Registered to block on keys: {:?}",
            ctx.session_id, keys
        );

        // 3. Close the race with a push that landed between the first attempt
        // and registration: the wake path now sees this waiter.
        for key in keys {
            self.notify_list_grew(ctx.db, key).await;
        }

        // 4. Park until delivery or deadline.
        let outcome = if wait_timeout.is_zero() {
            (&mut rx).await.map_err(|_| ())
        } else {
            match timeout(wait_timeout, &mut rx).await {
                Ok(result) => result.map_err(|_| ()),
                Err(_elapsed) => {
                    if waiter.try_expire() {
                        Err(())
                    } else {
                        // A delivery won the race; the element is ours.
                        (&mut rx).await.map_err(|_| ())
                    }
                }
            }
        };

        // 5. Drop our registrations before returning.
        self.remove_waiter(keys, &waiter);

        match outcome {
            Ok((key, element)) => Ok(popped_reply(key, element)),
            Err(()) => Ok(RespValue::NullArray),
        }
    }

    /// Called by list write commands after their mutation commits. Pops
    /// elements and hands them to parked waiters, head of the FIFO first,
    /// until either the list or the waiter queue is drained.
    pub async fn notify_list_grew(&self, db: &Db, key: &Bytes) {
        loop {
            let Some(waiter) = self.head_pending_waiter(key) else {
                return;
            };

            let popped = match db.list_pop(key, waiter.side).await {
                Ok(Some(element)) => element,
                // Nothing left to hand out, or the key is no longer a list.
                _ => return,
            };

            if waiter.try_deliver(key.clone(), popped.clone()) {
                debug!(
                    "Handed off element for list key '{}' to session {}",
                    String::from_utf8_lossy(key),
                    waiter.session_id
                );
                self.remove_waiter(std::slice::from_ref(key), &waiter);
                continue;
            }

            // The waiter timed out or disconnected between the peek and the
            // handoff. Return the element and retry with the next waiter.
            db.list_unpop(key, waiter.side, popped).await;
        }
    }

    /// Finds the first still-pending waiter for a key, discarding finished
    /// ones encountered on the way.
    fn head_pending_waiter(&self, key: &Bytes) -> Option<Arc<Waiter>> {
        let mut queue = self.waiters.get_mut(key)?;
        loop {
            let head = queue.front().cloned();
            match head {
                None => {
                    drop(queue);
                    self.waiters.remove_if(key, |_, q| q.is_empty());
                    return None;
                }
                Some(waiter) if !waiter.is_pending() => {
                    queue.pop_front();
                }
                Some(waiter) => return Some(waiter),
            }
        }
    }

    /// Removes a specific waiter from the queues of the given keys.
    fn remove_waiter(&self, keys: &[Bytes], waiter: &Arc<Waiter>) {
        for key in keys {
            if let Some(mut queue) = self.waiters.get_mut(key) {
                queue.retain(|candidate| !Arc::ptr_eq(candidate, waiter));
                if queue.is_empty() {
                    drop(queue);
                    self.waiters.remove_if(key, |_, q| q.is_empty());
                }
            }
        }
    }

    /// Removes all waiters for a session upon client disconnection.
    pub fn remove_waiters_for_session(&self, session_id: u64) {
        self.waiters.iter_mut().for_each(|mut queue| {
            queue.retain(|waiter| waiter.session_id != session_id);
        });
        self.waiters.retain(|_, queue| !queue.is_empty());
        debug!("Removed any pending blockers for session_id {}.", session_id);
    }
}

fn popped_reply(key: Bytes, element: Bytes) -> RespValue {
    RespValue::Array(vec![
        RespValue::BulkString(key),
        RespValue::BulkString(element),
    ])
}
