// src/server/mod.rs

//! The server bootstrap: bind, spawn background tasks, accept connections,
//! and shut down cleanly.

use crate::config::Config;
use crate::connection::ConnectionHandler;
use crate::core::state::{ServerInit, ServerState};
use crate::core::storage::expiry::ExpiryManager;
use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tokio::task::JoinSet;
use tracing::{error, info, warn};

// Platform-specific signal handling imports
#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};

/// Waits for a shutdown signal based on the operating system.
async fn await_shutdown_signal() {
    #[cfg(unix)]
    {
        let mut sigint = signal(SignalKind::interrupt()).expect("Failed to create SIGINT stream");
        let mut sigterm =
            signal(SignalKind::terminate()).expect("Failed to create SIGTERM stream");
        tokio::select! {
            _ = sigint.recv() => info!("SIGINT received, initiating graceful shutdown."),
            _ = sigterm.recv() => info!("SIGTERM received, initiating graceful shutdown."),
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
        info!("Ctrl-C received, initiating graceful shutdown.");
    }
}

/// The main server startup function. Returns an error when the listener
/// cannot be bound, which the binary reports as a non-zero exit.
pub async fn run(config: Config) -> Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("CitrineDB listening on {}", addr);

    let ServerInit { state, expiry_rx } = ServerState::initialize(config.clone());

    let (shutdown_tx, _) = broadcast::channel(1);

    // Background tasks: the expiration reaper.
    let mut background_tasks = JoinSet::new();
    background_tasks.spawn(
        ExpiryManager::new(state.db.clone(), expiry_rx).run(shutdown_tx.subscribe()),
    );

    // Acceptor tasks share one listener; each runs its own accept loop.
    let listener = Arc::new(listener);
    let session_counter = Arc::new(AtomicU64::new(0));
    let mut acceptors = JoinSet::new();
    for _ in 0..config.accept.threads.max(1) {
        acceptors.spawn(accept_loop(
            listener.clone(),
            state.clone(),
            session_counter.clone(),
            shutdown_tx.clone(),
        ));
    }

    await_shutdown_signal().await;

    // --- Graceful Shutdown Sequence ---
    info!("Shutting down. Sending signal to all tasks.");
    if shutdown_tx.send(()).is_err() {
        error!("Failed to send shutdown signal. Some tasks may not terminate gracefully.");
    }
    acceptors.shutdown().await;

    if tokio::time::timeout(Duration::from_secs(10), async {
        while background_tasks.join_next().await.is_some() {}
    })
    .await
    .is_err()
    {
        warn!("Timed out waiting for background tasks to finish cleanly.");
    }
    info!("Server shutdown complete.");
    Ok(())
}

/// Accepts connections until shutdown, spawning one handler task per client.
async fn accept_loop(
    listener: Arc<TcpListener>,
    state: Arc<ServerState>,
    session_counter: Arc<AtomicU64>,
    shutdown_tx: broadcast::Sender<()>,
) {
    let mut shutdown_rx = shutdown_tx.subscribe();
    let mut client_tasks = JoinSet::new();

    loop {
        tokio::select! {
            biased;
            _ = shutdown_rx.recv() => break,

            res = listener.accept() => {
                match res {
                    Ok((socket, addr)) => {
                        info!("Accepted new connection from: {}", addr);
                        let session_id = session_counter.fetch_add(1, Ordering::Relaxed) + 1;
                        let state = state.clone();
                        let conn_shutdown_rx = shutdown_tx.subscribe();
                        client_tasks.spawn(async move {
                            let mut handler = ConnectionHandler::new(
                                socket,
                                addr,
                                state,
                                session_id,
                                conn_shutdown_rx,
                            );
                            if let Err(e) = handler.run().await {
                                warn!("Connection from {} terminated unexpectedly: {}", addr, e);
                            }
                        });
                    }
                    Err(e) => error!("Failed to accept connection: {}", e),
                }
            }

            // Reap completed client tasks.
            Some(res) = client_tasks.join_next() => {
                if let Err(e) = res {
                    if e.is_panic() {
                        error!("A client handler panicked: {e:?}");
                    }
                }
            }
        }
    }

    client_tasks.shutdown().await;
}
