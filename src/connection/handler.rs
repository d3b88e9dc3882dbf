// src/connection/handler.rs

//! Defines the `ConnectionHandler` which manages the full lifecycle of a
//! client connection.

use super::guard::ConnectionGuard;
use super::session::SessionState;
use crate::core::handler::command_router::Router;
use crate::core::protocol::{RespFrame, RespFrameCodec};
use crate::core::state::ServerState;
use crate::core::{CitrineError, Command};
use futures::{SinkExt, StreamExt};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpStream;
use tokio::sync::broadcast;
use tokio_util::codec::Framed;
use tracing::{debug, info, warn};

/// The next step for the connection's main loop to take.
enum NextAction {
    Continue,
    ExitLoop,
}

/// Manages the full lifecycle of a client connection: framing, command
/// routing, reply delivery, and cleanup.
pub struct ConnectionHandler {
    framed: Framed<TcpStream, RespFrameCodec>,
    addr: SocketAddr,
    state: Arc<ServerState>,
    session_id: u64,
    shutdown_rx: broadcast::Receiver<()>,
    session: SessionState,
}

impl ConnectionHandler {
    pub fn new(
        socket: TcpStream,
        addr: SocketAddr,
        state: Arc<ServerState>,
        session_id: u64,
        shutdown_rx: broadcast::Receiver<()>,
    ) -> Self {
        Self {
            framed: Framed::new(socket, RespFrameCodec),
            addr,
            state,
            session_id,
            shutdown_rx,
            session: SessionState::new(),
        }
    }

    /// The main event loop for the connection.
    pub async fn run(&mut self) -> Result<(), CitrineError> {
        let _guard = ConnectionGuard::new(self.state.clone(), self.session_id, self.addr);
        loop {
            tokio::select! {
                // Prioritize shutdown over pending frames.
                biased;
                _ = self.shutdown_rx.recv() => {
                    info!("Connection handler for {} received shutdown signal.", self.addr);
                    let shutdown_msg = RespFrame::Error("SHUTDOWN Server is shutting down".to_string());
                    let _ = self.framed.send(shutdown_msg).await;
                    return Ok(());
                }
                result = self.framed.next() => {
                    match result {
                        Some(Ok(frame)) => {
                            match self.process_frame(frame).await {
                                Ok(NextAction::Continue) => {}
                                Ok(NextAction::ExitLoop) => return Ok(()),
                                Err(e) => {
                                    self.framed.send(RespFrame::Error(e.to_string())).await?;
                                    // Internal errors signal a broken invariant;
                                    // the connection is not safe to keep.
                                    if matches!(e, CitrineError::Internal(_)) {
                                        warn!("Internal error on connection {}: {}", self.addr, e);
                                        return Ok(());
                                    }
                                }
                            }
                        }
                        Some(Err(e)) => {
                            // Framing errors are not recoverable; drop the connection.
                            if is_normal_disconnect(&e) {
                                debug!("Connection from {} closed by peer: {}", self.addr, e);
                            } else {
                                warn!("Connection error for {}: {}", self.addr, e);
                            }
                            return Ok(());
                        }
                        None => {
                            debug!("Connection from {} closed by peer.", self.addr);
                            return Ok(());
                        }
                    }
                }
            }
        }
    }

    /// Parses a RESP frame, routes it as a command, and sends the response.
    async fn process_frame(&mut self, frame: RespFrame) -> Result<NextAction, CitrineError> {
        let command = match Command::try_from(frame) {
            Ok(command) => command,
            Err(e) => {
                // A queue-time parse failure (unknown command, bad arity)
                // poisons the transaction; the error is still replied to now.
                if self.session.is_in_transaction {
                    self.state.db.poison_transaction(self.session_id);
                }
                return Err(e);
            }
        };
        debug!(
            "Session {}: Received command: {}",
            self.session_id,
            command.name()
        );

        // QUIT acknowledges and closes the connection.
        if matches!(command, Command::Quit(_)) {
            self.framed
                .send(RespFrame::SimpleString("OK".into()))
                .await?;
            return Ok(NextAction::ExitLoop);
        }

        let mut router = Router::new(
            self.state.clone(),
            self.session_id,
            self.addr,
            &mut self.session,
        );
        let response = router.route(command).await?;
        self.framed.send(response.into()).await?;
        Ok(NextAction::Continue)
    }
}

/// Helper function to check for non-critical disconnection errors.
fn is_normal_disconnect(e: &CitrineError) -> bool {
    matches!(e, CitrineError::Io(arc_err) if matches!(
        arc_err.kind(),
        std::io::ErrorKind::ConnectionReset
            | std::io::ErrorKind::BrokenPipe
            | std::io::ErrorKind::UnexpectedEof
            | std::io::ErrorKind::ConnectionAborted
    ))
}
