use crate::core::RejectReason;
use crate::error::{LedgerError, Result};
use crate::network::protocol::{read_frame, write_frame, Request, Response};
use crate::network::LedgerService;
use log::{debug, warn};
use std::io::{Read, Write};
use std::sync::Arc;
use uuid::Uuid;

/// Where a session is in its request/response loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    AwaitingRequest,
    Dispatching,
    Closed,
}

/// One client connection.
///
/// Owns the stream and nothing else; ledger access goes through the shared
/// `LedgerService`. A malformed frame closes only this session.
pub struct Session<S> {
    id: Uuid,
    stream: S,
    service: Arc<LedgerService>,
    state: SessionState,
    handled: u64,
}

impl<S: Read + Write> Session<S> {
    pub fn new(id: Uuid, stream: S, service: Arc<LedgerService>) -> Self {
        Self {
            id,
            stream,
            service,
            state: SessionState::AwaitingRequest,
            handled: 0,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Requests answered so far
    pub fn handled(&self) -> u64 {
        self.handled
    }

    /// Serve one request. Returns `Ok(false)` once the peer has closed cleanly.
    pub fn step(&mut self) -> Result<bool> {
        if self.state == SessionState::Closed {
            return Ok(false);
        }

        let request = match read_frame::<_, Request>(&mut self.stream) {
            Ok(Some(request)) => request,
            Ok(None) => {
                self.state = SessionState::Closed;
                return Ok(false);
            }
            Err(LedgerError::Protocol(err)) => {
                self.state = SessionState::Closed;
                warn!("Session {} sent an undecodable frame: {err}", self.id);
                // the peer may already be gone; the session closes either way
                let _ = write_frame(
                    &mut self.stream,
                    &Response::Reject(RejectReason::ProtocolViolation),
                );
                return Err(LedgerError::Protocol(err));
            }
            Err(e) => {
                self.state = SessionState::Closed;
                return Err(e);
            }
        };

        debug!("Session {} received {request}", self.id);
        self.state = SessionState::Dispatching;
        let response = self.service.handle(request);

        if let Err(e) = write_frame(&mut self.stream, &response) {
            self.state = SessionState::Closed;
            return Err(e);
        }
        self.handled += 1;
        self.state = SessionState::AwaitingRequest;
        Ok(true)
    }

    /// Serve requests until the peer disconnects or sends a bad frame
    pub fn run(mut self) -> Result<u64> {
        while self.step()? {}
        Ok(self.handled)
    }
}
