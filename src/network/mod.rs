//! Node and client networking
//!
//! This module carries the wire protocol between client and node: frame
//! encoding, the per-connection session loop, the TCP accept loop, and the
//! single-shot client driver.

pub mod client;
pub mod protocol;
pub mod server;
pub mod service;
pub mod session;
pub mod session_tracker;

pub use client::{LedgerClient, CLIENT_TIMEOUT};
pub use protocol::{
    decode_frame, encode_frame, read_frame, write_frame, Request, Response, MAX_FRAME_LEN,
};
pub use server::{Server, ServerHandle};
pub use service::LedgerService;
pub use session::{Session, SessionState};
pub use session_tracker::SessionTracker;
