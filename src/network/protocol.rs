//! Length-prefixed request/response framing.
//!
//! Every frame, in both directions, is:
//! - 4 bytes: protocol magic `LDG1`
//! - 4 bytes: big-endian body length, at most `MAX_FRAME_LEN`
//! - N bytes: bincode body (big-endian, fixed-width integers)
//!
//! Identities are 32 raw bytes, signatures 64 raw bytes, amounts and nonces
//! u64, enum tags u32 and `Option` a one-byte tag.

use crate::core::{BalanceQuery, RejectReason, TransferRequest};
use crate::error::{LedgerError, ProtocolError, Result};
use crate::utils::{deserialize, serialize};
use std::fmt;
use std::io::{ErrorKind, Read, Write};

pub const MAGIC: [u8; 4] = *b"LDG1";

/// Magic plus length
pub const HEADER_LEN: usize = 8;

/// Largest accepted body; a transfer needs well under 200 bytes
pub const MAX_FRAME_LEN: usize = 1024;

#[derive(Debug, Clone, PartialEq, Eq, bincode::Encode, bincode::Decode)]
pub enum Request {
    Transfer(TransferRequest),
    BalanceQuery(BalanceQuery),
}

/// Log form of a request: its kind and what it names, never key material
impl fmt::Display for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Request::Transfer(tx) => write!(f, "transfer {} of {}", tx.id(), tx.amount),
            Request::BalanceQuery(query) => write!(
                f,
                "balance query for {}{}",
                query.identity,
                if query.proof.is_some() { " (signed)" } else { "" }
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, bincode::Encode, bincode::Decode)]
pub enum Response {
    Ack { new_sender_balance: u64 },
    BalanceReply { balance: u64 },
    Reject(RejectReason),
}

/// Serialize `message` into one complete frame
pub fn encode_frame<T: bincode::Encode>(message: &T) -> Result<Vec<u8>> {
    let body = serialize(message)?;
    if body.len() > MAX_FRAME_LEN {
        return Err(ProtocolError::FrameTooLarge {
            len: body.len(),
            max: MAX_FRAME_LEN,
        }
        .into());
    }

    let mut frame = Vec::with_capacity(HEADER_LEN + body.len());
    frame.extend_from_slice(&MAGIC);
    frame.extend_from_slice(&(body.len() as u32).to_be_bytes());
    frame.extend_from_slice(&body);
    Ok(frame)
}

/// Validate a header and return the body length it announces
pub fn decode_header(header: &[u8; HEADER_LEN]) -> std::result::Result<usize, ProtocolError> {
    let mut magic = [0u8; 4];
    magic.copy_from_slice(&header[..4]);
    if magic != MAGIC {
        return Err(ProtocolError::BadMagic(magic));
    }

    let mut len = [0u8; 4];
    len.copy_from_slice(&header[4..]);
    let len = u32::from_be_bytes(len) as usize;
    if len > MAX_FRAME_LEN {
        return Err(ProtocolError::FrameTooLarge {
            len,
            max: MAX_FRAME_LEN,
        });
    }
    Ok(len)
}

/// Decode exactly one frame held entirely in `frame`
pub fn decode_frame<T: bincode::Decode<()>>(frame: &[u8]) -> std::result::Result<T, ProtocolError> {
    if frame.len() < HEADER_LEN {
        return Err(ProtocolError::Truncated);
    }
    let mut header = [0u8; HEADER_LEN];
    header.copy_from_slice(&frame[..HEADER_LEN]);
    let len = decode_header(&header)?;

    let body = &frame[HEADER_LEN..];
    if body.len() < len {
        return Err(ProtocolError::Truncated);
    }
    if body.len() > len {
        return Err(ProtocolError::TrailingBytes(body.len() - len));
    }
    deserialize(body)
}

/// Read one frame from a stream.
///
/// Returns `Ok(None)` when the peer closed the stream cleanly between frames.
/// A stream that ends inside a frame is a `ProtocolError::Truncated`.
pub fn read_frame<R, T>(reader: &mut R) -> Result<Option<T>>
where
    R: Read,
    T: bincode::Decode<()>,
{
    let mut header = [0u8; HEADER_LEN];
    let mut filled = 0;
    while filled < HEADER_LEN {
        match reader.read(&mut header[filled..]) {
            Ok(0) if filled == 0 => return Ok(None),
            Ok(0) => return Err(ProtocolError::Truncated.into()),
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(connection_error(e)),
        }
    }

    let len = decode_header(&header)?;
    let mut body = vec![0u8; len];
    reader.read_exact(&mut body).map_err(|e| {
        if e.kind() == ErrorKind::UnexpectedEof {
            LedgerError::Protocol(ProtocolError::Truncated)
        } else {
            connection_error(e)
        }
    })?;

    Ok(Some(deserialize(&body)?))
}

/// Write one frame and flush it
pub fn write_frame<W, T>(writer: &mut W, message: &T) -> Result<()>
where
    W: Write,
    T: bincode::Encode,
{
    let frame = encode_frame(message)?;
    writer.write_all(&frame).map_err(connection_error)?;
    writer.flush().map_err(connection_error)
}

fn connection_error(err: std::io::Error) -> LedgerError {
    LedgerError::Connection(err.to_string())
}
