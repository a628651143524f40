// Bincode helpers pinned to the wire layout: big-endian, fixed-width integers
use crate::error::{ProtocolError, Result};
use bincode::config::{BigEndian, Configuration, Fixint};

pub type WireConfig = Configuration<BigEndian, Fixint>;

pub const fn wire_config() -> WireConfig {
    bincode::config::standard()
        .with_big_endian()
        .with_fixed_int_encoding()
}

/// Serialize data using the wire configuration
pub fn serialize<T: bincode::Encode>(data: &T) -> Result<Vec<u8>> {
    Ok(bincode::encode_to_vec(data, wire_config())?)
}

/// Deserialize data using the wire configuration, rejecting leftover bytes
pub fn deserialize<T>(bytes: &[u8]) -> std::result::Result<T, ProtocolError>
where
    T: bincode::Decode<()>,
{
    let (data, consumed) = bincode::decode_from_slice(bytes, wire_config())?;
    if consumed != bytes.len() {
        return Err(ProtocolError::TrailingBytes(bytes.len() - consumed));
    }
    Ok(data)
}
