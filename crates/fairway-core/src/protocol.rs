use serde::{Deserialize, Serialize};

/// Current frame format version.
pub const PROTOCOL_VERSION: u8 = 1;

/// Maximum encoded frame size in bytes.
pub const MAX_FRAME_SIZE: usize = 16 * 1024; // 16 KiB

#[derive(Debug)]
pub enum ProtocolError {
    EmptyFrame,
    VersionMismatch(u8),
    PayloadTooLarge(usize),
    SerializeError(String),
    DeserializeError(String),
}

impl std::fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyFrame => write!(f, "empty frame"),
            Self::VersionMismatch(v) => {
                write!(f, "frame version {v} (expected {PROTOCOL_VERSION})")
            },
            Self::PayloadTooLarge(size) => {
                write!(f, "payload too large: {size} bytes (max {MAX_FRAME_SIZE})")
            },
            Self::SerializeError(e) => write!(f, "serialize error: {e}"),
            Self::DeserializeError(e) => write!(f, "deserialize error: {e}"),
        }
    }
}

impl std::error::Error for ProtocolError {}

/// Encode a state snapshot as a version-prefixed MessagePack frame.
pub fn encode_frame<T: Serialize>(state: &T) -> Result<Vec<u8>, ProtocolError> {
    let payload =
        rmp_serde::to_vec_named(state).map_err(|e| ProtocolError::SerializeError(e.to_string()))?;
    wrap_payload(&payload)
}

/// Frame an already-serialized MessagePack payload.
pub fn wrap_payload(payload: &[u8]) -> Result<Vec<u8>, ProtocolError> {
    if payload.is_empty() {
        return Err(ProtocolError::EmptyFrame);
    }
    let total = 1 + payload.len();
    if total > MAX_FRAME_SIZE {
        return Err(ProtocolError::PayloadTooLarge(total));
    }
    let mut buf = Vec::with_capacity(total);
    buf.push(PROTOCOL_VERSION);
    buf.extend_from_slice(payload);
    Ok(buf)
}

/// Decode a frame produced by [`encode_frame`].
pub fn decode_frame<T: for<'de> Deserialize<'de>>(data: &[u8]) -> Result<T, ProtocolError> {
    let (&version, payload) = data.split_first().ok_or(ProtocolError::EmptyFrame)?;
    if version != PROTOCOL_VERSION {
        return Err(ProtocolError::VersionMismatch(version));
    }
    rmp_serde::from_slice(payload).map_err(|e| ProtocolError::DeserializeError(e.to_string()))
}
