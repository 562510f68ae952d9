//! Error types for the protocol layer.

/// Errors that can occur while encoding, decoding, or validating wire data.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization failed.
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// Deserialization failed: malformed JSON, missing fields, or wrong
    /// types.
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),

    /// A client-supplied room code has the wrong length or alphabet.
    #[error("invalid room code: {0}")]
    InvalidRoomCode(String),
}
