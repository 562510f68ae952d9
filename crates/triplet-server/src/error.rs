//! Error types for the server layer.
//!
//! Game-rule failures (`triplet_game::GameError`) never surface here;
//! they are relayed to the offending client as `error` events. This enum
//! covers the failures that end a connection or the process.

use triplet_protocol::ProtocolError;

/// Top-level server error.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Encoding or decoding a wire message failed.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// The WebSocket handshake or stream failed.
    #[error("websocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    /// Binding or accepting on the listener failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
