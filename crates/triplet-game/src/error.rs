//! Error types for the game core.

/// Typed failures for registry commands.
///
/// The `Display` strings are the exact messages relayed to clients, so
/// they are part of the wire contract; change them and every client
/// string-matching on errors breaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    /// No room with that code exists (or it has been evicted).
    #[error("Room not found")]
    RoomNotFound,

    /// The room is missing or its game hasn't been started.
    #[error("Game not started")]
    GameNotStarted,

    /// A selection index outside the current board.
    #[error("Invalid card index")]
    InvalidCardIndex,

    /// A fourth distinct card while three are already held.
    #[error("Already selected 3 cards")]
    SelectionLimit,

    /// Fewer than three cards left in the deck.
    #[error("Not enough cards in deck")]
    InsufficientDeck,
}
