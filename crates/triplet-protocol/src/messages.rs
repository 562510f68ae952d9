//! The command and event vocabulary.
//!
//! Both enums are internally tagged (`{"type": "...", ...}`) with camelCase
//! tags and fields, so a selection event reads
//! `{"type":"cardSelected","playerId":1,"cardIndex":4,...}` on the wire.
//! State-carrying events (`gameStarted`, `gameState`) flatten the
//! [`GameStateView`] fields next to the tag.

use serde::{Deserialize, Serialize};

use crate::types::{Card, GameStateView, Player, PlayerId, RoomId};

/// Commands a client can send.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ClientMessage {
    /// Create a new room and join it as the first player.
    CreateRoom { player_name: String },
    /// Join an existing room by code.
    JoinRoom { room_id: RoomId, player_name: String },
    /// Start (or restart) the game in a room.
    StartGame { room_id: RoomId },
    /// Toggle one board card in the sender's selection.
    SelectCard { room_id: RoomId, card_index: usize },
    /// Deal three extra cards onto the board.
    Add3Cards { room_id: RoomId },
    /// Ask for the indices of one valid set on the board.
    RequestHint { room_id: RoomId },
}

/// Events the server sends.
///
/// Events addressed to a single client (`roomCreated`, `roomJoined`,
/// `hint`, `error`) versus the whole room is a transport decision; the
/// shapes here are shared by both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ServerMessage {
    RoomCreated {
        room_id: RoomId,
        player: Player,
    },
    RoomJoined {
        room_id: RoomId,
        player: Player,
    },
    PlayerJoined {
        player: Player,
    },
    PlayerLeft {
        player_id: PlayerId,
    },
    GameStarted(GameStateView),
    GameState(GameStateView),
    CardSelected {
        player_id: PlayerId,
        card_index: usize,
        selected_cards: Vec<usize>,
    },
    ValidSet {
        player_id: PlayerId,
        player_name: String,
        cards: [Card; 3],
        score: u32,
    },
    InvalidSet {
        player_id: PlayerId,
        player_name: String,
    },
    CardsAdded {
        count: usize,
    },
    Hint {
        indices: [usize; 3],
    },
    GameOver {
        winner: Option<Player>,
        players: Vec<Player>,
    },
    Error {
        message: String,
    },
}

// =========================================================================
// Tests
// =========================================================================
