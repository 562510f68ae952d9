//! Wire types shared by the game core and the server.
//!
//! Everything here is `serde`-serializable and shaped to match the client
//! vocabulary: card numbers travel as the integers 1–3, the other card
//! attributes as lowercase strings, and state snapshots as camelCase
//! objects.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::ProtocolError;

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// A unique identifier for a player.
///
/// Assigned by the server when a connection is accepted; opaque and stable
/// for the lifetime of that connection. Serializes as a plain number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub u64);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P-{}", self.0)
    }
}

/// Length of a room code.
pub const ROOM_CODE_LEN: usize = 6;

/// Characters a room code may contain: base-36, uppercase.
pub const ROOM_CODE_ALPHABET: &str = "0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// A short, human-typeable room code (e.g. `"K3X9ZQ"`).
///
/// Codes are generated randomly with no uniqueness guarantee; the code
/// space (36^6) is large enough relative to room lifetimes that collisions
/// are accepted rather than checked for.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomId(String);

impl RoomId {
    /// Validates a client-supplied code.
    pub fn parse(value: &str) -> Result<Self, ProtocolError> {
        if value.chars().count() != ROOM_CODE_LEN {
            return Err(ProtocolError::InvalidRoomCode(format!(
                "room code must be {ROOM_CODE_LEN} characters, got {}",
                value.chars().count()
            )));
        }
        if let Some(ch) =
            value.chars().find(|ch| !ROOM_CODE_ALPHABET.contains(*ch))
        {
            return Err(ProtocolError::InvalidRoomCode(format!(
                "invalid character {ch:?} in room code"
            )));
        }
        Ok(Self(value.to_string()))
    }

    /// Generates a random room code.
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let alphabet = ROOM_CODE_ALPHABET.as_bytes();
        let code = (0..ROOM_CODE_LEN)
            .map(|_| {
                let idx = rng.random_range(0..alphabet.len());
                alphabet[idx] as char
            })
            .collect();
        Self(code)
    }

    /// Returns the code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for RoomId {
    type Err = ProtocolError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value)
    }
}

// ---------------------------------------------------------------------------
// Cards
// ---------------------------------------------------------------------------

/// How many symbols a card shows. Serializes as the integer 1, 2, or 3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum CardNumber {
    One = 1,
    Two = 2,
    Three = 3,
}

impl CardNumber {
    /// All values, in card order.
    pub const ALL: [CardNumber; 3] =
        [CardNumber::One, CardNumber::Two, CardNumber::Three];
}

impl From<CardNumber> for u8 {
    fn from(number: CardNumber) -> u8 {
        number as u8
    }
}

impl TryFrom<u8> for CardNumber {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(CardNumber::One),
            2 => Ok(CardNumber::Two),
            3 => Ok(CardNumber::Three),
            other => Err(format!("card number must be 1-3, got {other}")),
        }
    }
}

/// The symbol drawn on a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shape {
    Diamond,
    Oval,
    Squiggle,
}

impl Shape {
    /// All values, in card order.
    pub const ALL: [Shape; 3] = [Shape::Diamond, Shape::Oval, Shape::Squiggle];
}

/// The symbol color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Red,
    Green,
    Purple,
}

impl Color {
    /// All values, in card order.
    pub const ALL: [Color; 3] = [Color::Red, Color::Green, Color::Purple];
}

/// The symbol fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shading {
    Solid,
    Striped,
    Empty,
}

impl Shading {
    /// All values, in card order.
    pub const ALL: [Shading; 3] =
        [Shading::Solid, Shading::Striped, Shading::Empty];
}

/// A single game card: one value per attribute.
///
/// The full deck is the Cartesian product of the four attribute domains:
/// exactly 81 distinct cards. Cards are immutable values; the board
/// addresses them by index, never by identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    pub number: CardNumber,
    pub shape: Shape,
    pub color: Color,
    pub shading: Shading,
}

// ---------------------------------------------------------------------------
// Players and state snapshots
// ---------------------------------------------------------------------------

/// A player as seen by clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    /// Opaque per-connection id.
    pub id: PlayerId,
    /// Display name, chosen by the player.
    pub name: String,
    /// Sets claimed this game.
    pub score: u32,
    /// Display color (hex string), assigned by join order.
    pub color: String,
}

/// A read-only snapshot of a room, assembled for broadcast.
///
/// This is the only way room contents leave the core. The deck itself is
/// never exposed, only its remaining count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameStateView {
    pub room_id: RoomId,
    pub players: Vec<Player>,
    pub board: Vec<Card>,
    pub deck_size: usize,
    pub game_started: bool,
    pub game_over: bool,
    /// Highest-scoring player; only populated once the game is over.
    pub winner: Option<Player>,
    /// Each player's in-progress selection (board indices).
    pub selections: HashMap<PlayerId, Vec<usize>>,
}

// =========================================================================
// Tests
// =========================================================================
