//! Game core for Triplet: rooms, decks, boards, and the set rules.
//!
//! The whole crate is synchronous and in-memory. A single [`RoomRegistry`]
//! owns every live room plus a player → room index for O(1) disconnect
//! handling; the hosting layer serializes commands (one at a time per
//! registry), so nothing in here locks or blocks.
//!
//! # Key types
//!
//! - [`RoomRegistry`]: creates/destroys rooms, routes every game command
//! - [`RegistryConfig`]: settings (idle-room TTL)
//! - [`GameError`]: typed failures whose messages go straight to clients
//! - [`SetOutcome`] / [`SetResult`]: what a set check produced
//!
//! Deck construction ([`create_deck`]) and the set rules
//! ([`is_valid_set`], [`find_sets`]) are exposed as free functions for
//! callers that want to reason about boards without a registry.

mod deck;
mod error;
mod registry;
mod room;
mod rules;

pub use deck::{create_deck, full_deck, DECK_SIZE};
pub use error::GameError;
pub use registry::{
    RegistryConfig, RoomRegistry, SetOutcome, SetResult, ROOM_TTL,
};
pub use room::{BOARD_TARGET, SET_SIZE};
pub use rules::{find_sets, is_valid_set};
