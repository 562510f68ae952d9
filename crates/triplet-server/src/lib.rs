//! WebSocket server for Triplet.
//!
//! Ties the layers together: accepts connections, decodes
//! [`triplet_protocol::ClientMessage`] commands, runs them against the
//! [`triplet_game::RoomRegistry`], and fans the resulting events out to
//! room members.
//!
//! All registry access goes through a single mutex-guarded hub; each
//! inbound command runs to completion before the next, and the periodic
//! idle-room sweep takes the same lock, so game state never sees
//! concurrent mutation.

mod error;
mod handler;
mod hub;
mod server;

pub use error::ServerError;
pub use server::Server;
