//! Wire protocol for Triplet.
//!
//! This crate defines the "language" that game clients and the server
//! speak:
//!
//! - **Types** ([`Card`], [`Player`], [`PlayerId`], [`RoomId`],
//!   [`GameStateView`]): the structures that travel on the wire.
//! - **Messages** ([`ClientMessage`], [`ServerMessage`]): the command and
//!   event vocabulary.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]): how messages are
//!   converted to/from bytes.
//! - **Errors** ([`ProtocolError`]): what can go wrong while doing so.
//!
//! The protocol layer knows nothing about connections or game rules; it
//! only describes shapes and how to serialize them. Rules live in
//! `triplet-game`, networking in `triplet-server`.

mod codec;
mod error;
mod messages;
mod types;

pub use codec::{Codec, JsonCodec};
pub use error::ProtocolError;
pub use messages::{ClientMessage, ServerMessage};
pub use types::{
    Card, CardNumber, Color, GameStateView, Player, PlayerId, RoomId,
    Shading, Shape, ROOM_CODE_ALPHABET, ROOM_CODE_LEN,
};
