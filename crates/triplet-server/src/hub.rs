//! The hub: the room registry plus every connected peer's outbound
//! channel, guarded together by one mutex.
//!
//! Outbound delivery uses an unbounded channel per peer, drained by that
//! connection's writer task. Sends never block, so broadcasts can happen
//! while the hub lock is held.

use std::collections::HashMap;

use tokio::sync::mpsc;
use triplet_game::{RegistryConfig, RoomRegistry};
use triplet_protocol::{PlayerId, RoomId, ServerMessage};

/// Channel sender delivering events to one player's connection.
pub(crate) type PeerSender = mpsc::UnboundedSender<ServerMessage>;

pub(crate) struct Hub {
    pub(crate) registry: RoomRegistry,
    /// Outbound channels, keyed by player id.
    peers: HashMap<PlayerId, PeerSender>,
}

impl Hub {
    pub(crate) fn new(config: RegistryConfig) -> Self {
        Self {
            registry: RoomRegistry::new(config),
            peers: HashMap::new(),
        }
    }

    pub(crate) fn register_peer(&mut self, player_id: PlayerId, sender: PeerSender) {
        self.peers.insert(player_id, sender);
    }

    pub(crate) fn unregister_peer(&mut self, player_id: PlayerId) {
        self.peers.remove(&player_id);
    }

    /// Sends an event to a single player. Silently drops it if the
    /// receiver is gone (player disconnected mid-command).
    pub(crate) fn send_to(&self, player_id: PlayerId, message: ServerMessage) {
        if let Some(sender) = self.peers.get(&player_id) {
            let _ = sender.send(message);
        }
    }

    /// Sends an event to every player in a room.
    pub(crate) fn broadcast(&self, room_id: &RoomId, message: ServerMessage) {
        for player_id in self.registry.player_ids(room_id) {
            self.send_to(player_id, message.clone());
        }
    }
}
