//! The room registry: every live room, plus a player → room reverse index.
//!
//! This is the entry point for game operations from the hosting layer
//! (connection handlers, the sweep task). It owns all room state
//! exclusively, with no ambient or static data, and is handed to whatever
//! hosts the transport.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use triplet_protocol::{Card, GameStateView, Player, PlayerId, RoomId};

use crate::deck::create_deck;
use crate::error::GameError;
use crate::room::{Room, BOARD_TARGET, SET_SIZE};
use crate::rules::{find_sets, is_valid_set};

/// How long a room may sit idle before the sweep evicts it.
pub const ROOM_TTL: Duration = Duration::from_secs(2 * 60 * 60);

/// Display colors assigned by join order, cycling when a room outgrows
/// the palette.
const PLAYER_PALETTE: [&str; 6] = [
    "#667eea", "#f093fb", "#4facfe", "#43e97b", "#fa709a", "#feca57",
];

/// Settings for a [`RoomRegistry`].
#[derive(Debug, Clone)]
pub struct RegistryConfig {
    /// Idle time after which [`RoomRegistry::sweep_idle`] evicts a room.
    pub room_ttl: Duration,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self { room_ttl: ROOM_TTL }
    }
}

/// The result of a completed set check.
#[derive(Debug, Clone, PartialEq)]
pub struct SetResult {
    /// Whether the three cards formed a valid set.
    pub valid: bool,
    /// Display name of the checking player.
    pub player_name: String,
    /// The three cards as they sat on the board (pre-removal).
    pub cards: [Card; 3],
    /// The checking player's score after the check.
    pub score: u32,
}

/// Outcome of [`RoomRegistry::check_set`].
#[derive(Debug, Clone, PartialEq)]
pub enum SetOutcome {
    /// The player did not hold exactly three selected cards; nothing
    /// changed.
    Incomplete,
    /// Three cards were evaluated. Every player's pending selection is
    /// cleared afterwards, valid or not.
    Checked(SetResult),
}

/// Owns all rooms and routes every game command.
pub struct RoomRegistry {
    /// Live rooms, keyed by room code.
    rooms: HashMap<RoomId, Room>,
    /// Maps each player to the room they're in. A player is in at most
    /// one room at a time (key invariant; this gives O(1) disconnect handling).
    player_rooms: HashMap<PlayerId, RoomId>,
    config: RegistryConfig,
}

impl RoomRegistry {
    /// Creates an empty registry.
    pub fn new(config: RegistryConfig) -> Self {
        Self {
            rooms: HashMap::new(),
            player_rooms: HashMap::new(),
            config,
        }
    }

    /// Creates a new empty room and returns its code.
    ///
    /// Codes are random with no uniqueness check; the code space is large
    /// enough relative to room lifetimes that a collision (which would
    /// replace the old room) is an accepted risk.
    pub fn create_room(&mut self) -> RoomId {
        let room_id = RoomId::generate(&mut rand::rng());
        self.rooms.insert(room_id.clone(), Room::new(room_id.clone()));
        tracing::info!(%room_id, rooms = self.rooms.len(), "room created");
        room_id
    }

    /// Adds a player to a room. Returns `None` if the room doesn't exist.
    ///
    /// No capacity check here; the hosting layer enforces its limit
    /// before calling.
    pub fn add_player(
        &mut self,
        room_id: &RoomId,
        player_id: PlayerId,
        name: &str,
    ) -> Option<Player> {
        let room = self.rooms.get_mut(room_id)?;
        let color = PLAYER_PALETTE[room.players.len() % PLAYER_PALETTE.len()];
        let player = Player {
            id: player_id,
            name: name.to_string(),
            score: 0,
            color: color.to_string(),
        };
        room.players.push(player.clone());
        self.player_rooms.insert(player_id, room_id.clone());
        tracing::info!(
            %room_id,
            %player_id,
            players = room.players.len(),
            "player joined"
        );
        Some(player)
    }

    /// Removes a player from whatever room they're in.
    ///
    /// Clears their pending selection and deletes the room entirely when
    /// it empties. Returns the affected room id, or `None` if the player
    /// wasn't tracked.
    pub fn remove_player(&mut self, player_id: PlayerId) -> Option<RoomId> {
        let room_id = self.player_rooms.remove(&player_id)?;
        if let Some(room) = self.rooms.get_mut(&room_id) {
            room.players.retain(|p| p.id != player_id);
            room.selections.remove(&player_id);
            tracing::info!(
                %room_id,
                %player_id,
                players = room.players.len(),
                "player left"
            );
            if room.players.is_empty() {
                self.rooms.remove(&room_id);
                tracing::info!(%room_id, "room destroyed, last player left");
            }
        }
        Some(room_id)
    }

    /// Starts (or restarts) the game: fresh shuffled deck, cleared board
    /// and selections, scores reset, twelve cards dealt.
    pub fn start_game(&mut self, room_id: &RoomId) -> Result<(), GameError> {
        let room = self
            .rooms
            .get_mut(room_id)
            .ok_or(GameError::RoomNotFound)?;
        room.start(create_deck(&mut rand::rng()));
        tracing::info!(
            %room_id,
            players = room.players.len(),
            "game started"
        );
        Ok(())
    }

    /// Toggles one board card in a player's selection.
    ///
    /// Selecting an already-selected index removes it; a new index is
    /// appended while fewer than three are held. Returns the player's
    /// full selection after the toggle.
    pub fn select_card(
        &mut self,
        room_id: &RoomId,
        player_id: PlayerId,
        card_index: usize,
    ) -> Result<Vec<usize>, GameError> {
        let room = self
            .rooms
            .get_mut(room_id)
            .filter(|room| room.game_started)
            .ok_or(GameError::GameNotStarted)?;
        room.touch();

        if card_index >= room.board.len() {
            return Err(GameError::InvalidCardIndex);
        }

        let selection = room.selections.entry(player_id).or_default();
        if let Some(pos) = selection.iter().position(|&i| i == card_index) {
            selection.remove(pos);
        } else if selection.len() < SET_SIZE {
            selection.push(card_index);
        } else {
            return Err(GameError::SelectionLimit);
        }
        Ok(selection.clone())
    }

    /// Evaluates a player's three selected cards as a set.
    ///
    /// On a valid set: score +1, the three cards leave the board (removed
    /// by descending index so the earlier indices stay valid), the board
    /// refills toward [`BOARD_TARGET`], and the game ends when the deck is
    /// empty with no set left anywhere on the board. Valid or not, every
    /// player's pending selection is cleared.
    pub fn check_set(
        &mut self,
        room_id: &RoomId,
        player_id: PlayerId,
    ) -> Result<SetOutcome, GameError> {
        let room = self
            .rooms
            .get_mut(room_id)
            .ok_or(GameError::RoomNotFound)?;

        let indices: Vec<usize> = match room.selections.get(&player_id) {
            Some(selection) if selection.len() == SET_SIZE => selection.clone(),
            _ => return Ok(SetOutcome::Incomplete),
        };
        let (Some(&a), Some(&b), Some(&c)) = (
            room.board.get(indices[0]),
            room.board.get(indices[1]),
            room.board.get(indices[2]),
        ) else {
            return Ok(SetOutcome::Incomplete);
        };
        let cards = [a, b, c];
        let Some(position) =
            room.players.iter().position(|p| p.id == player_id)
        else {
            return Ok(SetOutcome::Incomplete);
        };

        let valid = is_valid_set(&cards);
        if valid {
            room.players[position].score += 1;

            let mut descending = indices;
            descending.sort_unstable_by(|a, b| b.cmp(a));
            for index in descending {
                room.board.remove(index);
            }

            let refill = SET_SIZE
                .min(BOARD_TARGET.saturating_sub(room.board.len()))
                .min(room.deck.len());
            room.deal(refill);

            if room.deck.is_empty() && find_sets(&room.board).is_empty() {
                room.game_over = true;
                tracing::info!(%room_id, "game over, deck exhausted and board has no set");
            }
        }

        room.selections.clear();

        let player = &room.players[position];
        tracing::debug!(
            %room_id,
            %player_id,
            valid,
            score = player.score,
            "set checked"
        );
        Ok(SetOutcome::Checked(SetResult {
            valid,
            player_name: player.name.clone(),
            cards,
            score: player.score,
        }))
    }

    /// Deals exactly three extra cards onto the board (which may then
    /// exceed [`BOARD_TARGET`] until sets are claimed).
    pub fn add_three_cards(&mut self, room_id: &RoomId) -> Result<(), GameError> {
        let room = self
            .rooms
            .get_mut(room_id)
            .ok_or(GameError::RoomNotFound)?;
        if room.deck.len() < SET_SIZE {
            return Err(GameError::InsufficientDeck);
        }
        room.deal(SET_SIZE);
        tracing::debug!(%room_id, board = room.board.len(), "dealt 3 extra cards");
        Ok(())
    }

    /// The first valid set on the board, or `None` when the board has no
    /// set (or the room doesn't exist).
    pub fn hint(&self, room_id: &RoomId) -> Option<[usize; 3]> {
        let room = self.rooms.get(room_id)?;
        find_sets(&room.board).first().copied()
    }

    /// Assembles a read-only snapshot of a room for broadcast.
    ///
    /// The deck itself never leaves the core, only its remaining count.
    /// `winner` is computed only once the game is over: the first player
    /// in join order holding the maximal score.
    pub fn game_state(&self, room_id: &RoomId) -> Option<GameStateView> {
        let room = self.rooms.get(room_id)?;
        let winner = if room.game_over && !room.players.is_empty() {
            room.players
                .iter()
                .reduce(|best, player| {
                    // Strictly greater only: ties keep the earlier player.
                    if player.score > best.score {
                        player
                    } else {
                        best
                    }
                })
                .cloned()
        } else {
            None
        };
        Some(GameStateView {
            room_id: room.id.clone(),
            players: room.players.clone(),
            board: room.board.clone(),
            deck_size: room.deck.len(),
            game_started: room.game_started,
            game_over: room.game_over,
            winner,
            selections: room.selections.clone(),
        })
    }

    /// Whether a room with this code exists.
    pub fn contains_room(&self, room_id: &RoomId) -> bool {
        self.rooms.contains_key(room_id)
    }

    /// Number of players in a room, or `None` if it doesn't exist.
    pub fn player_count(&self, room_id: &RoomId) -> Option<usize> {
        self.rooms.get(room_id).map(|room| room.players.len())
    }

    /// Ids of every player in a room (empty if it doesn't exist). The
    /// hosting layer uses this for broadcast fan-out.
    pub fn player_ids(&self, room_id: &RoomId) -> Vec<PlayerId> {
        self.rooms
            .get(room_id)
            .map(|room| room.players.iter().map(|p| p.id).collect())
            .unwrap_or_default()
    }

    /// The room a player is currently in, if any.
    pub fn player_room(&self, player_id: &PlayerId) -> Option<&RoomId> {
        self.player_rooms.get(player_id)
    }

    /// Number of live rooms.
    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    /// Evicts every room idle longer than the configured TTL, clearing
    /// its players' reverse-index entries. Returns the evicted room ids.
    ///
    /// Advisory cleanup; correctness doesn't depend on when this runs.
    pub fn sweep_idle(&mut self) -> Vec<RoomId> {
        let now = Instant::now();
        let expired: Vec<RoomId> = self
            .rooms
            .iter()
            .filter(|(_, room)| {
                now.duration_since(room.last_activity) > self.config.room_ttl
            })
            .map(|(room_id, _)| room_id.clone())
            .collect();

        for room_id in &expired {
            if let Some(room) = self.rooms.remove(room_id) {
                for player in &room.players {
                    self.player_rooms.remove(&player.id);
                }
                tracing::info!(%room_id, "stale room evicted");
            }
        }
        expired
    }
}

impl Default for RoomRegistry {
    fn default() -> Self {
        Self::new(RegistryConfig::default())
    }
}

// =========================================================================
// Tests
// =========================================================================
