//! Room state: players, deck, board, and in-progress selections.

use std::collections::HashMap;
use std::time::Instant;

use triplet_protocol::{Card, Player, PlayerId, RoomId};

/// Cards dealt at game start; the board is replenished back toward this
/// size after a claimed set.
pub const BOARD_TARGET: usize = 12;

/// Cards in a set (and in a full selection).
pub const SET_SIZE: usize = 3;

/// One game room.
///
/// Plain data owned by the registry. All mutation arrives through registry
/// commands on a single logical thread, so the struct carries no locking.
#[derive(Debug)]
pub(crate) struct Room {
    pub(crate) id: RoomId,
    /// Players in join order. Join order determines palette colors and the
    /// winner tie-break.
    pub(crate) players: Vec<Player>,
    /// Undealt cards; the last element is drawn first.
    pub(crate) deck: Vec<Card>,
    /// Visible cards. Board indices are the addressing scheme clients use.
    pub(crate) board: Vec<Card>,
    pub(crate) game_started: bool,
    pub(crate) game_over: bool,
    /// Player id → up to three board indices, in selection order.
    pub(crate) selections: HashMap<PlayerId, Vec<usize>>,
    /// Updated on create, game start, and card selection; the sweep evicts
    /// rooms idle past the TTL.
    pub(crate) last_activity: Instant,
}

impl Room {
    pub(crate) fn new(id: RoomId) -> Self {
        Self {
            id,
            players: Vec::new(),
            deck: Vec::new(),
            board: Vec::new(),
            game_started: false,
            game_over: false,
            selections: HashMap::new(),
            last_activity: Instant::now(),
        }
    }

    /// Resets the room for a fresh game and deals the opening board.
    pub(crate) fn start(&mut self, deck: Vec<Card>) {
        self.deck = deck;
        self.board.clear();
        self.game_started = true;
        self.game_over = false;
        self.selections.clear();
        for player in &mut self.players {
            player.score = 0;
        }
        self.touch();
        self.deal(BOARD_TARGET);
    }

    /// Moves up to `count` cards from the deck's tail onto the board,
    /// stopping early if the deck runs dry.
    pub(crate) fn deal(&mut self, count: usize) {
        for _ in 0..count {
            match self.deck.pop() {
                Some(card) => self.board.push(card),
                None => break,
            }
        }
    }

    pub(crate) fn touch(&mut self) {
        self.last_activity = Instant::now();
    }
}
