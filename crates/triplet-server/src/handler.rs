//! Per-connection handling: identity, read loop, command dispatch, and
//! the event choreography around each command.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;
use triplet_game::{SetOutcome, SET_SIZE};
use triplet_protocol::{ClientMessage, Codec, PlayerId, RoomId, ServerMessage};

use crate::server::ServerState;
use crate::ServerError;

/// Counter for assigning per-connection player ids.
static NEXT_PLAYER_ID: AtomicU64 = AtomicU64::new(1);

/// Most players a room accepts. Enforced here; the registry itself
/// doesn't cap membership.
const MAX_PLAYERS_PER_ROOM: usize = 6;

/// Pause before the post-set state refresh, so clients can show the
/// claimed cards before the board changes under them.
const VALID_SET_REFRESH_DELAY: Duration = Duration::from_millis(1500);

/// Shorter pause after a failed claim; only the selections reset.
const INVALID_SET_REFRESH_DELAY: Duration = Duration::from_millis(1000);

/// Handles one connection from accept to close.
pub(crate) async fn handle_connection(
    stream: TcpStream,
    state: Arc<ServerState>,
) -> Result<(), ServerError> {
    let ws = tokio_tungstenite::accept_async(stream).await?;
    let player_id = PlayerId(NEXT_PLAYER_ID.fetch_add(1, Ordering::Relaxed));
    tracing::info!(%player_id, "player connected");

    let (mut sink, mut source) = ws.split();
    let (sender, mut outbound) = mpsc::unbounded_channel::<ServerMessage>();

    // Writer task: drain this player's outbound queue into the socket.
    // It ends when the hub drops the sender (disconnect) or the socket
    // rejects a write.
    let codec = state.codec;
    let writer = tokio::spawn(async move {
        while let Some(message) = outbound.recv().await {
            let bytes = match codec.encode(&message) {
                Ok(bytes) => bytes,
                Err(error) => {
                    tracing::warn!(%error, "dropping unencodable event");
                    continue;
                }
            };
            if sink.send(Message::Binary(bytes.into())).await.is_err() {
                break;
            }
        }
    });

    state.hub.lock().await.register_peer(player_id, sender);

    while let Some(incoming) = source.next().await {
        let data = match incoming {
            Ok(Message::Binary(data)) => data.into(),
            Ok(Message::Text(text)) => text.as_bytes().to_vec(),
            Ok(Message::Close(_)) => break,
            Ok(_) => continue, // ping/pong/frame
            Err(error) => {
                tracing::debug!(%player_id, %error, "recv error");
                break;
            }
        };

        let command: ClientMessage = match state.codec.decode(&data) {
            Ok(command) => command,
            Err(error) => {
                tracing::debug!(%player_id, %error, "failed to decode command");
                continue;
            }
        };

        dispatch(&state, player_id, command).await;
    }

    disconnect(&state, player_id).await;
    let _ = writer.await;
    Ok(())
}

/// Runs one command against the hub and fans out the resulting events.
async fn dispatch(
    state: &Arc<ServerState>,
    player_id: PlayerId,
    command: ClientMessage,
) {
    match command {
        ClientMessage::CreateRoom { player_name } => {
            let mut hub = state.hub.lock().await;
            let room_id = hub.registry.create_room();
            let Some(player) =
                hub.registry.add_player(&room_id, player_id, &player_name)
            else {
                return;
            };
            hub.send_to(
                player_id,
                ServerMessage::RoomCreated {
                    room_id: room_id.clone(),
                    player,
                },
            );
            if let Some(view) = hub.registry.game_state(&room_id) {
                hub.broadcast(&room_id, ServerMessage::GameState(view));
            }
        }

        ClientMessage::JoinRoom {
            room_id,
            player_name,
        } => {
            let mut hub = state.hub.lock().await;
            if !hub.registry.contains_room(&room_id) {
                hub.send_to(player_id, error_event("Room not found"));
                return;
            }
            if hub.registry.player_count(&room_id).unwrap_or(0)
                >= MAX_PLAYERS_PER_ROOM
            {
                hub.send_to(player_id, error_event("Room is full"));
                return;
            }
            let Some(player) =
                hub.registry.add_player(&room_id, player_id, &player_name)
            else {
                return;
            };
            hub.send_to(
                player_id,
                ServerMessage::RoomJoined {
                    room_id: room_id.clone(),
                    player: player.clone(),
                },
            );
            if let Some(view) = hub.registry.game_state(&room_id) {
                hub.broadcast(&room_id, ServerMessage::GameState(view));
            }
            hub.broadcast(&room_id, ServerMessage::PlayerJoined { player });
        }

        ClientMessage::StartGame { room_id } => {
            let mut hub = state.hub.lock().await;
            match hub.registry.start_game(&room_id) {
                Ok(()) => {
                    if let Some(view) = hub.registry.game_state(&room_id) {
                        hub.broadcast(&room_id, ServerMessage::GameStarted(view));
                    }
                }
                Err(error) => hub.send_to(player_id, error_event(error)),
            }
        }

        ClientMessage::SelectCard {
            room_id,
            card_index,
        } => {
            let mut hub = state.hub.lock().await;
            let selected =
                match hub.registry.select_card(&room_id, player_id, card_index) {
                    Ok(selected) => selected,
                    Err(error) => {
                        hub.send_to(player_id, error_event(error));
                        return;
                    }
                };
            let held = selected.len();
            hub.broadcast(
                &room_id,
                ServerMessage::CardSelected {
                    player_id,
                    card_index,
                    selected_cards: selected,
                },
            );

            // A third card triggers the set check automatically.
            if held == SET_SIZE {
                match hub.registry.check_set(&room_id, player_id) {
                    Ok(SetOutcome::Checked(result)) if result.valid => {
                        hub.broadcast(
                            &room_id,
                            ServerMessage::ValidSet {
                                player_id,
                                player_name: result.player_name,
                                cards: result.cards,
                                score: result.score,
                            },
                        );
                        spawn_state_refresh(
                            state,
                            room_id,
                            VALID_SET_REFRESH_DELAY,
                            true,
                        );
                    }
                    Ok(SetOutcome::Checked(result)) => {
                        hub.broadcast(
                            &room_id,
                            ServerMessage::InvalidSet {
                                player_id,
                                player_name: result.player_name,
                            },
                        );
                        spawn_state_refresh(
                            state,
                            room_id,
                            INVALID_SET_REFRESH_DELAY,
                            false,
                        );
                    }
                    // Unreachable straight after a third selection, but
                    // harmless: nothing changed, nothing to announce.
                    Ok(SetOutcome::Incomplete) => {}
                    Err(error) => {
                        tracing::debug!(%player_id, %error, "set check failed");
                    }
                }
            }
        }

        ClientMessage::Add3Cards { room_id } => {
            let mut hub = state.hub.lock().await;
            match hub.registry.add_three_cards(&room_id) {
                Ok(()) => {
                    if let Some(view) = hub.registry.game_state(&room_id) {
                        hub.broadcast(&room_id, ServerMessage::GameState(view));
                    }
                    hub.broadcast(
                        &room_id,
                        ServerMessage::CardsAdded { count: SET_SIZE },
                    );
                }
                Err(error) => hub.send_to(player_id, error_event(error)),
            }
        }

        ClientMessage::RequestHint { room_id } => {
            let hub = state.hub.lock().await;
            match hub.registry.hint(&room_id) {
                Some(indices) => {
                    hub.send_to(player_id, ServerMessage::Hint { indices });
                }
                None => hub.send_to(
                    player_id,
                    error_event("No sets available on the board"),
                ),
            }
        }
    }
}

/// Broadcasts a fresh state snapshot after a delay; optionally follows
/// with the game-over announcement.
fn spawn_state_refresh(
    state: &Arc<ServerState>,
    room_id: RoomId,
    delay: Duration,
    announce_game_over: bool,
) {
    let state = Arc::clone(state);
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        let hub = state.hub.lock().await;
        let Some(view) = hub.registry.game_state(&room_id) else {
            return; // room evicted or emptied in the meantime
        };
        hub.broadcast(&room_id, ServerMessage::GameState(view.clone()));
        if announce_game_over && view.game_over {
            hub.broadcast(
                &room_id,
                ServerMessage::GameOver {
                    winner: view.winner,
                    players: view.players,
                },
            );
        }
    });
}

/// Pulls a departing player out of their room and tells the remainder.
async fn disconnect(state: &Arc<ServerState>, player_id: PlayerId) {
    let mut hub = state.hub.lock().await;
    hub.unregister_peer(player_id);
    if let Some(room_id) = hub.registry.remove_player(player_id) {
        if let Some(view) = hub.registry.game_state(&room_id) {
            hub.broadcast(&room_id, ServerMessage::PlayerLeft { player_id });
            hub.broadcast(&room_id, ServerMessage::GameState(view));
        }
    }
    tracing::info!(%player_id, "player disconnected");
}

fn error_event(message: impl ToString) -> ServerMessage {
    ServerMessage::Error {
        message: message.to_string(),
    }
}
