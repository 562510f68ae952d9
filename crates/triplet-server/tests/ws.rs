//! End-to-end WebSocket tests: real server, real client connections.

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio_tungstenite::tungstenite::Message;
use triplet_game::{BOARD_TARGET, DECK_SIZE};
use triplet_protocol::{ClientMessage, Player, RoomId, ServerMessage};
use triplet_server::Server;

type Ws = tokio_tungstenite::WebSocketStream<
    tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>,
>;

async fn start() -> String {
    let server = Server::bind("127.0.0.1:0").await.unwrap();
    let addr = server.local_addr().unwrap().to_string();
    tokio::spawn(async move {
        let _ = server.run().await;
    });
    tokio::time::sleep(Duration::from_millis(10)).await;
    addr
}

async fn ws(addr: &str) -> Ws {
    let (ws, _) = tokio_tungstenite::connect_async(format!("ws://{addr}"))
        .await
        .unwrap();
    ws
}

async fn send(ws: &mut Ws, msg: &ClientMessage) {
    let bytes = serde_json::to_vec(msg).unwrap();
    ws.send(Message::Binary(bytes.into())).await.unwrap();
}

async fn recv(ws: &mut Ws) -> ServerMessage {
    let msg = tokio::time::timeout(Duration::from_secs(5), ws.next())
        .await
        .expect("timed out waiting for an event")
        .unwrap()
        .unwrap();
    serde_json::from_slice(&msg.into_data()).unwrap()
}

/// Receives until `want` matches, discarding everything else. Broadcast
/// interleavings (state refreshes, other players' selections) make strict
/// sequences brittle; tests assert on the events they care about.
async fn recv_until<F>(ws: &mut Ws, mut want: F) -> ServerMessage
where
    F: FnMut(&ServerMessage) -> bool,
{
    loop {
        let msg = recv(ws).await;
        if want(&msg) {
            return msg;
        }
    }
}

/// Creates a room from `ws`, returning the room id and the creator.
async fn create_room(ws: &mut Ws, name: &str) -> (RoomId, Player) {
    send(
        ws,
        &ClientMessage::CreateRoom {
            player_name: name.into(),
        },
    )
    .await;
    let msg = recv_until(ws, |m| matches!(m, ServerMessage::RoomCreated { .. })).await;
    match msg {
        ServerMessage::RoomCreated { room_id, player } => (room_id, player),
        _ => unreachable!(),
    }
}

/// Joins `room_id` from `ws`, returning the created player.
async fn join_room(ws: &mut Ws, room_id: &RoomId, name: &str) -> Player {
    send(
        ws,
        &ClientMessage::JoinRoom {
            room_id: room_id.clone(),
            player_name: name.into(),
        },
    )
    .await;
    let msg = recv_until(ws, |m| matches!(m, ServerMessage::RoomJoined { .. })).await;
    match msg {
        ServerMessage::RoomJoined { player, .. } => player,
        _ => unreachable!(),
    }
}

// =========================================================================
// Room lifecycle over the wire
// =========================================================================

#[tokio::test]
async fn test_create_room_returns_player_and_state() {
    let addr = start().await;
    let mut p1 = ws(&addr).await;

    let (room_id, player) = create_room(&mut p1, "Ana").await;
    assert_eq!(player.name, "Ana");
    assert_eq!(player.score, 0);
    assert!(!player.color.is_empty());
    assert_eq!(room_id.as_str().len(), 6);

    let msg = recv_until(&mut p1, |m| matches!(m, ServerMessage::GameState(_))).await;
    let ServerMessage::GameState(view) = msg else {
        unreachable!()
    };
    assert_eq!(view.room_id, room_id);
    assert_eq!(view.players.len(), 1);
    assert!(!view.game_started);
    assert_eq!(view.deck_size, 0);
}

#[tokio::test]
async fn test_join_unknown_room_errors() {
    let addr = start().await;
    let mut p1 = ws(&addr).await;

    send(
        &mut p1,
        &ClientMessage::JoinRoom {
            room_id: RoomId::parse("ZZZZZZ").unwrap(),
            player_name: "Bo".into(),
        },
    )
    .await;
    let msg = recv(&mut p1).await;
    assert_eq!(
        msg,
        ServerMessage::Error {
            message: "Room not found".into()
        }
    );
}

#[tokio::test]
async fn test_room_capacity_is_six() {
    let addr = start().await;
    let mut creator = ws(&addr).await;
    let (room_id, _) = create_room(&mut creator, "p0").await;

    // Five more seats fill the room.
    let mut others = Vec::new();
    for i in 1..6 {
        let mut peer = ws(&addr).await;
        join_room(&mut peer, &room_id, &format!("p{i}")).await;
        others.push(peer);
    }

    // The seventh player bounces.
    let mut extra = ws(&addr).await;
    send(
        &mut extra,
        &ClientMessage::JoinRoom {
            room_id: room_id.clone(),
            player_name: "p6".into(),
        },
    )
    .await;
    let msg = recv(&mut extra).await;
    assert_eq!(
        msg,
        ServerMessage::Error {
            message: "Room is full".into()
        }
    );
}

#[tokio::test]
async fn test_join_notifies_existing_players() {
    let addr = start().await;
    let mut p1 = ws(&addr).await;
    let (room_id, _) = create_room(&mut p1, "Ana").await;

    let mut p2 = ws(&addr).await;
    let bo = join_room(&mut p2, &room_id, "Bo").await;

    let msg = recv_until(&mut p1, |m| {
        matches!(m, ServerMessage::PlayerJoined { .. })
    })
    .await;
    assert_eq!(msg, ServerMessage::PlayerJoined { player: bo });
}

// =========================================================================
// Game flow over the wire
// =========================================================================

#[tokio::test]
async fn test_start_game_broadcasts_a_dealt_board() {
    let addr = start().await;
    let mut p1 = ws(&addr).await;
    let (room_id, _) = create_room(&mut p1, "Ana").await;
    let mut p2 = ws(&addr).await;
    join_room(&mut p2, &room_id, "Bo").await;

    send(&mut p1, &ClientMessage::StartGame { room_id }).await;

    for peer in [&mut p1, &mut p2] {
        let msg =
            recv_until(peer, |m| matches!(m, ServerMessage::GameStarted(_))).await;
        let ServerMessage::GameStarted(view) = msg else {
            unreachable!()
        };
        assert!(view.game_started);
        assert_eq!(view.board.len(), BOARD_TARGET);
        assert_eq!(view.deck_size, DECK_SIZE - BOARD_TARGET);
        assert_eq!(view.players.len(), 2);
        assert!(view.players.iter().all(|p| p.score == 0));
    }
}

#[tokio::test]
async fn test_selection_toggle_is_broadcast() {
    let addr = start().await;
    let mut p1 = ws(&addr).await;
    let (room_id, ana) = create_room(&mut p1, "Ana").await;
    let mut p2 = ws(&addr).await;
    join_room(&mut p2, &room_id, "Bo").await;
    send(
        &mut p1,
        &ClientMessage::StartGame {
            room_id: room_id.clone(),
        },
    )
    .await;

    send(
        &mut p1,
        &ClientMessage::SelectCard {
            room_id: room_id.clone(),
            card_index: 4,
        },
    )
    .await;
    // Both ends see the selection.
    for peer in [&mut p1, &mut p2] {
        let msg = recv_until(peer, |m| {
            matches!(m, ServerMessage::CardSelected { .. })
        })
        .await;
        assert_eq!(
            msg,
            ServerMessage::CardSelected {
                player_id: ana.id,
                card_index: 4,
                selected_cards: vec![4],
            }
        );
    }

    // Selecting the same card again clears it.
    send(
        &mut p1,
        &ClientMessage::SelectCard {
            room_id: room_id.clone(),
            card_index: 4,
        },
    )
    .await;
    let msg = recv_until(&mut p1, |m| {
        matches!(m, ServerMessage::CardSelected { .. })
    })
    .await;
    assert_eq!(
        msg,
        ServerMessage::CardSelected {
            player_id: ana.id,
            card_index: 4,
            selected_cards: vec![],
        }
    );
}

#[tokio::test]
async fn test_hint_guided_set_claim_scores_and_refreshes() {
    let addr = start().await;
    let mut p1 = ws(&addr).await;
    let (room_id, ana) = create_room(&mut p1, "Ana").await;
    let mut p2 = ws(&addr).await;
    join_room(&mut p2, &room_id, "Bo").await;
    send(
        &mut p1,
        &ClientMessage::StartGame {
            room_id: room_id.clone(),
        },
    )
    .await;

    // A shuffled 12-card board occasionally has no set; deal more cards
    // until the hint names one.
    let mut extra_deals = 0usize;
    let indices = loop {
        send(
            &mut p1,
            &ClientMessage::RequestHint {
                room_id: room_id.clone(),
            },
        )
        .await;
        let msg = recv_until(&mut p1, |m| {
            matches!(
                m,
                ServerMessage::Hint { .. } | ServerMessage::Error { .. }
            )
        })
        .await;
        match msg {
            ServerMessage::Hint { indices } => break indices,
            ServerMessage::Error { message } => {
                assert_eq!(message, "No sets available on the board");
                send(
                    &mut p1,
                    &ClientMessage::Add3Cards {
                        room_id: room_id.clone(),
                    },
                )
                .await;
                recv_until(&mut p1, |m| {
                    matches!(m, ServerMessage::CardsAdded { .. })
                })
                .await;
                extra_deals += 1;
            }
            _ => unreachable!(),
        }
    };

    for &index in &indices {
        send(
            &mut p1,
            &ClientMessage::SelectCard {
                room_id: room_id.clone(),
                card_index: index,
            },
        )
        .await;
    }

    // The third selection triggers the check; everyone hears about it.
    for peer in [&mut p1, &mut p2] {
        let msg =
            recv_until(peer, |m| matches!(m, ServerMessage::ValidSet { .. }))
                .await;
        let ServerMessage::ValidSet {
            player_id,
            player_name,
            score,
            ..
        } = msg
        else {
            unreachable!()
        };
        assert_eq!(player_id, ana.id);
        assert_eq!(player_name, "Ana");
        assert_eq!(score, 1);
    }

    // The delayed refresh lands with the claim applied.
    let msg = recv_until(&mut p2, |m| {
        matches!(m, ServerMessage::GameState(view) if view.players[0].score == 1)
    })
    .await;
    let ServerMessage::GameState(view) = msg else {
        unreachable!()
    };
    // An oversized board (extra deals) shrinks by three with no refill; a
    // 12-card board refills back to 12.
    let expected_board = BOARD_TARGET + 3 * extra_deals.saturating_sub(1);
    assert_eq!(view.board.len(), expected_board);
    assert!(view.selections.is_empty());
}

#[tokio::test]
async fn test_disconnect_notifies_the_room() {
    let addr = start().await;
    let mut p1 = ws(&addr).await;
    let (room_id, _) = create_room(&mut p1, "Ana").await;
    let mut p2 = ws(&addr).await;
    let bo = join_room(&mut p2, &room_id, "Bo").await;

    p2.close(None).await.unwrap();

    let msg = recv_until(&mut p1, |m| {
        matches!(m, ServerMessage::PlayerLeft { .. })
    })
    .await;
    assert_eq!(msg, ServerMessage::PlayerLeft { player_id: bo.id });

    let msg = recv_until(&mut p1, |m| matches!(m, ServerMessage::GameState(_))).await;
    let ServerMessage::GameState(view) = msg else {
        unreachable!()
    };
    assert_eq!(view.players.len(), 1);
    assert_eq!(view.players[0].name, "Ana");
}
