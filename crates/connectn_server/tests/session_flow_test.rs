//! End-to-end request handling through the dispatcher.

use connectn_engine::{Cell, GameConfig, GameMode, Seat};
use connectn_server::{
    ClientMessage, ConnectionId, GameServer, Outbound, PlayerInfo, SequenceCodes, ServerMessage,
    SessionCode, SessionRegistry, SessionStatus,
};
use serde_json::json;

const ALICE: ConnectionId = ConnectionId::new(1);
const BOB: ConnectionId = ConnectionId::new(2);
const EVE: ConnectionId = ConnectionId::new(3);

fn code() -> SessionCode {
    SessionCode::new("GAME01")
}

fn server() -> GameServer {
    GameServer::new(SessionRegistry::new(SequenceCodes::new(["GAME01", "GAME02"]), 20))
}

fn create(server: &mut GameServer, from: ConnectionId, mode: GameMode) -> Vec<Outbound> {
    server.handle(
        from,
        ClientMessage::CreateSession {
            rows: 6,
            cols: 7,
            connect_n: 4,
            game_mode: mode,
            player_name: "alice".into(),
        },
    )
}

fn join(server: &mut GameServer, from: ConnectionId, name: &str) -> Vec<Outbound> {
    server.handle(
        from,
        ClientMessage::JoinSession {
            session_code: code(),
            player_name: name.into(),
        },
    )
}

fn play(server: &mut GameServer, from: ConnectionId, column: usize) -> Vec<Outbound> {
    server.handle(
        from,
        ClientMessage::MakeMove {
            session_code: code(),
            column,
        },
    )
}

fn started() -> GameServer {
    let mut server = server();
    create(&mut server, ALICE, GameMode::Classic);
    join(&mut server, BOB, "bob");
    server
}

fn error_to(replies: &[Outbound], to: ConnectionId, message: &str) {
    assert_eq!(
        replies,
        &[Outbound::new(
            to,
            ServerMessage::Error {
                message: message.into()
            }
        )]
    );
}

#[test]
fn test_create_and_join_handshake() {
    let mut server = server();
    let created = create(&mut server, ALICE, GameMode::Classic);
    assert_eq!(
        created,
        vec![Outbound::new(
            ALICE,
            ServerMessage::SessionCreated {
                session_code: code(),
                seat_number: Seat::One,
            }
        )]
    );

    let joined = join(&mut server, BOB, "bob");
    let start = ServerMessage::SessionStart {
        players: vec![
            PlayerInfo {
                name: "alice".into(),
                seat_number: Seat::One,
            },
            PlayerInfo {
                name: "bob".into(),
                seat_number: Seat::Two,
            },
        ],
        config: GameConfig::default(),
        current_player: Seat::One,
    };
    assert_eq!(
        joined,
        vec![
            Outbound::new(
                BOB,
                ServerMessage::SessionJoined {
                    session_code: code(),
                    seat_number: Seat::Two,
                    config: GameConfig::default(),
                }
            ),
            Outbound::new(ALICE, start.clone()),
            Outbound::new(BOB, start),
        ]
    );
}

#[test]
fn test_invalid_config_reported_to_requester() {
    let mut server = server();
    let replies = server.handle(
        ALICE,
        ClientMessage::CreateSession {
            rows: 6,
            cols: 7,
            connect_n: 2,
            game_mode: GameMode::Classic,
            player_name: "alice".into(),
        },
    );
    error_to(&replies, ALICE, "Connect value must be at least 3 (got 2)");
    assert!(server.registry().is_empty());
}

#[test]
fn test_join_errors() {
    let mut server = started();
    error_to(&join(&mut server, EVE, "eve"), EVE, "Session is full");

    let replies = server.handle(
        EVE,
        ClientMessage::JoinSession {
            session_code: SessionCode::new("NOPE00"),
            player_name: "eve".into(),
        },
    );
    error_to(&replies, EVE, "Session not found");
}

#[test]
fn test_bottom_row_win_broadcast() {
    let mut server = started();
    let movers = [ALICE, BOB];
    let mut last = Vec::new();
    for (i, column) in [0, 0, 1, 1, 2, 2, 3].into_iter().enumerate() {
        last = play(&mut server, movers[i % 2], column);
    }

    assert_eq!(last.len(), 2);
    assert_eq!(last[0].to, ALICE);
    assert_eq!(last[1].to, BOB);
    assert_eq!(last[0].message, last[1].message);
    assert_eq!(
        serde_json::to_value(&last[0].message).unwrap(),
        json!({
            "type": "move-applied",
            "row": 5,
            "column": 3,
            "moverSeat": 1,
            "winnerSeat": 1,
            "winningCells": [[5, 0], [5, 1], [5, 2], [5, 3]]
        })
    );

    let session = server.registry().get(&code()).unwrap();
    assert_eq!(*session.status(), SessionStatus::Finished);
    error_to(&play(&mut server, BOB, 4), BOB, "Game is over");
}

#[test]
fn test_turn_and_membership_errors_leave_state() {
    let mut server = started();
    error_to(&play(&mut server, BOB, 0), BOB, "Not your turn");
    error_to(&play(&mut server, EVE, 0), EVE, "You are not in this game");
    error_to(&play(&mut server, ALICE, 7), ALICE, "Column 7 does not exist");

    let session = server.registry().get(&code()).unwrap();
    assert_eq!(session.game().board().occupied_count(), 0);
    assert_eq!(session.current_player(), Seat::One);
}

#[test]
fn test_turn_alternation() {
    let mut server = started();
    let movers = [ALICE, BOB];
    for n in 1..=6usize {
        let replies = play(&mut server, movers[(n - 1) % 2], n % 7);
        let expected = if n % 2 == 0 { Seat::One } else { Seat::Two };
        assert!(matches!(
            replies[0].message,
            ServerMessage::MoveApplied { next_player: Some(next), .. } if next == expected
        ));
    }
}

#[test]
fn test_reset_after_finish() {
    let mut server = started();
    let movers = [ALICE, BOB];
    for (i, column) in [0, 0, 1, 1, 2, 2, 3].into_iter().enumerate() {
        play(&mut server, movers[i % 2], column);
    }

    let replies = server.handle(
        BOB,
        ClientMessage::ResetSession {
            session_code: code(),
        },
    );
    let reset = ServerMessage::SessionReset {
        config: GameConfig::default(),
        current_player: Seat::One,
    };
    assert_eq!(
        replies,
        vec![Outbound::new(ALICE, reset.clone()), Outbound::new(BOB, reset)]
    );

    let session = server.registry().get(&code()).unwrap();
    assert_eq!(*session.status(), SessionStatus::Active);
    let board = session.game().board();
    assert!((0..6).all(|r| (0..7).all(|c| board.get(r, c) == Ok(Cell::Empty))));
    assert_eq!(session.roster().len(), 2);
}

#[test]
fn test_disconnect_abandons_session() {
    let mut server = started();
    play(&mut server, ALICE, 3);

    let notices = server.disconnect(ALICE);
    assert_eq!(
        notices,
        vec![Outbound::new(
            BOB,
            ServerMessage::ParticipantDisconnected {
                name: "alice".into()
            }
        )]
    );
    assert!(server.registry().get(&code()).is_none());
    error_to(&play(&mut server, BOB, 3), BOB, "Session not found");
}

#[test]
fn test_disconnect_of_stranger_is_silent() {
    let mut server = started();
    assert!(server.disconnect(EVE).is_empty());
    assert_eq!(server.registry().len(), 1);
}

#[test]
fn test_sessions_are_isolated() {
    let mut server = server();
    create(&mut server, ALICE, GameMode::Classic);
    create(&mut server, EVE, GameMode::AdjacentCapture);
    assert_eq!(
        server.registry().codes(),
        vec![SessionCode::new("GAME01"), SessionCode::new("GAME02")]
    );

    join(&mut server, BOB, "bob");
    play(&mut server, ALICE, 0);
    let other = server.registry().get(&SessionCode::new("GAME02")).unwrap();
    assert_eq!(other.game().board().occupied_count(), 0);
    assert_eq!(*other.status(), SessionStatus::AwaitingOpponent);
}
