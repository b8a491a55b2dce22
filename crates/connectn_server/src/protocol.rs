//! Wire protocol.
//!
//! Every frame is a JSON object tagged by `type`, with camelCase fields.
//! Optional fields are omitted rather than sent as `null`.
//!
//! ```text
//! client                       server
//!   | create-session  ----------> |
//!   | <---------- session-created |
//!   | join-session    ----------> |   (second client)
//!   | <----------- session-joined |   (joiner only)
//!   | <------------ session-start |   (both)
//!   | make-move       ----------> |
//!   | <------------- move-applied |   (both)
//! ```

use crate::code::SessionCode;
use crate::error::SessionError;
use crate::session::{ConnectionId, Session};
use connectn_engine::{Coord, GameConfig, GameMode, MoveOutcome, MoveResult, Seat};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Requests sent by a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ClientMessage {
    /// Open a new session and take seat one.
    #[serde(rename_all = "camelCase")]
    CreateSession {
        /// Board rows.
        rows: usize,
        /// Board columns.
        cols: usize,
        /// Run length needed to win.
        connect_n: usize,
        /// Rule variant; classic when absent.
        #[serde(default)]
        game_mode: GameMode,
        /// Display name of the creator.
        player_name: String,
    },
    /// Take seat two of an open session.
    #[serde(rename_all = "camelCase")]
    JoinSession {
        /// Code shared by the creator.
        session_code: SessionCode,
        /// Display name of the joiner.
        player_name: String,
    },
    /// Drop a piece.
    #[serde(rename_all = "camelCase")]
    MakeMove {
        /// Target session.
        session_code: SessionCode,
        /// Column index, counted from the left.
        column: usize,
    },
    /// Start a fresh board with the same roster.
    #[serde(rename_all = "camelCase")]
    ResetSession {
        /// Target session.
        session_code: SessionCode,
    },
}

/// A seated player as announced at game start.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlayerInfo {
    /// Display name.
    pub name: String,
    /// Seat number, 1 or 2.
    pub seat_number: Seat,
}

/// Responses and broadcasts sent by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ServerMessage {
    /// Sent to the creator.
    #[serde(rename_all = "camelCase")]
    SessionCreated {
        /// Code to share with the opponent.
        session_code: SessionCode,
        /// Always seat one.
        seat_number: Seat,
    },
    /// Sent to the joiner.
    #[serde(rename_all = "camelCase")]
    SessionJoined {
        /// Joined session.
        session_code: SessionCode,
        /// Always seat two.
        seat_number: Seat,
        /// Session configuration.
        config: GameConfig,
    },
    /// Sent to both participants when the second seat fills.
    #[serde(rename_all = "camelCase")]
    SessionStart {
        /// Roster in seat order.
        players: Vec<PlayerInfo>,
        /// Session configuration.
        config: GameConfig,
        /// Seat to move first.
        current_player: Seat,
    },
    /// Sent to both participants after every accepted move.
    #[serde(rename_all = "camelCase")]
    MoveApplied {
        /// Row the piece landed in.
        row: usize,
        /// Column the piece was dropped into.
        column: usize,
        /// Seat that moved.
        mover_seat: Seat,
        /// Seat to move next, absent once the game ended.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        next_player: Option<Seat>,
        /// Winner, if this move won.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        winner_seat: Option<Seat>,
        /// Cells of the winning run.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        winning_cells: Option<Vec<Coord>>,
        /// Opponent cells converted to the mover, row-major.
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        captured_cells: Vec<Coord>,
        /// Set when the move filled the board without a winner.
        #[serde(default, skip_serializing_if = "is_false")]
        draw: bool,
    },
    /// Sent to both participants after a reset.
    #[serde(rename_all = "camelCase")]
    SessionReset {
        /// Session configuration.
        config: GameConfig,
        /// Always seat one.
        current_player: Seat,
    },
    /// Sent to the remaining participant when the other leaves.
    #[serde(rename_all = "camelCase")]
    ParticipantDisconnected {
        /// Name of the participant who left.
        name: String,
    },
    /// Sent to the requester only.
    #[serde(rename_all = "camelCase")]
    Error {
        /// Human-readable reason.
        message: String,
    },
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl ServerMessage {
    /// Builds the broadcast for an accepted move.
    pub fn move_applied(outcome: &MoveOutcome) -> Self {
        let (next_player, winner_seat, winning_cells, draw) = match &outcome.result {
            MoveResult::Continue { next } => (Some(*next), None, None, false),
            MoveResult::Won(line) => (None, Some(line.seat), Some(line.cells.clone()), false),
            MoveResult::Draw => (None, None, None, true),
        };
        ServerMessage::MoveApplied {
            row: outcome.row,
            column: outcome.column,
            mover_seat: outcome.mover,
            next_player,
            winner_seat,
            winning_cells,
            captured_cells: outcome.captured.clone(),
            draw,
        }
    }

    /// Builds the game-start broadcast for a freshly joined session.
    pub fn session_start(session: &Session) -> Self {
        ServerMessage::SessionStart {
            players: session
                .roster()
                .iter()
                .map(|p| PlayerInfo {
                    name: p.name().clone(),
                    seat_number: *p.seat(),
                })
                .collect(),
            config: *session.config(),
            current_player: session.current_player(),
        }
    }

    /// Builds the reset broadcast.
    pub fn session_reset(session: &Session) -> Self {
        ServerMessage::SessionReset {
            config: *session.config(),
            current_player: session.current_player(),
        }
    }

    /// Builds the error reply for a rejected request.
    pub fn error(err: &SessionError) -> Self {
        ServerMessage::Error {
            message: err.to_string(),
        }
    }
}

/// A message addressed to one connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outbound {
    /// Recipient.
    pub to: ConnectionId,
    /// Payload.
    pub message: ServerMessage,
}

impl Outbound {
    /// Addresses `message` to `to`.
    pub fn new(to: ConnectionId, message: ServerMessage) -> Self {
        Self { to, message }
    }

    /// Addresses a copy of `message` to each recipient, in order.
    pub fn broadcast(recipients: &[ConnectionId], message: &ServerMessage) -> Vec<Self> {
        recipients
            .iter()
            .map(|&to| Self::new(to, message.clone()))
            .collect()
    }
}
