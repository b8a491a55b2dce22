//! Client-side board replica.
//!
//! A replica never decides anything. It replays `session-start`,
//! `move-applied` and `session-reset` as the server reported them, so two
//! participants holding replicas always see the authoritative board.

use crate::protocol::ServerMessage;
use connectn_engine::{Board, BoardError, GameConfig, Seat, capture};
use derive_more::{Display, Error, From};
use tracing::{instrument, warn};

/// A replica that could not follow the server.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error, From)]
pub enum ReplicaError {
    /// A move arrived before `session-start`.
    #[display("No game in progress")]
    NotStarted,
    /// The server placed a piece somewhere the replica disagrees with.
    #[display("Piece landed in row {actual}, replica expected row {expected}")]
    Desync {
        /// Row the replica computed.
        expected: usize,
        /// Row the server reported.
        actual: usize,
    },
    /// The reported move does not fit the replica's board.
    #[display("{source}")]
    #[from]
    Board {
        /// Underlying board error.
        source: BoardError,
    },
}

/// Board state rebuilt from server broadcasts.
#[derive(Debug, Clone, Default)]
pub struct BoardReplica {
    config: Option<GameConfig>,
    board: Option<Board>,
    current_player: Option<Seat>,
    winner: Option<Seat>,
    draw: bool,
}

impl BoardReplica {
    /// Creates a replica with no game.
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies one server message. Messages that do not affect the board
    /// are ignored.
    #[instrument(skip(self, message))]
    pub fn apply(&mut self, message: &ServerMessage) -> Result<(), ReplicaError> {
        match message {
            ServerMessage::SessionStart {
                config,
                current_player,
                ..
            }
            | ServerMessage::SessionReset {
                config,
                current_player,
            } => {
                self.config = Some(*config);
                self.board = Some(Board::new(config.rows(), config.cols()));
                self.current_player = Some(*current_player);
                self.winner = None;
                self.draw = false;
            }
            ServerMessage::MoveApplied {
                row,
                column,
                mover_seat,
                next_player,
                winner_seat,
                captured_cells,
                draw,
                ..
            } => {
                let board = self.board.as_mut().ok_or(ReplicaError::NotStarted)?;
                let landed = board.drop_piece(*column, *mover_seat)?;
                if landed != *row {
                    warn!(expected = landed, actual = *row, "Replica out of sync");
                    return Err(ReplicaError::Desync {
                        expected: landed,
                        actual: *row,
                    });
                }
                capture::apply_captures(board, *mover_seat, captured_cells)?;
                self.current_player = *next_player;
                self.winner = *winner_seat;
                self.draw = *draw;
            }
            ServerMessage::ParticipantDisconnected { .. } => {
                self.current_player = None;
            }
            ServerMessage::SessionCreated { .. }
            | ServerMessage::SessionJoined { .. }
            | ServerMessage::Error { .. } => {}
        }
        Ok(())
    }

    /// Current board, once a game started.
    pub fn board(&self) -> Option<&Board> {
        self.board.as_ref()
    }

    /// Configuration of the current game.
    pub fn config(&self) -> Option<&GameConfig> {
        self.config.as_ref()
    }

    /// Seat to move, `None` once the game ended.
    pub fn current_player(&self) -> Option<Seat> {
        self.current_player
    }

    /// Winner, once reported.
    pub fn winner(&self) -> Option<Seat> {
        self.winner
    }

    /// Checks if the game ended in a draw.
    pub fn is_draw(&self) -> bool {
        self.draw
    }
}
