//! Authoritative game sessions.
//!
//! A session owns one game, its two-seat roster and its lifecycle status.
//! Every request is validated here before the board is touched, and a
//! rejected request leaves the session exactly as it was.

use crate::code::SessionCode;
use crate::error::SessionError;
use connectn_engine::{Game, GameConfig, MoveOutcome, Seat};
use derive_getters::Getters;
use derive_more::Display;
use derive_new::new;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

/// Identity of a transport connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, Serialize, Deserialize)]
pub struct ConnectionId(u64);

impl ConnectionId {
    /// Wraps a raw connection number.
    pub const fn new(id: u64) -> Self {
        Self(id)
    }
}

/// Lifecycle of a session.
///
/// `AwaitingOpponent -> Active -> {Finished, Abandoned}`. A reset returns a
/// finished session to `Active`; nothing leaves `Abandoned`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
pub enum SessionStatus {
    /// Created, one seat filled.
    AwaitingOpponent,
    /// Both seats filled, moves accepted.
    Active,
    /// A move produced a winner or filled the board.
    Finished,
    /// A participant disconnected.
    Abandoned,
}

/// A seated player.
#[derive(Debug, Clone, PartialEq, Eq, Getters, new)]
pub struct Participant {
    /// Connection the player plays from.
    id: ConnectionId,
    /// Display name.
    name: String,
    /// Seat held for the session's lifetime.
    seat: Seat,
}

/// One game between two seats.
#[derive(Debug, Clone, Getters)]
pub struct Session {
    /// Session code.
    code: SessionCode,
    /// Authoritative game state.
    game: Game,
    /// Seated players, in seat order.
    roster: Vec<Participant>,
    /// Lifecycle status.
    status: SessionStatus,
}

impl Session {
    /// Creates a session with the creator in seat one.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::InvalidConfig`] if the configuration is rejected.
    #[instrument(skip(creator_name), fields(session_code = %code))]
    pub fn create(
        code: SessionCode,
        config: GameConfig,
        creator: ConnectionId,
        creator_name: String,
    ) -> Result<Self, SessionError> {
        let game = Game::new(config)?;
        info!(%creator, "Session created, awaiting opponent");
        Ok(Self {
            code,
            game,
            roster: vec![Participant::new(creator, creator_name, Seat::One)],
            status: SessionStatus::AwaitingOpponent,
        })
    }

    /// Seats a second player and starts the game.
    ///
    /// The board is zeroed and seat one moves first.
    #[instrument(skip(self, name), fields(session_code = %self.code))]
    pub fn join(&mut self, id: ConnectionId, name: String) -> Result<Seat, SessionError> {
        if self.roster.len() >= 2 {
            warn!(%id, "Join rejected, session full");
            return Err(SessionError::SessionFull);
        }
        if self.status != SessionStatus::AwaitingOpponent {
            warn!(%id, status = %self.status, "Join rejected, session not open");
            return Err(SessionError::SessionAlreadyActive);
        }
        if self.is_participant(id) {
            return Err(SessionError::AlreadySeated);
        }

        self.roster.push(Participant::new(id, name, Seat::Two));
        self.game.reset();
        self.status = SessionStatus::Active;
        info!(%id, "Opponent joined, session active");
        Ok(Seat::Two)
    }

    /// Applies a move for the participant on connection `id`.
    ///
    /// # Errors
    ///
    /// Checked in order: not a participant, game not started, game finished,
    /// out of turn, invalid column, full column.
    #[instrument(skip(self), fields(session_code = %self.code))]
    pub fn make_move(&mut self, id: ConnectionId, column: usize) -> Result<MoveOutcome, SessionError> {
        let seat = self.seat_of(id).ok_or_else(|| {
            warn!(%id, "Move from unknown connection");
            SessionError::NotAParticipant
        })?;

        match self.status {
            SessionStatus::Active => {}
            SessionStatus::AwaitingOpponent => return Err(SessionError::AwaitingOpponent),
            SessionStatus::Finished => return Err(SessionError::SessionFinished),
            SessionStatus::Abandoned => {
                return Err(SessionError::SessionNotFound {
                    code: self.code.clone(),
                });
            }
        }

        if seat != self.game.to_move() {
            warn!(%seat, expected = %self.game.to_move(), "Move out of turn");
            return Err(SessionError::OutOfTurn);
        }

        let outcome = self.game.play(column).map_err(|e| {
            warn!(%seat, column, error = %e, "Move rejected");
            SessionError::from(e)
        })?;

        if outcome.is_terminal() {
            self.status = SessionStatus::Finished;
            info!(result = ?outcome.result, "Session finished");
        } else {
            debug!(row = outcome.row, next = %self.game.to_move(), "Move applied");
        }

        Ok(outcome)
    }

    /// Starts a fresh game under the same code and roster.
    #[instrument(skip(self), fields(session_code = %self.code))]
    pub fn reset(&mut self, id: ConnectionId) -> Result<(), SessionError> {
        if self.seat_of(id).is_none() {
            return Err(SessionError::NotAParticipant);
        }
        match self.status {
            SessionStatus::Active | SessionStatus::Finished => {}
            SessionStatus::AwaitingOpponent => return Err(SessionError::AwaitingOpponent),
            SessionStatus::Abandoned => {
                return Err(SessionError::SessionNotFound {
                    code: self.code.clone(),
                });
            }
        }

        self.game.reset();
        self.status = SessionStatus::Active;
        info!(%id, "Session reset");
        Ok(())
    }

    /// Marks the session abandoned. Terminal.
    #[instrument(skip(self), fields(session_code = %self.code))]
    pub fn abandon(&mut self) {
        self.status = SessionStatus::Abandoned;
    }

    /// Returns the seat held by connection `id`.
    pub fn seat_of(&self, id: ConnectionId) -> Option<Seat> {
        self.participant(id).map(|p| p.seat)
    }

    /// Returns the participant on connection `id`.
    pub fn participant(&self, id: ConnectionId) -> Option<&Participant> {
        self.roster.iter().find(|p| p.id == id)
    }

    /// Checks if connection `id` holds a seat.
    pub fn is_participant(&self, id: ConnectionId) -> bool {
        self.participant(id).is_some()
    }

    /// Connections to broadcast to.
    pub fn participant_ids(&self) -> Vec<ConnectionId> {
        self.roster.iter().map(|p| p.id).collect()
    }

    /// Seat whose move is expected.
    pub fn current_player(&self) -> Seat {
        self.game.to_move()
    }

    /// Game configuration.
    pub fn config(&self) -> &GameConfig {
        self.game.config()
    }
}
