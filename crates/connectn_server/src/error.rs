//! Session error taxonomy.
//!
//! Every variant is reported to the single requester as an `error` message
//! and leaves shared state untouched. Nothing here is retried by the server.

use crate::code::SessionCode;
use connectn_engine::{ConfigError, MoveError};
use derive_more::{Display, Error};

/// A rejected session request.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum SessionError {
    /// No live session has this code.
    #[display("Session not found")]
    SessionNotFound {
        /// Requested code.
        code: SessionCode,
    },

    /// Both seats are taken.
    #[display("Session is full")]
    SessionFull,

    /// The game has already started.
    #[display("Game already in progress")]
    SessionAlreadyActive,

    /// Join from a connection already seated in the session.
    #[display("You are already in this game")]
    AlreadySeated,

    /// Request from a connection that is not on the roster.
    #[display("You are not in this game")]
    NotAParticipant,

    /// Move or reset before the second player joined.
    #[display("Waiting for an opponent to join")]
    AwaitingOpponent,

    /// Move from the seat that is not to move.
    #[display("Not your turn")]
    OutOfTurn,

    /// Move after the game ended.
    #[display("Game is over")]
    SessionFinished,

    /// Column index outside the board.
    #[display("Column {column} does not exist")]
    InvalidColumn {
        /// Requested column.
        column: usize,
    },

    /// Column has no empty cell.
    #[display("Column is full")]
    ColumnFull,

    /// Board shape or run length rejected at creation.
    #[display("{reason}")]
    InvalidConfig {
        /// Why the configuration was rejected.
        reason: InvalidConfigReason,
    },

    /// No unused session code could be generated.
    #[display("Could not allocate a session code, try again")]
    CodeSpaceExhausted,

    /// A rules postcondition failed; indicates a server bug.
    #[display("Internal error: {description}")]
    Internal {
        /// What went wrong.
        description: String,
    },
}

/// Why a configuration was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum InvalidConfigReason {
    /// Engine-level validation failure.
    #[display("{_0}")]
    Rules(ConfigError),
    /// Board larger than this server accepts.
    #[display("Board dimensions cannot exceed {max} (got {rows}x{cols})")]
    TooLarge {
        /// Requested rows.
        rows: usize,
        /// Requested columns.
        cols: usize,
        /// Server limit.
        max: usize,
    },
}

impl From<ConfigError> for SessionError {
    fn from(err: ConfigError) -> Self {
        SessionError::InvalidConfig {
            reason: InvalidConfigReason::Rules(err),
        }
    }
}

impl From<MoveError> for SessionError {
    fn from(err: MoveError) -> Self {
        match err {
            MoveError::GameOver => SessionError::SessionFinished,
            MoveError::InvalidColumn { column, .. } => SessionError::InvalidColumn { column },
            MoveError::ColumnFull { .. } => SessionError::ColumnFull,
            MoveError::Config(e) => e.into(),
            MoveError::InvariantViolation { description } => SessionError::Internal { description },
        }
    }
}
