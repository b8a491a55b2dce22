//! Move outcomes and move errors.
//!
//! A move is a column choice by the seat to move. Everything that follows
//! from it (landing row, captures, terminal result) is decided by
//! [`Game::play`](crate::Game::play) and reported as a [`MoveOutcome`].

use crate::board::BoardError;
use crate::rules::WinningLine;
use crate::types::{ConfigError, Coord, Seat};
use derive_more::Display;

/// How the game stands after a move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveResult {
    /// Play continues with `next` to move.
    Continue {
        /// Seat to move next.
        next: Seat,
    },
    /// The move completed a run.
    Won(WinningLine),
    /// The move filled the board without a run.
    Draw,
}

/// Everything a single move decided.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveOutcome {
    /// Row the piece landed in.
    pub row: usize,
    /// Column the piece was dropped into.
    pub column: usize,
    /// Seat that moved.
    pub mover: Seat,
    /// Opponent cells converted to the mover, in row-major order.
    pub captured: Vec<Coord>,
    /// Resulting game standing.
    pub result: MoveResult,
}

impl MoveOutcome {
    /// Returns the winning line if this move won the game.
    pub fn winning_line(&self) -> Option<&WinningLine> {
        match &self.result {
            MoveResult::Won(line) => Some(line),
            _ => None,
        }
    }

    /// Checks if the move ended the game.
    pub fn is_terminal(&self) -> bool {
        !matches!(self.result, MoveResult::Continue { .. })
    }
}

/// Final result of a finished game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// A seat completed a run.
    Winner(WinningLine),
    /// Board filled without a run.
    Draw,
}

impl Outcome {
    /// Returns the winner if there is one.
    pub fn winner(&self) -> Option<Seat> {
        match self {
            Outcome::Winner(line) => Some(line.seat),
            Outcome::Draw => None,
        }
    }

    /// Returns true if the game was a draw.
    pub fn is_draw(&self) -> bool {
        matches!(self, Outcome::Draw)
    }
}

/// Error that can occur when applying a move.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum MoveError {
    /// The game already has an outcome.
    #[display("Game is over")]
    GameOver,

    /// Column index outside the board.
    #[display("Column {column} does not exist (board has {cols} columns)")]
    InvalidColumn {
        /// Requested column.
        column: usize,
        /// Number of columns.
        cols: usize,
    },

    /// No room left in the column.
    #[display("Column is full")]
    ColumnFull {
        /// Requested column.
        column: usize,
    },

    /// The game could not be created.
    #[display("{_0}")]
    Config(ConfigError),

    /// A postcondition failed after the move.
    #[display("Invariant violation: {description}")]
    InvariantViolation {
        /// Violated invariants.
        description: String,
    },
}

impl std::error::Error for MoveError {}

impl From<ConfigError> for MoveError {
    fn from(err: ConfigError) -> Self {
        MoveError::Config(err)
    }
}

impl From<BoardError> for MoveError {
    fn from(err: BoardError) -> Self {
        match err {
            BoardError::InvalidColumn { column, cols } => MoveError::InvalidColumn { column, cols },
            BoardError::ColumnFull { column } => MoveError::ColumnFull { column },
            other @ BoardError::OutOfBounds { .. } => MoveError::InvariantViolation {
                description: other.to_string(),
            },
        }
    }
}
