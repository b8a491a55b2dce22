//! Capture rules.
//!
//! After a placement commits, every opponent cell on the board is
//! re-evaluated against the active rule, not only cells near the new piece:
//! an enclosure can complete anywhere. Rules are pure functions of the board
//! snapshot and report the cells to flip; [`apply_captures`] then converts
//! their ownership to the mover. A capture never empties a cell, so gravity
//! is preserved.

mod adjacent;
mod group;

pub use adjacent::AdjacentCapture;
pub use group::{Group, GroupCapture, groups};

use crate::board::{Board, BoardError};
use crate::types::{Cell, Coord, GameMode, Seat};
use tracing::{debug, instrument};

/// A rule deciding which opponent cells the mover captures.
pub trait CaptureRule {
    /// Returns the cells captured by `mover`, sorted in row-major order.
    fn captured(&self, board: &Board, mover: Seat) -> Vec<Coord>;
}

impl GameMode {
    /// Returns the capture rule for this mode, or `None` for classic play.
    pub fn capture_rule(self) -> Option<&'static dyn CaptureRule> {
        match self {
            GameMode::Classic => None,
            GameMode::AdjacentCapture => Some(&AdjacentCapture),
            GameMode::GroupCapture => Some(&GroupCapture),
        }
    }
}

/// Flips the given cells to `mover`.
#[instrument(skip(board, cells), fields(count = cells.len()))]
pub fn apply_captures(board: &mut Board, mover: Seat, cells: &[Coord]) -> Result<(), BoardError> {
    for &at in cells {
        board.set(at, Cell::Occupied(mover))?;
    }
    if !cells.is_empty() {
        debug!(%mover, "Captured cells converted");
    }
    Ok(())
}

/// Runs the rule for `mode` against `board` and applies the result.
///
/// Returns the captured cells; classic mode never captures.
#[instrument(skip(board))]
pub fn resolve(board: &mut Board, mode: GameMode, mover: Seat) -> Result<Vec<Coord>, BoardError> {
    let Some(rule) = mode.capture_rule() else {
        return Ok(Vec::new());
    };
    let captured = rule.captured(board, mover);
    apply_captures(board, mover, &captured)?;
    Ok(captured)
}
