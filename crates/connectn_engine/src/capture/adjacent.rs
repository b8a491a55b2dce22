//! Eight-neighbour surround capture.

use super::CaptureRule;
use crate::board::{Board, SURROUNDING};
use crate::types::{Cell, Coord, Seat};
use tracing::{instrument, trace};

/// Captures an opponent cell when all eight surrounding positions belong to
/// the mover. Positions off the board count as belonging to the mover, so
/// edge and corner cells need fewer pieces to enclose.
#[derive(Debug, Clone, Copy, Default)]
pub struct AdjacentCapture;

impl AdjacentCapture {
    fn is_enclosed(board: &Board, at: Coord, mover: Seat) -> bool {
        SURROUNDING.iter().all(|&(dr, dc)| {
            match at.offset(dr, dc, 1).and_then(|n| board.cell(n)) {
                None => true,
                Some(cell) => cell == Cell::Occupied(mover),
            }
        })
    }
}

impl CaptureRule for AdjacentCapture {
    #[instrument(skip(self, board))]
    fn captured(&self, board: &Board, mover: Seat) -> Vec<Coord> {
        let captured: Vec<Coord> = board
            .cells_of(mover.opponent())
            .into_iter()
            .filter(|&at| Self::is_enclosed(board, at, mover))
            .collect();
        trace!(count = captured.len(), "Surround scan complete");
        captured
    }
}
