//! Draw detection for connect-N.

use super::win::find_winner;
use crate::board::Board;
use tracing::instrument;

/// Checks if the board is full with no winning line.
#[instrument(skip(board))]
pub fn is_draw(board: &Board, connect_n: usize) -> bool {
    board.is_full() && find_winner(board, connect_n).is_none()
}
