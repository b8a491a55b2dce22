//! Win detection for connect-N.
//!
//! The board is scanned in row-major order. From every owned cell the four
//! forward directions are walked in a fixed order, and the first window of
//! exactly `connect_n` same-owner cells is reported. A longer run contains
//! several such windows; only the first one in scan order is returned.

use crate::board::Board;
use crate::types::{Coord, Seat};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Forward scan directions: horizontal, vertical, down-right, down-left.
const DIRECTIONS: [(isize, isize); 4] = [(0, 1), (1, 0), (1, 1), (1, -1)];

/// A completed run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinningLine {
    /// Owner of the run.
    pub seat: Seat,
    /// The origin followed by the `connect_n - 1` forward cells.
    pub cells: Vec<Coord>,
}

/// Finds the first winning window in scan order.
#[instrument(skip(board), fields(rows = board.rows(), cols = board.cols()))]
pub fn find_winner(board: &Board, connect_n: usize) -> Option<WinningLine> {
    for origin in board.coords() {
        let Some(seat) = board.cell(origin).and_then(|c| c.owner()) else {
            continue;
        };

        for (dr, dc) in DIRECTIONS {
            let cells = walk(board, origin, seat, (dr, dc), connect_n);
            if cells.len() == connect_n {
                debug!(%seat, %origin, dr, dc, "Winning line found");
                return Some(WinningLine { seat, cells });
            }
        }
    }

    None
}

/// Collects up to `connect_n` consecutive cells owned by `seat`, starting at `origin`.
fn walk(
    board: &Board,
    origin: Coord,
    seat: Seat,
    (dr, dc): (isize, isize),
    connect_n: usize,
) -> Vec<Coord> {
    let mut cells = vec![origin];
    for i in 1..connect_n as isize {
        let next = origin
            .offset(dr, dc, i)
            .filter(|&at| board.cell(at).and_then(|c| c.owner()) == Some(seat));
        match next {
            Some(at) => cells.push(at),
            None => break,
        }
    }
    cells
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board_with(rows: usize, cols: usize, cells: &[(usize, usize, Seat)]) -> Board {
        let mut board = Board::new(rows, cols);
        for &(row, col, seat) in cells {
            board
                .set(Coord::new(row, col), crate::types::Cell::Occupied(seat))
                .unwrap();
        }
        board
    }

    #[test]
    fn test_no_winner_empty_board() {
        assert_eq!(find_winner(&Board::new(6, 7), 4), None);
    }

    #[test]
    fn test_horizontal() {
        let board = board_with(
            6,
            7,
            &[(5, 2, Seat::Two), (5, 3, Seat::Two), (5, 4, Seat::Two), (5, 5, Seat::Two)],
        );
        let line = find_winner(&board, 4).unwrap();
        assert_eq!(line.seat, Seat::Two);
        assert_eq!(
            line.cells,
            vec![Coord::new(5, 2), Coord::new(5, 3), Coord::new(5, 4), Coord::new(5, 5)]
        );
    }

    #[test]
    fn test_down_left_diagonal() {
        let board = board_with(
            6,
            7,
            &[(2, 4, Seat::One), (3, 3, Seat::One), (4, 2, Seat::One), (5, 1, Seat::One)],
        );
        let line = find_winner(&board, 4).unwrap();
        assert_eq!(
            line.cells,
            vec![Coord::new(2, 4), Coord::new(3, 3), Coord::new(4, 2), Coord::new(5, 1)]
        );
    }

    #[test]
    fn test_long_run_reports_first_window() {
        let board = board_with(
            1,
            6,
            &[
                (0, 0, Seat::One),
                (0, 1, Seat::One),
                (0, 2, Seat::One),
                (0, 3, Seat::One),
                (0, 4, Seat::One),
            ],
        );
        let line = find_winner(&board, 3).unwrap();
        assert_eq!(line.cells, vec![Coord::new(0, 0), Coord::new(0, 1), Coord::new(0, 2)]);
    }

    #[test]
    fn test_scan_order_prefers_upper_origin() {
        // Seat two has a vertical run starting higher than seat one's row.
        let board = board_with(
            4,
            4,
            &[
                (3, 0, Seat::One),
                (3, 1, Seat::One),
                (3, 2, Seat::One),
                (1, 3, Seat::Two),
                (2, 3, Seat::Two),
                (3, 3, Seat::Two),
            ],
        );
        let line = find_winner(&board, 3).unwrap();
        assert_eq!(line.seat, Seat::Two);
        assert_eq!(line.cells[0], Coord::new(1, 3));
    }

    #[test]
    fn test_broken_run_is_not_a_win() {
        let board = board_with(
            6,
            7,
            &[(5, 0, Seat::One), (5, 1, Seat::One), (5, 2, Seat::Two), (5, 3, Seat::One)],
        );
        assert_eq!(find_winner(&board, 4), None);
    }
}
