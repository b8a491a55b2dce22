//! Connected-group liberty capture.
//!
//! Groups are maximal sets of same-owner cells joined through shared edges.
//! A group's liberties are the distinct empty cells touching any member.
//! Opponent groups left with no liberty after a move are captured whole.

use super::CaptureRule;
use crate::board::Board;
use crate::types::{Cell, Coord, Seat};
use derive_getters::Getters;
use std::collections::{BTreeSet, HashSet};
use tracing::{debug, instrument};

/// A maximal edge-connected group of one seat's cells.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct Group {
    /// Owner of every member.
    seat: Seat,
    /// Member cells in row-major order.
    members: Vec<Coord>,
    /// Empty cells adjacent to the group, in row-major order.
    liberties: BTreeSet<Coord>,
}

impl Group {
    /// Checks if the group has run out of liberties.
    pub fn is_dead(&self) -> bool {
        self.liberties.is_empty()
    }
}

/// Builds every group owned by `seat`, ordered by their first member.
#[instrument(skip(board))]
pub fn groups(board: &Board, seat: Seat) -> Vec<Group> {
    let owned = Cell::Occupied(seat);
    let mut visited = HashSet::new();
    let mut found = Vec::new();

    for start in board.cells_of(seat) {
        if !visited.insert(start) {
            continue;
        }

        let mut members = Vec::new();
        let mut liberties = BTreeSet::new();
        let mut stack = vec![start];

        while let Some(at) = stack.pop() {
            members.push(at);
            for n in board.neighbors4(at) {
                match board.cell(n) {
                    Some(Cell::Empty) => {
                        liberties.insert(n);
                    }
                    Some(cell) if cell == owned && visited.insert(n) => stack.push(n),
                    _ => {}
                }
            }
        }

        members.sort();
        found.push(Group {
            seat,
            members,
            liberties,
        });
    }

    found
}

/// Captures opponent groups with zero liberties.
#[derive(Debug, Clone, Copy, Default)]
pub struct GroupCapture;

impl CaptureRule for GroupCapture {
    #[instrument(skip(self, board))]
    fn captured(&self, board: &Board, mover: Seat) -> Vec<Coord> {
        let mut captured: Vec<Coord> = groups(board, mover.opponent())
            .into_iter()
            .filter(Group::is_dead)
            .inspect(|g| debug!(size = g.members.len(), "Group without liberties"))
            .flat_map(|g| g.members)
            .collect();
        captured.sort();
        captured
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn place(board: &mut Board, cells: &[(usize, usize)], seat: Seat) {
        for &(row, col) in cells {
            board.set(Coord::new(row, col), Cell::Occupied(seat)).unwrap();
        }
    }

    #[test]
    fn test_groups_and_liberties() {
        let mut board = Board::new(4, 4);
        place(&mut board, &[(3, 0), (3, 1), (2, 1)], Seat::Two);
        place(&mut board, &[(3, 3)], Seat::Two);
        let found = groups(&board, Seat::Two);
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].members, vec![Coord::new(2, 1), Coord::new(3, 0), Coord::new(3, 1)]);
        assert_eq!(
            found[0].liberties.iter().copied().collect::<Vec<_>>(),
            vec![Coord::new(1, 1), Coord::new(2, 0), Coord::new(2, 2), Coord::new(3, 2)]
        );
        assert_eq!(found[1].members, vec![Coord::new(3, 3)]);
    }

    #[test]
    fn test_diagonal_cells_are_separate_groups() {
        let mut board = Board::new(3, 3);
        place(&mut board, &[(2, 0), (1, 1)], Seat::One);
        assert_eq!(groups(&board, Seat::One).len(), 2);
    }

    #[test]
    fn test_two_cell_group_without_liberty_captured() {
        let mut board = Board::new(3, 4);
        place(&mut board, &[(2, 1), (2, 2)], Seat::Two);
        place(&mut board, &[(2, 0), (2, 3), (1, 1), (1, 2)], Seat::One);
        assert_eq!(
            GroupCapture.captured(&board, Seat::One),
            vec![Coord::new(2, 1), Coord::new(2, 2)]
        );
    }

    #[test]
    fn test_group_with_liberty_untouched() {
        let mut board = Board::new(3, 4);
        place(&mut board, &[(2, 1), (2, 2)], Seat::Two);
        place(&mut board, &[(2, 0), (2, 3), (1, 1)], Seat::One);
        assert!(GroupCapture.captured(&board, Seat::One).is_empty());
    }

    #[test]
    fn test_mover_groups_never_captured() {
        let mut board = Board::new(2, 2);
        place(&mut board, &[(1, 0), (1, 1), (0, 1)], Seat::One);
        place(&mut board, &[(0, 0)], Seat::Two);
        // Seat one has no liberty either, but only opponent groups are checked.
        assert_eq!(GroupCapture.captured(&board, Seat::One), vec![Coord::new(0, 0)]);
    }
}
