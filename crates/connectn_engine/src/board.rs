//! Gravity board for connect-N.
//!
//! Pieces enter at the top of a column and fall to the lowest empty row.
//! Row 0 is the top of the board, so "lowest" means the largest row index.

use crate::types::{Cell, Coord, Seat};
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use tracing::{instrument, trace};

/// The four edge-sharing neighbour offsets.
pub(crate) const ORTHOGONAL: [(isize, isize); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

/// All eight surrounding offsets.
pub(crate) const SURROUNDING: [(isize, isize); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Errors raised by board primitives.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum BoardError {
    /// Coordinate outside the grid.
    #[display("Cell ({row}, {col}) is outside the board")]
    OutOfBounds {
        /// Requested row.
        row: usize,
        /// Requested column.
        col: usize,
    },
    /// Column index outside the grid.
    #[display("Column {column} does not exist (board has {cols} columns)")]
    InvalidColumn {
        /// Requested column.
        column: usize,
        /// Number of columns on the board.
        cols: usize,
    },
    /// No empty cell left in the column.
    #[display("Column {column} is full")]
    ColumnFull {
        /// Requested column.
        column: usize,
    },
}

/// Fixed-size grid of cells stored in row-major order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Board {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
}

impl Board {
    /// Creates an empty board.
    #[instrument]
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cells: vec![Cell::Empty; rows * cols],
        }
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Gets the cell at `(row, col)`.
    pub fn get(&self, row: usize, col: usize) -> Result<Cell, BoardError> {
        self.cell(Coord::new(row, col))
            .ok_or(BoardError::OutOfBounds { row, col })
    }

    /// Gets the cell at a coordinate, or `None` if it lies off the board.
    pub fn cell(&self, at: Coord) -> Option<Cell> {
        self.index(at).map(|i| self.cells[i])
    }

    /// Checks if a coordinate lies on the board.
    pub fn contains(&self, at: Coord) -> bool {
        at.row < self.rows && at.col < self.cols
    }

    fn index(&self, at: Coord) -> Option<usize> {
        self.contains(at).then(|| at.row * self.cols + at.col)
    }

    /// Overwrites a cell. Callers keep gravity intact.
    pub(crate) fn set(&mut self, at: Coord, cell: Cell) -> Result<(), BoardError> {
        let i = self.index(at).ok_or(BoardError::OutOfBounds {
            row: at.row,
            col: at.col,
        })?;
        self.cells[i] = cell;
        Ok(())
    }

    /// Drops a piece for `seat` into `column`.
    ///
    /// The lowest empty row is found and claimed in one step; the row index
    /// where the piece landed is returned. The board is untouched on error.
    #[instrument(skip(self), fields(rows = self.rows, cols = self.cols))]
    pub fn drop_piece(&mut self, column: usize, seat: Seat) -> Result<usize, BoardError> {
        if column >= self.cols {
            return Err(BoardError::InvalidColumn {
                column,
                cols: self.cols,
            });
        }

        let row = self
            .lowest_empty_row(column)
            .ok_or(BoardError::ColumnFull { column })?;
        self.cells[row * self.cols + column] = Cell::Occupied(seat);
        trace!(row, column, %seat, "Piece placed");
        Ok(row)
    }

    /// Lowest empty row in a column, scanning from the bottom up.
    pub fn lowest_empty_row(&self, column: usize) -> Option<usize> {
        if column >= self.cols {
            return None;
        }
        (0..self.rows)
            .rev()
            .find(|&row| self.cells[row * self.cols + column].is_empty())
    }

    /// Checks if a column has no room left. Nonexistent columns count as full.
    pub fn is_column_full(&self, column: usize) -> bool {
        self.lowest_empty_row(column).is_none()
    }

    /// Columns that still accept a piece.
    pub fn playable_columns(&self) -> Vec<usize> {
        (0..self.cols).filter(|&c| !self.is_column_full(c)).collect()
    }

    /// Checks if no empty cell remains.
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|c| !c.is_empty())
    }

    /// Number of owned cells.
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|c| !c.is_empty()).count()
    }

    /// Empties every cell.
    pub fn clear(&mut self) {
        self.cells.fill(Cell::Empty);
    }

    /// Iterates over every coordinate in row-major order.
    pub fn coords(&self) -> impl Iterator<Item = Coord> + '_ {
        (0..self.rows).flat_map(move |row| (0..self.cols).map(move |col| Coord::new(row, col)))
    }

    /// Coordinates owned by `seat`, in row-major order.
    pub fn cells_of(&self, seat: Seat) -> Vec<Coord> {
        self.coords()
            .filter(|&at| self.cell(at) == Some(Cell::Occupied(seat)))
            .collect()
    }

    /// On-board orthogonal neighbours of a cell.
    pub fn neighbors4(&self, at: Coord) -> impl Iterator<Item = Coord> + '_ {
        ORTHOGONAL
            .iter()
            .filter_map(move |&(dr, dc)| at.offset(dr, dc, 1))
            .filter(|&n| self.contains(n))
    }

    /// Formats the board as a human-readable grid with column labels.
    pub fn display(&self) -> String {
        let mut result = String::new();
        for row in 0..self.rows {
            for col in 0..self.cols {
                let symbol = match self.cells[row * self.cols + col] {
                    Cell::Empty => '.',
                    Cell::Occupied(Seat::One) => 'X',
                    Cell::Occupied(Seat::Two) => 'O',
                };
                result.push(symbol);
                if col + 1 < self.cols {
                    result.push(' ');
                }
            }
            result.push('\n');
        }
        let labels: Vec<String> = (0..self.cols).map(|c| (c % 10).to_string()).collect();
        result.push_str(&labels.join(" "));
        result
    }
}
