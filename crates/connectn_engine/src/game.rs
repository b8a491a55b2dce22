//! Rules driver shared by local and networked play.
//!
//! [`Game`] sequences one move: drop, capture (mode dependent), win
//! detection, draw detection, turn flip. The session layer wraps it with
//! roster and turn ownership; the local CLI drives it directly. Both paths
//! therefore reach identical states from identical column sequences.

use crate::action::{MoveError, MoveOutcome, MoveResult, Outcome};
use crate::board::Board;
use crate::capture;
use crate::invariants::{GameInvariants, InvariantSet};
use crate::rules::find_winner;
use crate::types::{ConfigError, GameConfig, Seat};
use tracing::{debug, info, instrument, warn};

/// One game of connect-N.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Game {
    config: GameConfig,
    pub(crate) board: Board,
    to_move: Seat,
    outcome: Option<Outcome>,
    pub(crate) history: Vec<usize>,
}

impl Game {
    /// Creates a new game with seat one to move.
    #[instrument]
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            board: Board::new(config.rows(), config.cols()),
            to_move: Seat::One,
            outcome: None,
            history: Vec::new(),
        })
    }

    /// Rebuilds a game by playing `columns` in order from a fresh board.
    #[instrument(skip(columns), fields(moves = columns.len()))]
    pub fn replay(config: GameConfig, columns: &[usize]) -> Result<Self, MoveError> {
        let mut game = Self::new(config)?;
        for &column in columns {
            game.play(column)?;
        }
        Ok(game)
    }

    /// Plays the seat to move into `column`.
    ///
    /// # Errors
    ///
    /// Fails with [`MoveError::GameOver`] once an outcome exists, or with the
    /// board error if the column is invalid or full. Nothing changes on error.
    #[instrument(skip(self), fields(seat = %self.to_move, mode = %self.config.game_mode()))]
    pub fn play(&mut self, column: usize) -> Result<MoveOutcome, MoveError> {
        if self.outcome.is_some() {
            warn!("Move attempted after game over");
            return Err(MoveError::GameOver);
        }

        let mover = self.to_move;
        let row = self.board.drop_piece(column, mover)?;
        self.history.push(column);

        let captured = capture::resolve(&mut self.board, self.config.game_mode(), mover)?;
        if !captured.is_empty() {
            info!(count = captured.len(), "Captured opponent cells");
        }

        let result = if let Some(line) = find_winner(&self.board, self.config.connect_n()) {
            info!(winner = %line.seat, "Game won");
            self.outcome = Some(Outcome::Winner(line.clone()));
            MoveResult::Won(line)
        } else if self.board.is_full() {
            info!("Game drawn");
            self.outcome = Some(Outcome::Draw);
            MoveResult::Draw
        } else {
            self.to_move = mover.opponent();
            MoveResult::Continue { next: self.to_move }
        };

        GameInvariants::check_all(self).map_err(|violations| {
            let description = violations
                .iter()
                .map(|v| v.description.as_str())
                .collect::<Vec<_>>()
                .join("; ");
            MoveError::InvariantViolation { description }
        })?;

        debug!(row, column, "Move applied");
        Ok(MoveOutcome {
            row,
            column,
            mover,
            captured,
            result,
        })
    }

    /// Clears the board and gives the move back to seat one.
    #[instrument(skip(self))]
    pub fn reset(&mut self) {
        self.board.clear();
        self.to_move = Seat::One;
        self.outcome = None;
        self.history.clear();
    }

    /// Returns the configuration.
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Returns the board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Returns the seat to move. After the game ends this is the last mover.
    pub fn to_move(&self) -> Seat {
        self.to_move
    }

    /// Returns the outcome once the game has ended.
    pub fn outcome(&self) -> Option<&Outcome> {
        self.outcome.as_ref()
    }

    /// Checks if the game has ended.
    pub fn is_over(&self) -> bool {
        self.outcome.is_some()
    }

    /// Columns played so far, in order.
    pub fn history(&self) -> &[usize] {
        &self.history
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Cell, Coord, GameMode};

    #[test]
    fn test_turns_alternate() {
        let mut game = Game::new(GameConfig::default()).unwrap();
        assert_eq!(game.to_move(), Seat::One);
        let outcome = game.play(3).unwrap();
        assert_eq!(outcome.mover, Seat::One);
        assert_eq!(outcome.result, MoveResult::Continue { next: Seat::Two });
        assert_eq!(game.to_move(), Seat::Two);
    }

    #[test]
    fn test_error_leaves_state_unchanged() {
        let config = GameConfig::new(3, 3, 3, GameMode::Classic).unwrap();
        let mut game = Game::replay(config, &[0, 0, 0]).unwrap();
        let before = game.clone();
        assert_eq!(game.play(0), Err(MoveError::ColumnFull { column: 0 }));
        assert_eq!(
            game.play(9),
            Err(MoveError::InvalidColumn { column: 9, cols: 3 })
        );
        assert_eq!(game, before);
    }

    #[test]
    fn test_no_moves_after_win() {
        let mut game = Game::replay(GameConfig::default(), &[0, 0, 1, 1, 2, 2, 3]).unwrap();
        assert!(game.is_over());
        assert_eq!(game.outcome().and_then(Outcome::winner), Some(Seat::One));
        assert_eq!(game.play(4), Err(MoveError::GameOver));
    }

    #[test]
    fn test_capture_runs_before_win_detection() {
        // The flipped cell completes seat one's bottom row.
        let config = GameConfig::new(3, 5, 4, GameMode::AdjacentCapture).unwrap();
        let mut game = Game::replay(config, &[0, 1, 0, 4, 1, 4, 2, 4, 3, 3]).unwrap();
        let outcome = game.play(2).unwrap();
        assert_eq!(outcome.row, 1);
        assert_eq!(outcome.captured, vec![Coord::new(2, 1)]);
        assert_eq!(game.board().get(2, 1), Ok(Cell::Occupied(Seat::One)));
        let line = outcome.winning_line().unwrap();
        assert_eq!(line.seat, Seat::One);
        assert_eq!(
            line.cells,
            vec![Coord::new(2, 0), Coord::new(2, 1), Coord::new(2, 2), Coord::new(2, 3)]
        );
    }

    #[test]
    fn test_reset() {
        let mut game = Game::replay(GameConfig::default(), &[0, 0, 1, 1, 2, 2, 3]).unwrap();
        game.reset();
        assert!(!game.is_over());
        assert_eq!(game.to_move(), Seat::One);
        assert_eq!(game.board().occupied_count(), 0);
        assert!(game.history().is_empty());
    }
}
