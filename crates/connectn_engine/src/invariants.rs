//! First-class invariants for connect-N.
//!
//! Invariants are logical properties that must hold after every move.
//! [`Game::play`](crate::Game::play) checks them as a postcondition, and
//! they are testable on their own.

use crate::game::Game;
use crate::types::Cell;

/// A logical property that must hold for a given state.
pub trait Invariant<S> {
    /// Checks if the invariant holds for the given state.
    fn holds(state: &S) -> bool;

    /// Human-readable description of the invariant.
    fn description() -> &'static str;
}

/// Violation of an invariant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub description: String,
}

impl InvariantViolation {
    /// Creates a new invariant violation.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
        }
    }
}

/// A set of invariants checked together.
pub trait InvariantSet<S> {
    /// Checks all invariants, collecting every violation.
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>>;
}

impl<S, I1, I2> InvariantSet<S> for (I1, I2)
where
    I1: Invariant<S>,
    I2: Invariant<S>,
{
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>> {
        let mut violations = Vec::new();

        if !I1::holds(state) {
            violations.push(InvariantViolation::new(I1::description()));
        }

        if !I2::holds(state) {
            violations.push(InvariantViolation::new(I2::description()));
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }
}

/// Invariant: no owned cell sits above an empty cell in its column.
///
/// Captures convert ownership without emptying cells, so this holds in
/// every mode.
pub struct PiecesRestOnSupport;

impl Invariant<Game> for PiecesRestOnSupport {
    fn holds(game: &Game) -> bool {
        let board = game.board();
        (0..board.cols()).all(|col| {
            let mut seen_piece = false;
            (0..board.rows()).all(|row| match board.get(row, col) {
                Ok(Cell::Empty) => !seen_piece,
                Ok(Cell::Occupied(_)) => {
                    seen_piece = true;
                    true
                }
                Err(_) => false,
            })
        })
    }

    fn description() -> &'static str {
        "Every piece rests on the floor or on another piece"
    }
}

/// Invariant: one owned cell per move played.
pub struct OccupancyMatchesHistory;

impl Invariant<Game> for OccupancyMatchesHistory {
    fn holds(game: &Game) -> bool {
        game.board().occupied_count() == game.history().len()
    }

    fn description() -> &'static str {
        "Owned cell count equals moves played"
    }
}

/// All connect-N game invariants.
pub type GameInvariants = (PiecesRestOnSupport, OccupancyMatchesHistory);
