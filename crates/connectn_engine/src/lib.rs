//! Connect-N engine - pure game logic
//!
//! Gravity-drop connection game on a configurable rectangular board, with
//! optional capture variants. No I/O: everything here is a deterministic
//! function of the board and the column played.
//!
//! # Architecture
//!
//! - **Board**: fixed grid with drop/query/full-check primitives
//! - **Rules**: first-window win detection and draw detection
//! - **Capture**: surround and liberty rules applied after each placement
//! - **Game**: sequences one move through the above
//! - **Invariants**: postconditions checked after every move
//!
//! # Example
//!
//! ```
//! use connectn_engine::{Game, GameConfig, MoveResult, Seat};
//!
//! let mut game = Game::new(GameConfig::default()).unwrap();
//! let outcome = game.play(3).unwrap();
//! assert_eq!(outcome.row, 5);
//! assert_eq!(outcome.result, MoveResult::Continue { next: Seat::Two });
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod action;
mod board;
pub mod capture;
mod game;
pub mod invariants;
pub mod rules;
mod types;

pub use action::{MoveError, MoveOutcome, MoveResult, Outcome};
pub use board::{Board, BoardError};
pub use capture::{AdjacentCapture, CaptureRule, Group, GroupCapture};
pub use game::Game;
pub use rules::{WinningLine, find_winner, is_draw};
pub use types::{Cell, ConfigError, Coord, GameConfig, GameMode, InvalidSeat, MIN_CONNECT, Seat};
