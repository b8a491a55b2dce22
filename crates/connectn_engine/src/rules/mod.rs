//! Game rules for connect-N.
//!
//! Pure functions over a board snapshot. Rules are separated from board
//! storage so the session layer and the local game share one evaluation.

pub mod draw;
pub mod win;

pub use draw::is_draw;
pub use win::{WinningLine, find_winner};
