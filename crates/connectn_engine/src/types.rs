//! Core domain types for connect-N.

use derive_more::{Display, Error};
use schemars::{JsonSchema, Schema, SchemaGenerator};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use tracing::instrument;

/// Smallest run length a game may be configured with.
pub const MIN_CONNECT: usize = 3;

/// A seat at the table. Seat one always moves first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Seat {
    /// First seat (room creator).
    #[display("1")]
    One,
    /// Second seat (joiner).
    #[display("2")]
    Two,
}

impl Seat {
    /// Returns the other seat.
    pub fn opponent(self) -> Self {
        match self {
            Seat::One => Seat::Two,
            Seat::Two => Seat::One,
        }
    }

    /// Returns the seat number as sent over the wire (1 or 2).
    pub fn number(self) -> u8 {
        match self {
            Seat::One => 1,
            Seat::Two => 2,
        }
    }
}

/// A seat number outside `{1, 2}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
#[display("Seat must be 1 or 2, got {value}")]
pub struct InvalidSeat {
    /// The rejected number.
    pub value: u8,
}

impl TryFrom<u8> for Seat {
    type Error = InvalidSeat;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Seat::One),
            2 => Ok(Seat::Two),
            value => Err(InvalidSeat { value }),
        }
    }
}

impl From<Seat> for u8 {
    fn from(seat: Seat) -> Self {
        seat.number()
    }
}

impl JsonSchema for Seat {
    fn schema_name() -> Cow<'static, str> {
        "Seat".into()
    }

    fn json_schema(generator: &mut SchemaGenerator) -> Schema {
        u8::json_schema(generator)
    }
}

/// A cell on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Cell {
    /// Nobody has played here.
    #[default]
    Empty,
    /// Cell owned by a seat.
    Occupied(Seat),
}

impl Cell {
    /// Returns the owning seat, if any.
    pub fn owner(self) -> Option<Seat> {
        match self {
            Cell::Empty => None,
            Cell::Occupied(seat) => Some(seat),
        }
    }

    /// Checks if nobody owns the cell.
    pub fn is_empty(self) -> bool {
        matches!(self, Cell::Empty)
    }
}

/// A board coordinate. Row 0 is the top row.
///
/// Ordering is row-major, which is the order every scan in this crate uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, Serialize, Deserialize)]
#[serde(from = "[usize; 2]", into = "[usize; 2]")]
#[display("({row}, {col})")]
pub struct Coord {
    /// Row index, counted from the top.
    pub row: usize,
    /// Column index, counted from the left.
    pub col: usize,
}

impl Coord {
    /// Creates a new coordinate.
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Steps `n` times along `(dr, dc)`, returning `None` if the result would be negative.
    pub fn offset(self, dr: isize, dc: isize, n: isize) -> Option<Self> {
        let row = self.row.checked_add_signed(dr * n)?;
        let col = self.col.checked_add_signed(dc * n)?;
        Some(Self { row, col })
    }
}

impl From<[usize; 2]> for Coord {
    fn from([row, col]: [usize; 2]) -> Self {
        Self { row, col }
    }
}

impl From<Coord> for [usize; 2] {
    fn from(coord: Coord) -> Self {
        [coord.row, coord.col]
    }
}

impl JsonSchema for Coord {
    fn schema_name() -> Cow<'static, str> {
        "Coord".into()
    }

    fn json_schema(generator: &mut SchemaGenerator) -> Schema {
        <[usize; 2]>::json_schema(generator)
    }
}

/// Rule variant, fixed when a game is created.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    JsonSchema,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
pub enum GameMode {
    /// Plain connect-N, no captures.
    #[default]
    #[serde(rename = "classic")]
    #[strum(serialize = "classic")]
    Classic,
    /// Opponent cells surrounded on all eight sides flip to the mover.
    #[serde(rename = "capture")]
    #[strum(serialize = "capture")]
    AdjacentCapture,
    /// Opponent groups without liberties flip to the mover.
    #[serde(rename = "extreme-capture")]
    #[strum(serialize = "extreme-capture")]
    GroupCapture,
}

/// Invalid game configuration.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum ConfigError {
    /// A board dimension is zero.
    #[display("Board must have at least one row and one column (got {rows}x{cols})")]
    EmptyBoard {
        /// Requested rows.
        rows: usize,
        /// Requested columns.
        cols: usize,
    },
    /// Run length below [`MIN_CONNECT`].
    #[display("Connect value must be at least 3 (got {connect_n})")]
    ConnectTooShort {
        /// Requested run length.
        connect_n: usize,
    },
    /// Run length longer than the board allows.
    #[display(
        "Connect value ({connect_n}) cannot be greater than the largest board dimension ({max})"
    )]
    ConnectTooLong {
        /// Requested run length.
        connect_n: usize,
        /// Largest board dimension.
        max: usize,
    },
}

/// Board shape, run length and rule variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GameConfig {
    rows: usize,
    cols: usize,
    connect_n: usize,
    #[serde(default)]
    game_mode: GameMode,
}

impl GameConfig {
    /// Creates a validated configuration.
    #[instrument]
    pub fn new(
        rows: usize,
        cols: usize,
        connect_n: usize,
        game_mode: GameMode,
    ) -> Result<Self, ConfigError> {
        let config = Self {
            rows,
            cols,
            connect_n,
            game_mode,
        };
        config.validate()?;
        Ok(config)
    }

    /// Checks the run length against the board shape.
    ///
    /// Configurations arriving over the wire skip [`GameConfig::new`], so
    /// callers validate them here before creating a game.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rows == 0 || self.cols == 0 {
            return Err(ConfigError::EmptyBoard {
                rows: self.rows,
                cols: self.cols,
            });
        }
        if self.connect_n < MIN_CONNECT {
            return Err(ConfigError::ConnectTooShort {
                connect_n: self.connect_n,
            });
        }
        let max = self.rows.max(self.cols);
        if self.connect_n > max {
            return Err(ConfigError::ConnectTooLong {
                connect_n: self.connect_n,
                max,
            });
        }
        Ok(())
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Run length needed to win.
    pub fn connect_n(&self) -> usize {
        self.connect_n
    }

    /// Rule variant.
    pub fn game_mode(&self) -> GameMode {
        self.game_mode
    }

    /// Largest board dimension.
    pub fn max_dimension(&self) -> usize {
        self.rows.max(self.cols)
    }
}

impl Default for GameConfig {
    /// The classic 6x7 connect four.
    fn default() -> Self {
        Self {
            rows: 6,
            cols: 7,
            connect_n: 4,
            game_mode: GameMode::Classic,
        }
    }
}
