use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{GameError, Result};

/// Dimensions of a rectangular board.
///
/// Invariant: both dimensions are at least 1.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct BoardSize {
    pub width: u8,
    pub height: u8,
}

impl BoardSize {
    /// The classic 8x8 board
    pub const CLASSIC: BoardSize = BoardSize {
        width: 8,
        height: 8,
    };

    /// Creates a board size, rejecting empty boards
    pub fn new(width: u8, height: u8) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(GameError::InvalidConfig(format!(
                "board must be at least 1x1, got {}x{}",
                width, height
            )));
        }
        Ok(Self { width, height })
    }

    /// Creates an NxN board size
    pub fn square(n: u8) -> Result<Self> {
        Self::new(n, n)
    }

    /// Number of squares on the board
    #[inline]
    pub const fn area(self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Returns true if the square lies on this board
    #[inline]
    pub const fn contains(self, sq: Square) -> bool {
        sq.col < self.width && sq.row < self.height
    }

    /// Returns the square at the given signed coordinates, or None when off the board
    #[inline]
    pub fn at(self, col: i32, row: i32) -> Option<Square> {
        if (0..self.width as i32).contains(&col) && (0..self.height as i32).contains(&row) {
            Some(Square::new(col as u8, row as u8))
        } else {
            None
        }
    }

    /// Like [`BoardSize::at`], but reports the out-of-range coordinates as an error
    pub fn checked(self, col: i32, row: i32) -> Result<Square> {
        self.at(col, row).ok_or(GameError::OutOfRangeSquare {
            col,
            row,
            width: self.width,
            height: self.height,
        })
    }

    /// Validates a square produced elsewhere against this board
    pub fn validate(self, sq: Square) -> Result<Square> {
        self.checked(sq.col as i32, sq.row as i32)
    }

    /// Row-major index of a square. The square must be on the board.
    #[inline]
    pub(crate) fn index(self, sq: Square) -> usize {
        sq.row as usize * self.width as usize + sq.col as usize
    }

    /// Iterator over every square, row by row
    pub fn squares(self) -> impl Iterator<Item = Square> {
        (0..self.height).flat_map(move |row| (0..self.width).map(move |col| Square::new(col, row)))
    }
}

impl Default for BoardSize {
    fn default() -> Self {
        Self::CLASSIC
    }
}

impl fmt::Display for BoardSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// A board square as (column, row).
///
/// A square carries no board size of its own; whether it is valid depends on
/// the [`BoardSize`] it is checked against.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Square {
    pub col: u8,
    pub row: u8,
}

impl Square {
    #[inline]
    pub const fn new(col: u8, row: u8) -> Self {
        Square { col, row }
    }

    /// Offset the square by (col_delta, row_delta), returning None if it leaves the board
    #[inline]
    pub fn offset(self, col_delta: i32, row_delta: i32, size: BoardSize) -> Option<Self> {
        size.at(self.col as i32 + col_delta, self.row as i32 + row_delta)
    }
}

impl fmt::Debug for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.col, self.row)
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.col, self.row)
    }
}

/// Parses "col,row" (whitespace around either number is ignored)
impl FromStr for Square {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self> {
        let (col, row) = s
            .split_once(',')
            .ok_or_else(|| GameError::InvalidSquare(s.to_string()))?;
        let col = col
            .trim()
            .parse::<u8>()
            .map_err(|_| GameError::InvalidSquare(s.to_string()))?;
        let row = row
            .trim()
            .parse::<u8>()
            .map_err(|_| GameError::InvalidSquare(s.to_string()))?;
        Ok(Square::new(col, row))
    }
}
