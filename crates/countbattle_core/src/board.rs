//! Go board parsing, rendering and re-orientation.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::error::MalformedBoardError;
use crate::grid::Grid;
use crate::symmetry::Symmetry;
use crate::types::{Color, Stone};

/// A finished Go position.
///
/// Boards are never mutated; [`Board::transform`] returns a new board.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Board {
    grid: Grid<Stone>,
}

impl Board {
    /// Parses the board text encoding.
    ///
    /// Rows are newline separated and trimmed; blank lines are skipped.
    /// `.` is empty, `x`/`X` black and `o`/`O` white.
    ///
    /// # Errors
    ///
    /// Returns [`MalformedBoardError`] for empty input, rows of unequal
    /// length, or any other character.
    #[instrument(skip(text), fields(len = text.len()))]
    pub fn parse(text: &str) -> Result<Self, MalformedBoardError> {
        let grid = Grid::parse_text(text, |column, row, marker| {
            Stone::from_marker(marker).ok_or(MalformedBoardError::InvalidMarker {
                column,
                row,
                marker,
            })
        })?;
        debug!(width = grid.width(), height = grid.height(), "Parsed board");
        Ok(Self { grid })
    }

    /// Builds a board from stones laid out by `(x, y)`.
    pub fn from_fn<F>(width: usize, height: usize, stone: F) -> Self
    where
        F: FnMut(usize, usize) -> Stone,
    {
        Self {
            grid: Grid::from_fn(width, height, stone),
        }
    }

    /// Returns the re-oriented board.
    ///
    /// Stone colors are swapped when `symmetry.invert` is set.
    #[instrument(skip(self))]
    pub fn transform(&self, symmetry: &Symmetry) -> Self {
        let invert = symmetry.invert;
        Self {
            grid: self.grid.transformed(symmetry, |stone| {
                if invert { stone.inverted() } else { stone }
            }),
        }
    }

    /// Returns the stone at `(x, y)`, or `None` when out of bounds.
    pub fn get(&self, x: usize, y: usize) -> Option<Stone> {
        self.grid.get(x, y)
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.grid.width()
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.grid.height()
    }

    /// Returns `(width, height)`.
    pub fn size(&self) -> (usize, usize) {
        self.grid.size()
    }

    /// Underlying cell grid.
    pub fn grid(&self) -> &Grid<Stone> {
        &self.grid
    }

    /// Number of stones of `color` on the board.
    #[instrument(skip(self))]
    pub fn count(&self, color: Color) -> usize {
        let stone = Stone::from(color);
        self.grid.iter().filter(|(_, _, s)| **s == stone).count()
    }
}

impl FromStr for Board {
    type Err = MalformedBoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (y, row) in self.grid.rows().enumerate() {
            if y > 0 {
                writeln!(f)?;
            }
            for stone in row {
                write!(f, "{}", stone.marker())?;
            }
        }
        Ok(())
    }
}
