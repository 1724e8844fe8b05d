//! Dead-stone markings and the board/mask pair that scoring consumes.

use std::str::FromStr;

use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::board::Board;
use crate::error::{DimensionMismatchError, MalformedBoardError};
use crate::grid::Grid;
use crate::symmetry::Symmetry;
use crate::types::{Color, Stone};

/// Marker for a dead point in the dead-stone text encoding.
pub const DEAD_MARKER: char = 'y';

/// Per-point "scored as captured" flags.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeadMask {
    grid: Grid<bool>,
}

impl DeadMask {
    /// Parses the dead-stone text encoding: `y` is dead, anything else is not.
    ///
    /// # Errors
    ///
    /// Returns [`MalformedBoardError`] for empty input or ragged rows.
    #[instrument(skip(text), fields(len = text.len()))]
    pub fn parse(text: &str) -> Result<Self, MalformedBoardError> {
        let grid = Grid::parse_text(text, |_, _, marker| Ok(marker == DEAD_MARKER))?;
        Ok(Self { grid })
    }

    /// A mask with no dead points.
    pub fn all_alive(width: usize, height: usize) -> Self {
        Self {
            grid: Grid::from_fn(width, height, |_, _| false),
        }
    }

    /// Builds a mask from flags laid out by `(x, y)`.
    pub fn from_fn<F>(width: usize, height: usize, dead: F) -> Self
    where
        F: FnMut(usize, usize) -> bool,
    {
        Self {
            grid: Grid::from_fn(width, height, dead),
        }
    }

    /// Returns the re-oriented mask. The color swap flag has no meaning for
    /// a mask and is ignored.
    #[instrument(skip(self))]
    pub fn transform(&self, symmetry: &Symmetry) -> Self {
        Self {
            grid: self.grid.transformed(&symmetry.geometric(), |dead| dead),
        }
    }

    /// Whether `(x, y)` is marked dead. Out of bounds reads as alive.
    pub fn is_dead(&self, x: usize, y: usize) -> bool {
        self.grid.get(x, y).unwrap_or(false)
    }

    /// Returns `(width, height)`.
    pub fn size(&self) -> (usize, usize) {
        self.grid.size()
    }

    /// Number of points marked dead.
    pub fn dead_count(&self) -> usize {
        self.grid.iter().filter(|(_, _, dead)| **dead).count()
    }
}

impl FromStr for DeadMask {
    type Err = MalformedBoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl std::fmt::Display for DeadMask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (y, row) in self.grid.rows().enumerate() {
            if y > 0 {
                writeln!(f)?;
            }
            for dead in row {
                write!(f, "{}", if *dead { DEAD_MARKER } else { '.' })?;
            }
        }
        Ok(())
    }
}

/// A board together with a dead-stone mask of the same size.
///
/// The size check happens once, here; every consumer of a `MarkedBoard`
/// can index the two halves with the same `(x, y)`.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize)]
pub struct MarkedBoard {
    /// Stones on the board.
    board: Board,
    /// Dead-stone marks aligned with `board`.
    dead: DeadMask,
}

impl MarkedBoard {
    /// Pairs a board with its dead-stone mask.
    ///
    /// # Errors
    ///
    /// Returns [`DimensionMismatchError`] when the sizes differ.
    #[instrument(skip(board, dead), fields(board_size = ?board.size(), mask_size = ?dead.size()))]
    pub fn new(board: Board, dead: DeadMask) -> Result<Self, DimensionMismatchError> {
        let (board_width, board_height) = board.size();
        let (mask_width, mask_height) = dead.size();
        if (board_width, board_height) != (mask_width, mask_height) {
            warn!("Board and dead-stone mask sizes differ");
            return Err(DimensionMismatchError {
                board_width,
                board_height,
                mask_width,
                mask_height,
            });
        }
        Ok(Self { board, dead })
    }

    /// A board with nothing marked dead.
    pub fn without_dead(board: Board) -> Self {
        let (width, height) = board.size();
        Self {
            dead: DeadMask::all_alive(width, height),
            board,
        }
    }

    /// Applies one symmetry to both the board and the mask.
    #[instrument(skip(self))]
    pub fn transform(&self, symmetry: &Symmetry) -> Self {
        debug!(%symmetry, "Transforming marked board");
        Self {
            board: self.board.transform(symmetry),
            dead: self.dead.transform(symmetry),
        }
    }

    /// Whether the point holds a stone of `color` that is not marked dead.
    pub fn is_alive(&self, x: usize, y: usize, color: Color) -> bool {
        self.board.get(x, y) == Some(Stone::from(color)) && !self.dead.is_dead(x, y)
    }

    /// Number of living stones of `color`.
    #[instrument(skip(self))]
    pub fn alive_count(&self, color: Color) -> usize {
        let stone = Stone::from(color);
        self.board
            .grid()
            .iter()
            .filter(|(x, y, s)| **s == stone && !self.dead.is_dead(*x, *y))
            .count()
    }
}
