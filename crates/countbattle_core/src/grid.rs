//! Rectangular cell storage shared by boards and dead-stone masks.
//!
//! # Coordinate convention
//!
//! Every grid in this crate addresses a cell as `(x, y)`:
//!
//! - `x` is the column, `0..width`, left to right;
//! - `y` is the row, `0..height`, top to bottom.
//!
//! Storage is row-major: cell `(x, y)` lives at index `y * width + x`.
//! Character `x` of text row `y` is cell `(x, y)`. No public accessor takes
//! its arguments in any other order, so a board and a mask built from text
//! rows of the same shape are always in registration.

use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::MalformedBoardError;
use crate::symmetry::Symmetry;

/// Row-major rectangular grid, at least 1x1.
///
/// Deserialization checks the same shape rules as [`Grid::parse_text`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawGrid<T>")]
pub struct Grid<T> {
    width: usize,
    height: usize,
    cells: Vec<T>,
}

/// Unchecked wire form of a [`Grid`].
#[derive(Deserialize)]
struct RawGrid<T> {
    width: usize,
    height: usize,
    cells: Vec<T>,
}

impl<T> TryFrom<RawGrid<T>> for Grid<T> {
    type Error = MalformedBoardError;

    fn try_from(raw: RawGrid<T>) -> Result<Self, Self::Error> {
        if raw.width == 0 || raw.height == 0 {
            return Err(MalformedBoardError::Empty);
        }
        if raw.width.checked_mul(raw.height) != Some(raw.cells.len()) {
            return Err(MalformedBoardError::CellCount {
                width: raw.width,
                height: raw.height,
                found: raw.cells.len(),
            });
        }
        Ok(Self {
            width: raw.width,
            height: raw.height,
            cells: raw.cells,
        })
    }
}

impl<T: Copy> Grid<T> {
    /// Builds a grid from text, one cell per character.
    ///
    /// Each line is trimmed and blank lines are skipped. `parse_cell`
    /// receives `(x, y, char)` and may reject the character.
    #[instrument(skip(text, parse_cell))]
    pub fn parse_text<F>(text: &str, mut parse_cell: F) -> Result<Self, MalformedBoardError>
    where
        F: FnMut(usize, usize, char) -> Result<T, MalformedBoardError>,
    {
        let rows: Vec<&str> = text
            .lines()
            .map(str::trim)
            .filter(|row| !row.is_empty())
            .collect();

        let width = match rows.first() {
            Some(first) => first.chars().count(),
            None => return Err(MalformedBoardError::Empty),
        };

        let mut cells = Vec::with_capacity(width * rows.len());
        for (y, row) in rows.iter().enumerate() {
            let found = row.chars().count();
            if found != width {
                return Err(MalformedBoardError::RaggedRow {
                    row: y,
                    expected: width,
                    found,
                });
            }
            for (x, marker) in row.chars().enumerate() {
                cells.push(parse_cell(x, y, marker)?);
            }
        }

        Ok(Self {
            width,
            height: rows.len(),
            cells,
        })
    }

    /// Builds a grid by evaluating `cell` at every `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if either dimension is zero.
    pub fn from_fn<F>(width: usize, height: usize, mut cell: F) -> Self
    where
        F: FnMut(usize, usize) -> T,
    {
        assert!(width > 0 && height > 0, "grid must be at least 1x1");
        let mut cells = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                cells.push(cell(x, y));
            }
        }
        Self {
            width,
            height,
            cells,
        }
    }

    /// Returns the cell at `(x, y)`, or `None` when out of bounds.
    pub fn get(&self, x: usize, y: usize) -> Option<T> {
        if x < self.width && y < self.height {
            self.cells.get(y * self.width + x).copied()
        } else {
            None
        }
    }

    /// Returns a new grid re-oriented by `symmetry`, mapping each moved
    /// value through `map`.
    ///
    /// The destination cell `(x, y)` takes the source cell named by
    /// [`Symmetry::source_of`].
    #[instrument(skip(self, map), fields(width = self.width, height = self.height))]
    pub fn transformed<F>(&self, symmetry: &Symmetry, mut map: F) -> Self
    where
        F: FnMut(T) -> T,
    {
        let (width, height) = symmetry.destination_size(self.width, self.height);
        Self::from_fn(width, height, |x, y| {
            let (sx, sy) = symmetry.source_of(x, y, width, height);
            map(self.cells[sy * self.width + sx])
        })
    }
}

impl<T> Grid<T> {
    /// Number of columns.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns `(width, height)`.
    pub fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Iterates over rows, top to bottom.
    pub fn rows(&self) -> std::slice::Chunks<'_, T> {
        self.cells.chunks(self.width)
    }

    /// Iterates over `(x, y, &cell)` in storage order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &T)> + '_ {
        let width = self.width;
        self.cells
            .iter()
            .enumerate()
            .map(move |(index, cell)| (index % width, index / width, cell))
    }

    /// In-bounds orthogonal neighbours of `(x, y)`.
    pub fn neighbors(&self, x: usize, y: usize) -> impl Iterator<Item = (usize, usize)> {
        let (width, height) = (self.width, self.height);
        [(-1i64, 0i64), (1, 0), (0, -1), (0, 1)]
            .into_iter()
            .filter_map(move |(dx, dy)| {
                let nx = x as i64 + dx;
                let ny = y as i64 + dy;
                let inside = (0..width as i64).contains(&nx) && (0..height as i64).contains(&ny);
                inside.then_some((nx as usize, ny as usize))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn digits(text: &str) -> Result<Grid<u32>, MalformedBoardError> {
        Grid::parse_text(text, |x, y, c| {
            c.to_digit(10).ok_or(MalformedBoardError::InvalidMarker {
                column: x,
                row: y,
                marker: c,
            })
        })
    }

    #[test]
    fn text_rows_map_to_x_then_y() {
        let grid = digits("012\n345").unwrap();
        assert_eq!(grid.size(), (3, 2));
        assert_eq!(grid.get(2, 0), Some(2));
        assert_eq!(grid.get(0, 1), Some(3));
        assert_eq!(grid.get(3, 0), None);
    }

    #[test]
    fn blank_lines_and_padding_are_ignored() {
        let grid = digits("\n  01 \n\n 23\n\n").unwrap();
        assert_eq!(grid.size(), (2, 2));
        assert_eq!(grid.get(1, 1), Some(3));
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let err = digits("012\n34").unwrap_err();
        assert_eq!(
            err,
            MalformedBoardError::RaggedRow {
                row: 1,
                expected: 3,
                found: 2
            }
        );
    }

    #[test]
    fn deserialize_checks_cell_count() {
        let err = serde_json::from_str::<Grid<u32>>(r#"{"width":3,"height":3,"cells":[1]}"#)
            .unwrap_err();
        assert!(err.to_string().contains("3x3 holds 1 cells"));

        let empty = serde_json::from_str::<Grid<u32>>(r#"{"width":0,"height":2,"cells":[]}"#);
        assert!(empty.is_err());

        let grid: Grid<u32> =
            serde_json::from_str(r#"{"width":2,"height":1,"cells":[4,5]}"#).unwrap();
        assert_eq!(grid.get(1, 0), Some(5));
    }

    #[test]
    fn corner_has_two_neighbors() {
        let grid = digits("00\n00").unwrap();
        let mut around: Vec<_> = grid.neighbors(0, 0).collect();
        around.sort();
        assert_eq!(around, vec![(0, 1), (1, 0)]);
    }
}
