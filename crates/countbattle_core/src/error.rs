//! Error types for board parsing, asset pairing and answers.

use derive_more::{Display, Error};

/// Board or dead-stone text that cannot be turned into a grid.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum MalformedBoardError {
    /// No non-blank rows.
    #[display("Board text contains no rows")]
    Empty,

    /// A row whose length differs from the first row.
    #[display("Row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        /// Zero-based row index (blank lines not counted).
        row: usize,
        /// Length of the first row.
        expected: usize,
        /// Length of this row.
        found: usize,
    },

    /// A character outside the board alphabet.
    #[display("Unexpected marker {marker:?} at column {column}, row {row}")]
    InvalidMarker {
        /// Zero-based column.
        column: usize,
        /// Zero-based row.
        row: usize,
        /// The offending character.
        marker: char,
    },

    /// Stored cells that do not fill the stated dimensions.
    #[display("Grid of {width}x{height} holds {found} cells")]
    CellCount {
        /// Stated columns.
        width: usize,
        /// Stated rows.
        height: usize,
        /// Cells present.
        found: usize,
    },
}

impl std::error::Error for MalformedBoardError {}

/// A board and a dead-stone mask that do not cover the same points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
#[display(
    "Board is {board_width}x{board_height} but dead-stone mask is {mask_width}x{mask_height}"
)]
pub struct DimensionMismatchError {
    /// Board width.
    pub board_width: usize,
    /// Board height.
    pub board_height: usize,
    /// Mask width.
    pub mask_width: usize,
    /// Mask height.
    pub mask_height: usize,
}

/// Failure loading a multi-board catalog.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum CatalogError {
    /// The board file and the dead-stone file hold different record counts.
    #[display("Catalog has {boards} boards but {masks} dead-stone records")]
    CountMismatch {
        /// Number of board records.
        boards: usize,
        /// Number of dead-stone records.
        masks: usize,
    },

    /// A board record failed to parse.
    #[display("Board record {index}: {error}")]
    Board {
        /// Record index.
        index: usize,
        /// Parse failure.
        error: MalformedBoardError,
    },

    /// A dead-stone record failed to parse.
    #[display("Dead-stone record {index}: {error}")]
    Mask {
        /// Record index.
        index: usize,
        /// Parse failure.
        error: MalformedBoardError,
    },

    /// A board and its dead-stone record differ in size.
    #[display("Record {index}: {error}")]
    Dimensions {
        /// Record index.
        index: usize,
        /// Size mismatch.
        error: DimensionMismatchError,
    },
}

impl std::error::Error for CatalogError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CatalogError::CountMismatch { .. } => None,
            CatalogError::Board { error, .. } | CatalogError::Mask { error, .. } => Some(error),
            CatalogError::Dimensions { error, .. } => Some(error),
        }
    }
}

/// Text that is not a recognised answer.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
#[display("Unrecognised answer {input:?}")]
pub struct ParseAnswerError {
    /// The rejected text.
    pub input: String,
}
