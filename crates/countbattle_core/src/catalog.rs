//! Multi-board data files.
//!
//! A board file holds many board records separated by blank lines; a
//! dead-stone file holds the matching masks in the same order.

use tracing::{debug, info, instrument};

use crate::board::Board;
use crate::error::CatalogError;
use crate::mask::{DeadMask, MarkedBoard};

/// Splits a multi-record data file on blank lines.
///
/// Lines are trimmed before the blank check, so whitespace-only lines also
/// separate records. Leading and trailing blank lines produce no records.
#[instrument(skip(text), fields(len = text.len()))]
pub fn split_records(text: &str) -> Vec<String> {
    let mut records = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            if !current.is_empty() {
                records.push(current.join("\n"));
                current.clear();
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        records.push(current.join("\n"));
    }

    debug!(count = records.len(), "Split data file into records");
    records
}

/// An indexed set of positions with their dead-stone markings.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BoardCatalog {
    entries: Vec<MarkedBoard>,
}

impl BoardCatalog {
    /// Parses a board file and a dead-stone file and pairs them by index.
    ///
    /// # Errors
    ///
    /// Fails when the record counts differ, a record does not parse, or a
    /// board and its mask differ in size.
    #[instrument(skip(boards_text, dead_text))]
    pub fn parse(boards_text: &str, dead_text: &str) -> Result<Self, CatalogError> {
        let boards = split_records(boards_text);
        let masks = split_records(dead_text);

        if boards.len() != masks.len() {
            return Err(CatalogError::CountMismatch {
                boards: boards.len(),
                masks: masks.len(),
            });
        }

        let entries = boards
            .iter()
            .zip(masks.iter())
            .enumerate()
            .map(|(index, (board_text, mask_text))| {
                let board = Board::parse(board_text)
                    .map_err(|error| CatalogError::Board { index, error })?;
                let dead = DeadMask::parse(mask_text)
                    .map_err(|error| CatalogError::Mask { index, error })?;
                MarkedBoard::new(board, dead)
                    .map_err(|error| CatalogError::Dimensions { index, error })
            })
            .collect::<Result<Vec<_>, _>>()?;

        info!(count = entries.len(), "Loaded board catalog");
        Ok(Self { entries })
    }

    /// Builds a catalog from already paired positions.
    pub fn from_entries(entries: Vec<MarkedBoard>) -> Self {
        Self { entries }
    }

    /// Returns the position with the given record id.
    pub fn get(&self, id: usize) -> Option<&MarkedBoard> {
        self.entries.get(id)
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the catalog has no records.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over `(id, position)`.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &MarkedBoard)> {
        self.entries.iter().enumerate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_lines_separate_records() {
        let records = split_records("\n\nx.\n.o\n\n  \n..\n..\n\n");
        assert_eq!(records, vec!["x.\n.o".to_string(), "..\n..".to_string()]);
    }

    #[test]
    fn count_mismatch_is_reported() {
        let err = BoardCatalog::parse("x.\n..\n\n..\n..", "..\n..").unwrap_err();
        assert_eq!(err, CatalogError::CountMismatch { boards: 2, masks: 1 });
    }

    #[test]
    fn record_index_is_attached_to_errors() {
        let err = BoardCatalog::parse("x.\n..\n\n.z\n..", "..\n..\n\n..\n..").unwrap_err();
        assert!(matches!(err, CatalogError::Board { index: 1, .. }));
    }
}
